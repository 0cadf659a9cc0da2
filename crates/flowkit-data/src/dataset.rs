// FlowDataset trait - indexed access to (frame, next frame, flow, valid)
//
// Every flow benchmark reduces to two parallel lists built once at
// construction:
//
//   pairs: [(frame_t, frame_t+1), ...]
//   flows: [flow_t, ...]            (empty for test splits)
//
// Implementors only supply the lists and the flow file format; the shared
// access path (`get`) lives here as a provided method.

use std::path::{Path, PathBuf};

use flowkit_core::{FlowField, ValidMask};
use image::DynamicImage;

use crate::error::{DataResult, DatasetError};
use crate::flo::read_flo;
use crate::png16::read_flow_png;
use crate::transform::FlowTransform;

/// One decoded sample.
///
/// `valid` is only ever `Some` for datasets whose flow format carries a mask
/// (see [`FlowDataset::has_builtin_mask`]); `flow` is `None` on test splits.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub img1: DynamicImage,
    pub img2: DynamicImage,
    /// Ground-truth flow, shape `[2, H, W]`.
    pub flow: Option<FlowField>,
    /// Ground-truth validity, shape `[H, W]`.
    pub valid: Option<ValidMask>,
}

/// Paths of two consecutive frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePair {
    pub first: PathBuf,
    pub second: PathBuf,
}

impl ImagePair {
    pub fn new(first: impl Into<PathBuf>, second: impl Into<PathBuf>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// The parallel image-pair / flow-path lists of a dataset.
#[derive(Debug, Clone, Default)]
pub struct FlowIndex {
    pairs: Vec<ImagePair>,
    flows: Vec<PathBuf>,
}

impl FlowIndex {
    /// Build an index. `flows` must be empty or exactly as long as `pairs`.
    pub fn new(pairs: Vec<ImagePair>, flows: Vec<PathBuf>) -> DataResult<Self> {
        if !flows.is_empty() && flows.len() != pairs.len() {
            return Err(DatasetError::Pairing {
                context: "dataset index".to_string(),
                images: pairs.len(),
                flows: flows.len(),
            });
        }
        Ok(Self { pairs, flows })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[ImagePair] {
        &self.pairs
    }

    pub fn flows(&self) -> &[PathBuf] {
        &self.flows
    }

    /// Whether ground truth is available (false on test splits).
    pub fn has_flow(&self) -> bool {
        !self.flows.is_empty()
    }

    pub fn pair(&self, index: usize) -> DataResult<&ImagePair> {
        self.pairs.get(index).ok_or(DatasetError::IndexOutOfBounds {
            index,
            len: self.pairs.len(),
        })
    }

    pub fn flow(&self, index: usize) -> Option<&Path> {
        self.flows.get(index).map(PathBuf::as_path)
    }
}

/// On-disk encoding of a dataset's ground-truth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowFormat {
    /// Middlebury `.flo`, no mask.
    Middlebury,
    /// KITTI 16-bit PNG with a validity channel.
    KittiPng,
}

impl FlowFormat {
    pub fn has_builtin_mask(&self) -> bool {
        matches!(self, FlowFormat::KittiPng)
    }

    /// Decode one flow file, returning the mask when the format carries one.
    pub fn read(&self, path: &Path) -> DataResult<(FlowField, Option<ValidMask>)> {
        match self {
            FlowFormat::Middlebury => Ok((read_flo(path)?, None)),
            FlowFormat::KittiPng => {
                let (flow, valid) = read_flow_png(path)?;
                Ok((flow, Some(valid)))
            }
        }
    }
}

/// Decode one frame with the `image` crate.
pub fn read_image(path: &Path) -> DataResult<DynamicImage> {
    image::open(path).map_err(|e| DatasetError::from_image(path, e))
}

/// An optical-flow dataset: an indexed collection of frame pairs.
///
/// Implementations must be `Send + Sync` so `FlowLoader` can fetch samples
/// from several threads.
pub trait FlowDataset: Send + Sync {
    /// The image-pair / flow lists built at construction.
    fn index(&self) -> &FlowIndex;

    /// How this dataset's flow files are encoded.
    fn flow_format(&self) -> FlowFormat;

    /// Transform applied to every sample returned by `get`.
    fn transform(&self) -> Option<&dyn FlowTransform> {
        None
    }

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "flow-dataset"
    }

    /// Number of frame pairs.
    fn len(&self) -> usize {
        self.index().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether samples carry a meaningful `valid` mask.
    fn has_builtin_mask(&self) -> bool {
        self.flow_format().has_builtin_mask()
    }

    /// Frame paths of sample `index`, without decoding anything.
    fn pair(&self, index: usize) -> DataResult<&ImagePair> {
        self.index().pair(index)
    }

    /// Decode sample `index`.
    ///
    /// Both frames are read, then the flow file if the split has ground
    /// truth, then the transform (if any) runs on the assembled sample.
    /// Datasets without a built-in mask always return `valid: None`, whatever
    /// the transform produced.
    fn get(&self, index: usize) -> DataResult<Sample> {
        let idx = self.index();
        let pair = idx.pair(index)?;
        let img1 = read_image(&pair.first)?;
        let img2 = read_image(&pair.second)?;

        let (flow, valid) = match idx.flow(index) {
            Some(path) => {
                let (flow, valid) = self.flow_format().read(path)?;
                (Some(flow), valid)
            }
            None => (None, None),
        };

        let mut sample = Sample {
            img1,
            img2,
            flow,
            valid,
        };
        if let Some(t) = self.transform() {
            sample = t.apply(sample);
        }
        if !self.has_builtin_mask() {
            sample.valid = None;
        }
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_rejects_length_mismatch() {
        let pairs = vec![ImagePair::new("a", "b"), ImagePair::new("b", "c")];
        let err = FlowIndex::new(pairs.clone(), vec![PathBuf::from("f")]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::Pairing {
                images: 2,
                flows: 1,
                ..
            }
        ));
        let idx = FlowIndex::new(pairs, Vec::new()).unwrap();
        assert_eq!(idx.len(), 2);
        assert!(!idx.has_flow());
        assert!(idx.flow(0).is_none());
    }

    #[test]
    fn test_index_out_of_bounds() {
        let idx = FlowIndex::new(vec![ImagePair::new("a", "b")], Vec::new()).unwrap();
        assert!(matches!(
            idx.pair(1),
            Err(DatasetError::IndexOutOfBounds { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_format_mask_flag() {
        assert!(FlowFormat::KittiPng.has_builtin_mask());
        assert!(!FlowFormat::Middlebury.has_builtin_mask());
    }
}
