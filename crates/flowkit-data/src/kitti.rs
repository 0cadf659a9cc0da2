// KittiFlow - KITTI 2015 optical flow benchmark
//
// Expected layout:
//
//   root/
//     Kitti/
//       training/
//         image_2/000000_10.png 000000_11.png ...
//         flow_occ/000000_10.png ...
//       testing/
//         image_2/...
//
// The `_10` and `_11` frames are sorted independently and zipped by
// position; both share the numeric prefix, so sorting lines them up.
// Ground truth is the 16-bit PNG format with a validity channel.

use std::path::{Path, PathBuf};

use crate::dataset::{FlowDataset, FlowFormat, FlowIndex, ImagePair};
use crate::error::{DataResult, DatasetError};
use crate::scan::list_files;
use crate::split::Split;
use crate::transform::FlowTransform;

/// Builder for [`KittiFlow`].
pub struct KittiFlowBuilder {
    root: PathBuf,
    split: Split,
    transform: Option<Box<dyn FlowTransform>>,
}

impl KittiFlowBuilder {
    /// Create a builder rooted at the directory that contains `Kitti/`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        KittiFlowBuilder {
            root: root.as_ref().to_path_buf(),
            split: Split::Train,
            transform: None,
        }
    }

    /// `train` (default) or `test`.
    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn transform(mut self, t: impl FlowTransform + 'static) -> Self {
        self.transform = Some(Box::new(t));
        self
    }

    /// Scan the directory tree and build the dataset.
    pub fn build(self) -> DataResult<KittiFlow> {
        let split = self.split.ensure_in(&[Split::Train, Split::Test])?;
        let index = KittiFlow::scan(&self.root, split)?;
        Ok(KittiFlow {
            root: self.root,
            split,
            index,
            transform: self.transform,
        })
    }
}

/// The KITTI 2015 flow dataset. Samples carry a validity mask.
pub struct KittiFlow {
    root: PathBuf,
    split: Split,
    index: FlowIndex,
    transform: Option<Box<dyn FlowTransform>>,
}

impl KittiFlow {
    /// Convenience entry-point: `KittiFlow::new(root)` returns a builder.
    pub fn new<P: AsRef<Path>>(root: P) -> KittiFlowBuilder {
        KittiFlowBuilder::new(root)
    }

    fn scan(root: &Path, split: Split) -> DataResult<FlowIndex> {
        let root = root.join("Kitti").join(format!("{}ing", split.as_str()));
        let image_dir = root.join("image_2");
        let images1 = list_files(&image_dir, "_10.png")?;
        let images2 = list_files(&image_dir, "_11.png")?;

        if images1.is_empty() || images2.is_empty() {
            return Err(DatasetError::missing(
                &image_dir,
                "could not find the Kitti flow images; check the directory structure",
            ));
        }
        if images1.len() != images2.len() {
            log::warn!(
                "Kitti {split}: {} _10 frames vs {} _11 frames, pairing the first {}",
                images1.len(),
                images2.len(),
                images1.len().min(images2.len())
            );
        }

        let pairs: Vec<ImagePair> = images1
            .into_iter()
            .zip(images2)
            .map(|(a, b)| ImagePair::new(a, b))
            .collect();

        let flows = match split {
            Split::Train => list_files(&root.join("flow_occ"), "_10.png")?,
            _ => Vec::new(),
        };

        log::debug!(
            "Kitti {split}: {} pairs, {} flows",
            pairs.len(),
            flows.len()
        );
        FlowIndex::new(pairs, flows)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> Split {
        self.split
    }
}

impl FlowDataset for KittiFlow {
    fn index(&self) -> &FlowIndex {
        &self.index
    }

    fn flow_format(&self) -> FlowFormat {
        FlowFormat::KittiPng
    }

    fn transform(&self) -> Option<&dyn FlowTransform> {
        self.transform.as_deref()
    }

    fn name(&self) -> &str {
        "KittiFlow"
    }
}
