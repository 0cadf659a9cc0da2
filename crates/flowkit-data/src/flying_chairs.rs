// FlyingChairs - synthetic chairs-on-backgrounds flow dataset
//
// Expected layout:
//
//   root/
//     FlyingChairs/
//       data/
//         00001_flow.flo
//         00001_img1.ppm
//         00001_img2.ppm
//         ...
//       FlyingChairs_train_val.txt
//
// The split file holds one integer per flow file (1 = train, 2 = val),
// whitespace separated. Sorted flow i pairs with sorted images 2i and 2i+1.

use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::{FlowDataset, FlowFormat, FlowIndex, ImagePair};
use crate::error::{DataResult, DatasetError};
use crate::scan::list_files;
use crate::split::Split;
use crate::transform::FlowTransform;

/// Name of the split-assignment file shipped alongside the dataset.
pub const SPLIT_FILE_NAME: &str = "FlyingChairs_train_val.txt";

/// Builder for [`FlyingChairs`].
pub struct FlyingChairsBuilder {
    root: PathBuf,
    split: Split,
    transform: Option<Box<dyn FlowTransform>>,
}

impl FlyingChairsBuilder {
    /// Create a builder rooted at the directory that contains `FlyingChairs/`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FlyingChairsBuilder {
            root: root.as_ref().to_path_buf(),
            split: Split::Train,
            transform: None,
        }
    }

    /// `train` (default) or `val`.
    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn transform(mut self, t: impl FlowTransform + 'static) -> Self {
        self.transform = Some(Box::new(t));
        self
    }

    /// Scan the directory tree and build the dataset.
    pub fn build(self) -> DataResult<FlyingChairs> {
        let split = self.split.ensure_in(&[Split::Train, Split::Val])?;
        let index = FlyingChairs::scan(&self.root, split)?;
        Ok(FlyingChairs {
            root: self.root,
            split,
            index,
            transform: self.transform,
        })
    }
}

/// The FlyingChairs dataset.
pub struct FlyingChairs {
    root: PathBuf,
    split: Split,
    index: FlowIndex,
    transform: Option<Box<dyn FlowTransform>>,
}

impl FlyingChairs {
    /// Convenience entry-point: `FlyingChairs::new(root)` returns a builder.
    pub fn new<P: AsRef<Path>>(root: P) -> FlyingChairsBuilder {
        FlyingChairsBuilder::new(root)
    }

    fn scan(root: &Path, split: Split) -> DataResult<FlowIndex> {
        let root = root.join("FlyingChairs");
        let data_dir = root.join("data");
        let images = list_files(&data_dir, ".ppm")?;
        let flows = list_files(&data_dir, ".flo")?;

        let split_path = root.join(SPLIT_FILE_NAME);
        if !split_path.is_file() {
            return Err(DatasetError::missing(
                &split_path,
                "split file not found; download it from the FlyingChairs dataset page",
            ));
        }
        let codes = parse_split_file(&split_path)?;

        if codes.len() < flows.len() {
            return Err(DatasetError::format(
                &split_path,
                format!(
                    "{} split codes for {} flow files",
                    codes.len(),
                    flows.len()
                ),
            ));
        }
        if images.len() < 2 * flows.len() {
            return Err(DatasetError::missing(
                &data_dir,
                format!(
                    "{} flow files need {} images, found {}",
                    flows.len(),
                    2 * flows.len(),
                    images.len()
                ),
            ));
        }

        let wanted = match split {
            Split::Train => 1,
            _ => 2,
        };
        let mut pairs = Vec::new();
        let mut kept = Vec::new();
        for (i, flow) in flows.into_iter().enumerate() {
            if codes[i] == wanted {
                pairs.push(ImagePair::new(&images[2 * i], &images[2 * i + 1]));
                kept.push(flow);
            }
        }

        log::debug!("FlyingChairs {split}: {} pairs", pairs.len());
        FlowIndex::new(pairs, kept)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn split(&self) -> Split {
        self.split
    }
}

/// Parse the whitespace-separated split codes.
pub fn parse_split_file(path: &Path) -> DataResult<Vec<i32>> {
    let text = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    parse_split_codes(&text).map_err(|reason| DatasetError::format(path, reason))
}

fn parse_split_codes(text: &str) -> Result<Vec<i32>, String> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, tok)| {
            tok.parse::<i32>()
                .map_err(|e| format!("entry {i} ({tok:?}) is not an integer: {e}"))
        })
        .collect()
}

impl FlowDataset for FlyingChairs {
    fn index(&self) -> &FlowIndex {
        &self.index
    }

    fn flow_format(&self) -> FlowFormat {
        FlowFormat::Middlebury
    }

    fn transform(&self) -> Option<&dyn FlowTransform> {
        self.transform.as_deref()
    }

    fn name(&self) -> &str {
        "FlyingChairs"
    }
}
