// Sintel - MPI Sintel optical flow benchmark
//
// Expected layout:
//
//   root/
//     Sintel/
//       training/
//         clean/<scene>/frame_0001.png ...
//         final/<scene>/frame_0001.png ...
//         flow/<scene>/frame_0001.flo ...
//       testing/
//         clean/<scene>/...
//         final/<scene>/...
//
// Within each scene the frames are sorted and consecutive frames are paired,
// giving N-1 pairs for N frames. On the train split each scene contributes
// its sorted .flo files, and their number must equal the scene's pair count.
//
// USAGE:
//
//   let ds = Sintel::new("data")
//       .split(Split::Train)
//       .pass(Pass::Final)
//       .build()?;

use std::path::{Path, PathBuf};

use crate::dataset::{FlowDataset, FlowFormat, FlowIndex, ImagePair};
use crate::error::{DataResult, DatasetError};
use crate::scan::{list_files, list_subdirs};
use crate::split::{Pass, Split};
use crate::transform::FlowTransform;

/// Builder for [`Sintel`].
pub struct SintelBuilder {
    root: PathBuf,
    split: Split,
    pass: Pass,
    transform: Option<Box<dyn FlowTransform>>,
}

impl SintelBuilder {
    /// Create a builder rooted at the directory that contains `Sintel/`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        SintelBuilder {
            root: root.as_ref().to_path_buf(),
            split: Split::Train,
            pass: Pass::Clean,
            transform: None,
        }
    }

    /// `train` (default) or `test`.
    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// `clean` (default) or `final`.
    pub fn pass(mut self, pass: Pass) -> Self {
        self.pass = pass;
        self
    }

    pub fn transform(mut self, t: impl FlowTransform + 'static) -> Self {
        self.transform = Some(Box::new(t));
        self
    }

    /// Scan the directory tree and build the dataset.
    pub fn build(self) -> DataResult<Sintel> {
        let split = self.split.ensure_in(&[Split::Train, Split::Test])?;
        let index = Sintel::scan(&self.root, split, self.pass)?;
        Ok(Sintel {
            root: self.root,
            split,
            pass: self.pass,
            index,
            transform: self.transform,
        })
    }
}

/// The MPI Sintel dataset.
pub struct Sintel {
    root: PathBuf,
    split: Split,
    pass: Pass,
    index: FlowIndex,
    transform: Option<Box<dyn FlowTransform>>,
}

impl Sintel {
    /// Convenience entry-point: `Sintel::new(root)` returns a builder.
    pub fn new<P: AsRef<Path>>(root: P) -> SintelBuilder {
        SintelBuilder::new(root)
    }

    fn scan(root: &Path, split: Split, pass: Pass) -> DataResult<FlowIndex> {
        let root = root.join("Sintel");
        let split_dir = match split {
            Split::Train => "training",
            _ => "testing",
        };
        let image_root = root.join(split_dir).join(pass.as_str());
        let flow_root = root.join("training").join("flow");

        let mut pairs = Vec::new();
        let mut flows = Vec::new();
        let scenes = list_subdirs(&image_root)?;
        for (scene, dir) in &scenes {
            let frames = list_files(dir, ".png")?;
            let scene_pairs: Vec<ImagePair> = frames
                .windows(2)
                .map(|w| ImagePair::new(&w[0], &w[1]))
                .collect();

            if split == Split::Train {
                let scene_flows = list_files(&flow_root.join(scene), ".flo")?;
                if scene_flows.len() != scene_pairs.len() {
                    return Err(DatasetError::Pairing {
                        context: format!("Sintel scene {}", scene.to_string_lossy()),
                        images: scene_pairs.len(),
                        flows: scene_flows.len(),
                    });
                }
                flows.extend(scene_flows);
            }
            pairs.extend(scene_pairs);
        }

        log::debug!(
            "Sintel {split}/{pass}: {} scenes, {} pairs, {} flows",
            scenes.len(),
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

    pub fn pass(&self) -> Pass {
        self.pass
    }
}

impl FlowDataset for Sintel {
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
        "Sintel"
    }
}
