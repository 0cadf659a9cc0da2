//! # flowkit-data
//!
//! Optical-flow benchmark datasets and flow file codecs.
//!
//! This crate provides:
//! - [`FlowDataset`] trait - indexed access to `(img1, img2, flow, valid)` samples
//! - [`Sintel`], [`KittiFlow`], [`FlyingChairs`] - directory scanners for the
//!   three benchmarks, each built through a builder that validates its split
//! - [`read_flo`] / [`write_flo`] - Middlebury `.flo` codec
//! - [`read_flow_png`] / [`write_flow_png`] - KITTI 16-bit PNG codec with validity mask
//! - [`FlowTransform`] - per-sample hook, plus flow-aware augmentations
//! - [`FlowLoader`] - shuffled batching, optionally parallel via rayon
//
// Errors are reported through DatasetError; construction problems (bad split,
// missing files) surface from `build()`, decode problems from `get()`.

pub mod augment;
pub mod dataset;
pub mod error;
pub mod flo;
pub mod flying_chairs;
pub mod kitti;
pub mod loader;
pub mod png16;
mod scan;
pub mod sintel;
pub mod split;
pub mod transform;

pub use augment::{RandomCrop, RandomHorizontalFlip, RandomVerticalFlip};
pub use dataset::{read_image, FlowDataset, FlowFormat, FlowIndex, ImagePair, Sample};
pub use error::{DataResult, DatasetError};
pub use flo::{decode_flo, encode_flo, read_flo, write_flo, FLO_MAGIC};
pub use flying_chairs::{FlyingChairs, FlyingChairsBuilder};
pub use kitti::{KittiFlow, KittiFlowBuilder};
pub use loader::{FlowLoader, LoaderConfig};
pub use png16::{decode_flow_png, encode_flow_png, read_flow_png, write_flow_png};
pub use sintel::{Sintel, SintelBuilder};
pub use split::{Pass, Split};
pub use transform::{Compose, FlowTransform, ScaleFlow};

pub use flowkit_core::{FlowField, Grid, ValidMask};
