//! # flowkit-core
//!
//! Dense grid primitives shared by the flowkit dataset adapters.
//!
//! This crate provides:
//! - [`Shape`] - dimension sizes with row-major strides
//! - [`Grid`] - owned contiguous n-dimensional buffer with flip/crop helpers
//! - [`FlowField`] / [`ValidMask`] - the `[2, H, W]` flow and `[H, W]` mask aliases
//! - [`Error`] / [`Result`] - shape and bounds failures

pub mod error;
pub mod grid;
pub mod shape;

pub use error::{Error, Result};
pub use grid::{FlowField, Grid, ValidMask};
pub use shape::Shape;
