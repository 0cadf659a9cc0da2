use crate::error::{Error, Result};
use crate::shape::Shape;

// Grid - owned, contiguous, row-major n-dimensional buffer
//
// A Grid is the storage for everything a flow dataset hands back besides the
// images themselves:
//
//   FlowField = Grid<f32>   shape [2, H, W]   channel 0 = u (x), channel 1 = v (y)
//   ValidMask = Grid<bool>  shape [H, W]
//
// There are no views and no strides beyond the contiguous ones: every
// geometry op (flip, crop) produces a fresh grid. Geometry ops act on the
// trailing two axes and treat any leading axes as a stack of planes, so the
// same call flips a [2, H, W] flow and an [H, W] mask consistently.

/// Dense n-dimensional grid of `T` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    shape: Shape,
}

/// Two-channel displacement field, shape `[2, H, W]`.
pub type FlowField = Grid<f32>;

/// Per-pixel validity flags, shape `[H, W]`.
pub type ValidMask = Grid<bool>;

impl<T> Grid<T> {
    /// Wrap a flat buffer. The buffer length must equal the shape's element count.
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.elem_count() {
            return Err(Error::ElementCountMismatch {
                expected: shape.elem_count(),
                got: data.len(),
                shape,
            });
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn elem_count(&self) -> usize {
        self.data.len()
    }

    /// Trailing `(height, width)`.
    pub fn hw(&self) -> Result<(usize, usize)> {
        self.shape.hw()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Element at a multi-index, or `None` when out of range.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.shape.offset_of(index).map(|off| &self.data[off])
    }

    /// Mutable slice of one leading-axis channel of a rank-3 grid.
    pub fn channel_mut(&mut self, c: usize) -> Result<&mut [T]> {
        let plane = self.channel_range(c)?;
        Ok(&mut self.data[plane])
    }

    fn channel_range(&self, c: usize) -> Result<std::ops::Range<usize>> {
        if self.rank() != 3 {
            return Err(Error::RankMismatch {
                expected: 3,
                got: self.rank(),
            });
        }
        let dims = self.dims();
        if c >= dims[0] {
            return Err(Error::OutOfBounds {
                index: vec![c],
                shape: self.shape.clone(),
            });
        }
        let plane = dims[1] * dims[2];
        Ok(c * plane..(c + 1) * plane)
    }

    /// Number of `H×W` planes stacked in the leading axes.
    fn planes(&self) -> Result<(usize, usize, usize)> {
        let (h, w) = self.hw()?;
        let plane = h * w;
        let n = if plane == 0 { 0 } else { self.data.len() / plane };
        Ok((n, h, w))
    }
}

impl<T: Clone> Grid<T> {
    /// Grid filled with a constant value.
    pub fn full(shape: impl Into<Shape>, value: T) -> Self {
        let shape = shape.into();
        Self {
            data: vec![value; shape.elem_count()],
            shape,
        }
    }

    /// Element at a multi-index, failing with `OutOfBounds`.
    pub fn at(&self, index: &[usize]) -> Result<T> {
        self.get(index).cloned().ok_or_else(|| Error::OutOfBounds {
            index: index.to_vec(),
            shape: self.shape.clone(),
        })
    }

    /// Mirror left-right on the trailing axis.
    pub fn flip_horizontal(&self) -> Result<Self> {
        let (n, h, w) = self.planes()?;
        let mut out = Vec::with_capacity(self.data.len());
        for row in 0..n * h {
            let start = row * w;
            out.extend(self.data[start..start + w].iter().rev().cloned());
        }
        Self::from_vec(out, self.shape.clone())
    }

    /// Mirror top-bottom on the second-to-last axis.
    pub fn flip_vertical(&self) -> Result<Self> {
        let (n, h, w) = self.planes()?;
        let mut out = Vec::with_capacity(self.data.len());
        for p in 0..n {
            for row in (0..h).rev() {
                let start = (p * h + row) * w;
                out.extend_from_slice(&self.data[start..start + w]);
            }
        }
        Self::from_vec(out, self.shape.clone())
    }

    /// Cut the window `[top..top+height, left..left+width]` out of every plane.
    pub fn crop(&self, top: usize, left: usize, height: usize, width: usize) -> Result<Self> {
        let (n, h, w) = self.planes()?;
        if top + height > h || left + width > w {
            return Err(Error::OutOfBounds {
                index: vec![top + height, left + width],
                shape: self.shape.clone(),
            });
        }
        let mut out = Vec::with_capacity(n * height * width);
        for p in 0..n {
            for row in top..top + height {
                let start = (p * h + row) * w + left;
                out.extend_from_slice(&self.data[start..start + width]);
            }
        }
        let mut dims = self.dims().to_vec();
        let r = dims.len();
        dims[r - 2] = height;
        dims[r - 1] = width;
        Self::from_vec(out, dims)
    }
}
