use std::fmt;

// Shape - N-dimensional shape of a grid
//
// Flow data only ever uses two shapes:
//   - Flow field:    Shape([2, H, W])  - channel-first, u then v
//   - Validity mask: Shape([H, W])
//
// Layout is always contiguous row-major, so the shape alone fixes the
// strides. A zero-sized dimension (an empty .flo payload) is legal and
// yields zero elements.

/// N-dimensional shape of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// The dimension sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements (product of all dimensions).
    pub fn elem_count(&self) -> usize {
        self.0.iter().product::<usize>()
    }

    /// The trailing `(height, width)` pair, for grids of rank 2 or more.
    pub fn hw(&self) -> crate::Result<(usize, usize)> {
        let r = self.rank();
        if r < 2 {
            return Err(crate::Error::RankMismatch {
                expected: 2,
                got: r,
            });
        }
        Ok((self.0[r - 2], self.0[r - 1]))
    }

    /// Flat offset of a multi-index, or `None` if any coordinate is out of range.
    pub fn offset_of(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.rank() {
            return None;
        }
        let mut off = 0;
        for (&i, &d) in index.iter().zip(&self.0) {
            if i >= d {
                return None;
            }
            off = off * d + i;
        }
        Some(off)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

impl From<(usize, usize)> for Shape {
    fn from((d0, d1): (usize, usize)) -> Self {
        Shape(vec![d0, d1])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((d0, d1, d2): (usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(s: &[usize]) -> Self {
        Shape(s.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_shape() {
        let s = Shape::from((3, 4));
        assert_eq!(s.rank(), 2);
        assert_eq!(s.elem_count(), 12);
        assert_eq!(s.hw().unwrap(), (3, 4));
    }

    #[test]
    fn test_flow_shape_hw() {
        let s = Shape::from((2, 3, 4));
        assert_eq!(s.elem_count(), 24);
        assert_eq!(s.hw().unwrap(), (3, 4));
        assert!(matches!(
            Shape::from(vec![5]).hw(),
            Err(crate::Error::RankMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_zero_sized_dim() {
        let s = Shape::from((2, 0, 5));
        assert_eq!(s.elem_count(), 0);
    }

    #[test]
    fn test_offset_of() {
        let s = Shape::from((2, 3, 4));
        assert_eq!(s.offset_of(&[0, 0, 0]), Some(0));
        assert_eq!(s.offset_of(&[1, 2, 3]), Some(23));
        assert_eq!(s.offset_of(&[1, 0, 1]), Some(13));
        assert_eq!(s.offset_of(&[2, 0, 0]), None);
        assert_eq!(s.offset_of(&[0, 0]), None);
    }

    #[test]
    fn test_display() {
        let s = Shape::from((2, 3, 4));
        assert_eq!(format!("{}", s), "[2, 3, 4]");
    }
}
