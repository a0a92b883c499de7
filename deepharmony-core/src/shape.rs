use std::fmt;

use crate::{Error, Result};

/// Dimensions of a tensor. The empty shape is a scalar.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        Self(dims.into())
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Number of elements, or `None` if it does not fit in `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }

    /// Number of elements, saturating at `usize::MAX`. Exact for every shape
    /// that passes [`Shape::validate`].
    pub fn numel(&self) -> usize {
        self.checked_numel().unwrap_or(usize::MAX)
    }

    /// Check that every dimension is positive and the element count fits in `usize`.
    pub fn validate(&self) -> Result<()> {
        if let Some(axis) = self.0.iter().position(|&d| d == 0) {
            return Err(Error::InvalidShape {
                shape: self.clone(),
                axis,
            });
        }
        if self.checked_numel().is_none() {
            return Err(Error::ShapeOverflow(self.clone()));
        }
        Ok(())
    }

    /// Compute default (contiguous) strides for this shape.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = Vec::with_capacity(self.0.len());
        let mut acc = 1;
        // Iterate dims in reverse to accumulate products
        for dim in self.0.iter().rev() {
            strides.push(acc);
            acc *= *dim;
        }
        strides.reverse();
        strides
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ")")
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self(dims.to_vec())
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self(dims)
    }
}

impl From<usize> for Shape {
    fn from(dim: usize) -> Self {
        Self(vec![dim])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numel_and_strides() {
        let shape = Shape::from([2, 3, 4]);
        assert_eq!(shape.rank(), 3);
        assert_eq!(shape.numel(), 24);
        assert_eq!(shape.strides(), vec![12, 4, 1]);
    }

    #[test]
    fn scalar_has_one_element() {
        let shape = Shape::scalar();
        assert_eq!(shape.numel(), 1);
        assert!(shape.strides().is_empty());
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn zero_dim_is_rejected() {
        let shape = Shape::from(vec![4, 0, 2]);
        assert_eq!(
            shape.validate(),
            Err(Error::InvalidShape {
                shape: shape.clone(),
                axis: 1
            })
        );
    }

    #[test]
    fn overflowing_shape_is_rejected() {
        let shape = Shape::from([usize::MAX, 2]);
        assert_eq!(shape.checked_numel(), None);
        assert_eq!(shape.numel(), usize::MAX);
        assert_eq!(shape.validate(), Err(Error::ShapeOverflow(shape.clone())));
        assert!(Shape::from([usize::MAX, 1]).validate().is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Shape::from([2, 3]).to_string(), "(2, 3)");
        assert_eq!(Shape::scalar().to_string(), "()");
    }
}
