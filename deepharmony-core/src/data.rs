use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::{Distribution, StandardNormal};

#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "half")]
use half::f16;

use crate::{DType, Shape};

/// Initial value buffer of a tensor, stored row-major in a host element type.
///
/// The host element type is independent of the tensor's [`crate::FQDtype`]:
/// an `FXP8` weight may well be seeded from `f32` values.
#[derive(Clone, PartialEq, Debug)]
pub enum TensorData {
    U8(Vec<u8>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    #[cfg(feature = "half")]
    F16(Vec<f16>),
    #[cfg(feature = "bfloat")]
    BF16(Vec<bf16>),
}

macro_rules! with_values {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            TensorData::U8($v) => $body,
            TensorData::U32($v) => $body,
            TensorData::I32($v) => $body,
            TensorData::I64($v) => $body,
            TensorData::F32($v) => $body,
            TensorData::F64($v) => $body,
            #[cfg(feature = "half")]
            TensorData::F16($v) => $body,
            #[cfg(feature = "bfloat")]
            TensorData::BF16($v) => $body,
        }
    };
}

impl TensorData {
    /// Create a buffer filled with some value.
    pub fn fill<T: DType>(shape: &Shape, v: T) -> Self {
        T::into_data(vec![v; shape.numel()])
    }

    pub fn zeros<T: DType>(shape: &Shape) -> Self {
        Self::fill(shape, T::ZERO)
    }

    pub fn ones<T: DType>(shape: &Shape) -> Self {
        Self::fill(shape, T::ONE)
    }

    /// `start`, `start + step`, ... over the flattened shape.
    pub fn arange<T: DType>(shape: &Shape, start: T, step: T) -> Self {
        let (start, step) = (start.to_f64(), step.to_f64());
        let values = (0..shape.numel())
            .map(|i| T::from_f64(start + i as f64 * step))
            .collect();
        T::into_data(values)
    }

    /// Uniform samples in `[0, 1)` from the thread-local generator.
    pub fn rand<T: DType>(shape: &Shape) -> Self {
        Self::rand_with::<T, _>(shape, &mut rand::rng())
    }

    pub fn rand_with<T: DType, R: Rng + ?Sized>(shape: &Shape, rng: &mut R) -> Self {
        let values = (0..shape.numel())
            .map(|_| T::from_f64(StandardUniform.sample(rng)))
            .collect();
        T::into_data(values)
    }

    /// Standard normal samples from the thread-local generator.
    pub fn randn<T: DType>(shape: &Shape) -> Self {
        Self::randn_with::<T, _>(shape, &mut rand::rng())
    }

    pub fn randn_with<T: DType, R: Rng + ?Sized>(shape: &Shape, rng: &mut R) -> Self {
        let values = (0..shape.numel())
            .map(|_| T::from_f64(StandardNormal.sample(rng)))
            .collect();
        T::into_data(values)
    }

    pub fn len(&self) -> usize {
        with_values!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the host element type, e.g. `f32`.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            Self::U8(_) => u8::NAME,
            Self::U32(_) => u32::NAME,
            Self::I32(_) => i32::NAME,
            Self::I64(_) => i64::NAME,
            Self::F32(_) => f32::NAME,
            Self::F64(_) => f64::NAME,
            #[cfg(feature = "half")]
            Self::F16(_) => f16::NAME,
            #[cfg(feature = "bfloat")]
            Self::BF16(_) => bf16::NAME,
        }
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_values!(self, v => v.iter().map(|x| x.to_f64()).collect())
    }
}

impl<T: DType> From<Vec<T>> for TensorData {
    fn from(values: Vec<T>) -> Self {
        T::into_data(values)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn fill_zeros_ones() {
        let shape = Shape::from([2, 3]);
        assert_eq!(TensorData::fill(&shape, 2.5f32), TensorData::F32(vec![2.5; 6]));
        assert_eq!(TensorData::zeros::<i64>(&shape), TensorData::I64(vec![0; 6]));
        assert_eq!(TensorData::ones::<u8>(&shape).to_f64_vec(), vec![1.0; 6]);
    }

    #[test]
    fn arange() {
        let data = TensorData::arange(&Shape::from([4]), 1.0f64, 0.5);
        assert_eq!(data, TensorData::F64(vec![1.0, 1.5, 2.0, 2.5]));
    }

    #[test]
    fn rand_is_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = TensorData::rand_with::<f64, _>(&Shape::from([16, 16]), &mut rng);
        assert_eq!(data.len(), 256);
        assert!(data.to_f64_vec().iter().all(|x| (0.0..1.0).contains(x)));
    }

    #[test]
    fn seeded_randn_is_reproducible() {
        let shape = Shape::from([8]);
        let a = TensorData::randn_with::<f64, _>(&shape, &mut StdRng::seed_from_u64(3));
        let b = TensorData::randn_with::<f64, _>(&shape, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn from_vec() {
        let data = TensorData::from(vec![1i32, 2, 3]);
        assert_eq!(data.dtype_name(), "i32");
        assert_eq!(data.len(), 3);
        assert!(!data.is_empty());
    }
}
