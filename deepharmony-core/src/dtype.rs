use std::fmt::Debug;

use crate::TensorData;

mod fq;

pub use fq::FQDtype;

/// Marker trait for host element types that can seed a tensor's initial data.
pub trait DType: Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    const NAME: &'static str;

    /// Lossy conversion used by the initializers. Integers saturate.
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;

    fn into_data(values: Vec<Self>) -> TensorData;
}

macro_rules! dtype {
    ($rt:ident, $zero:expr, $one:expr, $repr:expr, $variant:ident) => {
        impl DType for $rt {
            const ZERO: $rt = $zero;
            const ONE: $rt = $one;
            const NAME: &'static str = $repr;

            fn from_f64(v: f64) -> Self {
                v as $rt
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
            fn into_data(values: Vec<Self>) -> TensorData {
                TensorData::$variant(values)
            }
        }
    };
}

dtype!(u8, 0u8, 1u8, "u8", U8);
dtype!(u32, 0u32, 1u32, "u32", U32);
dtype!(i32, 0i32, 1i32, "i32", I32);
dtype!(i64, 0i64, 1i64, "i64", I64);
dtype!(f32, 0f32, 1f32, "f32", F32);
dtype!(f64, 0f64, 1f64, "f64", F64);

#[cfg(feature = "bfloat")]
use half::bf16;
#[cfg(feature = "half")]
use half::f16;
#[cfg(feature = "half")]
impl DType for f16 {
    const ZERO: f16 = f16::from_f32_const(0.0);
    const ONE: f16 = f16::from_f32_const(1.0);
    const NAME: &'static str = "f16";

    fn from_f64(v: f64) -> Self {
        f16::from_f64(v)
    }
    fn to_f64(self) -> f64 {
        f16::to_f64(self)
    }
    fn into_data(values: Vec<Self>) -> TensorData {
        TensorData::F16(values)
    }
}
#[cfg(feature = "bfloat")]
impl DType for bf16 {
    const ZERO: bf16 = bf16::from_f32_const(0.0);
    const ONE: bf16 = bf16::from_f32_const(1.0);
    const NAME: &'static str = "bf16";

    fn from_f64(v: f64) -> Self {
        bf16::from_f64(v)
    }
    fn to_f64(self) -> f64 {
        bf16::to_f64(self)
    }
    fn into_data(values: Vec<Self>) -> TensorData {
        TensorData::BF16(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversion_saturates() {
        assert_eq!(u8::from_f64(300.0), 255);
        assert_eq!(u8::from_f64(-1.0), 0);
        assert_eq!(i32::from_f64(2.9), 2);
    }

    #[test]
    fn into_data_picks_variant() {
        assert_eq!(f32::into_data(vec![1.0]), TensorData::F32(vec![1.0]));
        assert_eq!(i64::into_data(vec![3]), TensorData::I64(vec![3]));
    }
}
