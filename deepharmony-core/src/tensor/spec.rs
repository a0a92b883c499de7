use crate::{FQDtype, Shape, TensorData};

/// Everything needed to create a tensor node.
///
/// `TensorSpec::new(shape)` describes an unnamed, trainable `FP32` tensor
/// with no initial data; the builder methods override one field each.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorSpec {
    pub shape: Shape,
    pub name: Option<String>,
    pub dtype: FQDtype,
    pub trainable: bool,
    pub data: Option<TensorData>,
}

impl TensorSpec {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            name: None,
            dtype: FQDtype::FP32,
            trainable: true,
            data: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn dtype(mut self, dtype: FQDtype) -> Self {
        self.dtype = dtype;
        self
    }

    #[must_use]
    pub fn trainable(mut self, trainable: bool) -> Self {
        self.trainable = trainable;
        self
    }

    #[must_use]
    pub fn data(mut self, data: impl Into<TensorData>) -> Self {
        self.data = Some(data.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let spec = TensorSpec::new([2, 3]);
        assert_eq!(spec.shape, Shape::from([2, 3]));
        assert_eq!(spec.name, None);
        assert_eq!(spec.dtype, FQDtype::FP32);
        assert!(spec.trainable);
        assert_eq!(spec.data, None);
    }

    #[test]
    fn builder_overrides() {
        let spec = TensorSpec::new([3])
            .name("bias")
            .dtype(FQDtype::FXP16)
            .trainable(false)
            .data(vec![1.0f32, 2.0, 3.0]);
        assert_eq!(spec.name.as_deref(), Some("bias"));
        assert_eq!(spec.dtype, FQDtype::FXP16);
        assert!(!spec.trainable);
        assert_eq!(spec.data, Some(TensorData::F32(vec![1.0, 2.0, 3.0])));
    }
}
