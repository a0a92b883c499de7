pub mod handle;
pub mod spec;

pub use handle::Tensor;
pub use spec::TensorSpec;
