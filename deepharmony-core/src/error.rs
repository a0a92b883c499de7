use crate::{FQDtype, GraphId, Shape};

/// Errors raised while building a graph.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid shape {shape}: dimension {axis} is zero")]
    InvalidShape { shape: Shape, axis: usize },

    #[error("shape {0} has more elements than fit in usize")]
    ShapeOverflow(Shape),

    #[error("unsupported dtype {0:?}")]
    UnsupportedDType(FQDtype),

    #[error("data for tensor of shape {shape} has {got} elements, expected {expected}")]
    DataLengthMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    #[error("tensor `{0}` already exists in the graph")]
    DuplicateName(String),

    #[error("no tensor named `{0}` in the graph")]
    TensorNotFound(String),

    #[error("invalid name scope `{0}`: scope names must be non-empty and must not contain `/`")]
    InvalidScopeName(String),

    #[error("tensor belongs to graph {tensor_graph}, not graph {graph}")]
    ForeignTensor {
        graph: GraphId,
        tensor_graph: GraphId,
    },

    #[error("cannot reset the default graph while a graph is activated on this thread")]
    ResetInsideDefaultScope,

    #[error("unknown dtype `{0}`")]
    UnknownDType(String),
}

pub type Result<T> = std::result::Result<T, Error>;
