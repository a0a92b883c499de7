use std::fmt;

use crate::{
    graph::{Graph, TensorId},
    FQDtype, Result, Shape, TensorData,
};

/// A handle to a tensor node. The node itself lives in its graph; cloning the
/// handle does not copy it.
#[derive(Clone)]
pub struct Tensor {
    id: TensorId,
    graph: Graph,
}

impl Tensor {
    pub(crate) fn new(id: TensorId, graph: Graph) -> Self {
        Self { id, graph }
    }

    /// Get the tensor ID within its graph.
    pub fn id(&self) -> TensorId {
        self.id
    }

    /// Retrieve the graph owning this tensor.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Fully scoped name.
    pub fn name(&self) -> String {
        self.graph.with_node(self.id, |node| node.name.clone())
    }

    pub fn shape(&self) -> Shape {
        self.graph.with_node(self.id, |node| node.shape.clone())
    }

    pub fn dtype(&self) -> FQDtype {
        self.graph.with_node(self.id, |node| node.dtype)
    }

    pub fn is_trainable(&self) -> bool {
        self.graph.with_node(self.id, |node| node.trainable)
    }

    /// A copy of the tensor's current data, if it has any.
    pub fn data(&self) -> Option<TensorData> {
        self.graph.with_node(self.id, |node| node.data.clone())
    }

    pub fn has_data(&self) -> bool {
        self.graph.with_node(self.id, |node| node.data.is_some())
    }

    pub fn numel(&self) -> usize {
        self.graph.with_node(self.id, |node| node.shape.numel())
    }

    /// Storage needed for the tensor in its graph dtype, saturating at `usize::MAX`.
    pub fn size_in_bits(&self) -> usize {
        self.graph.with_node(self.id, |node| {
            node.shape.numel().saturating_mul(node.dtype.bits())
        })
    }

    /// Replace the tensor's data. See [`Graph::assign`].
    pub fn assign(&self, data: impl Into<TensorData>) -> Result<()> {
        self.graph.assign(self, data.into())
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.graph.id() == other.graph.id()
    }
}

impl Eq for Tensor {}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.with_node(self.id, |node| {
            f.debug_struct("Tensor")
                .field("graph", &self.graph.id())
                .field("id", &*self.id)
                .field("name", &node.name)
                .field("shape", &node.shape.dims())
                .field("dtype", &node.dtype)
                .field("trainable", &node.trainable)
                .finish()
        })
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.graph.with_node(self.id, |node| {
            write!(f, "{}: {} {}", node.name, node.shape, node.dtype)
        })
    }
}
