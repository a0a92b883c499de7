//! Graph front end for quantized neural networks.
//!
//! Tensors are nodes of a [`Graph`]. [`get_tensor`] creates one in the
//! thread's current default graph:
//!
//! ```
//! use deepharmony_core::{get_tensor, FQDtype, Graph, TensorSpec};
//!
//! let graph = Graph::new("lenet");
//! let _default = graph.as_default();
//!
//! let w = get_tensor(TensorSpec::new([6, 1, 5, 5]).name("conv1/w").dtype(FQDtype::FXP8))?;
//! assert_eq!(w.graph().id(), graph.id());
//! assert_eq!(graph.len(), 1);
//! # Ok::<(), deepharmony_core::Error>(())
//! ```

mod config;
mod data;
mod dtype;
mod error;
mod graph;
mod registry;
mod shape;
mod tensor;

pub use config::{GraphConfig, DEFAULT_GRAPH_NAME};
pub use data::TensorData;
pub use dtype::{DType, FQDtype};
pub use error::{Error, Result};
pub use graph::{Graph, GraphId, ScopeGuard, TensorId};
pub use registry::{get_default_graph, has_default_override, reset_default_graph, DefaultGraphGuard};
pub use shape::Shape;
pub use tensor::{Tensor, TensorSpec};

/// Create a tensor in the current default graph.
///
/// Equivalent to `get_default_graph().tensor(spec)`: the default graph is
/// looked up at call time and its result, including any error, is returned
/// unchanged.
pub fn get_tensor(spec: TensorSpec) -> Result<Tensor> {
    get_default_graph().tensor(spec)
}
