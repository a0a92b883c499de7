use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    marker::PhantomData,
    ops::Deref,
    rc::Rc,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use crate::{Error, FQDtype, GraphConfig, Result, Shape, Tensor, TensorData, TensorSpec};

const SCOPE_SEPARATOR: &str = "/";

thread_local! {
    // Scopes opened on this thread, per graph, with the token of their guard.
    static SCOPES: RefCell<HashMap<GraphId, Vec<(u64, String)>>> = RefCell::new(HashMap::new());
}

/// A computational graph: the owner of every tensor node created through it.
///
/// `Graph` is a handle; clones share the same nodes.
#[derive(Clone)]
pub struct Graph {
    id: GraphId,
    data: Arc<RwLock<GraphData>>,
}

struct GraphData {
    config: GraphConfig,
    nodes: Vec<TensorNode>,
    names: HashMap<String, TensorId>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TensorNode {
    pub id: TensorId,
    pub name: String,
    pub shape: Shape,
    pub dtype: FQDtype,
    pub trainable: bool,
    pub data: Option<TensorData>,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(GraphConfig::new(name))
    }

    pub fn with_config(config: GraphConfig) -> Self {
        let id = GraphId::new();
        log::debug!("created graph `{}` ({id})", config.name);
        Self {
            id,
            data: Arc::new(RwLock::new(GraphData {
                config,
                nodes: Vec::new(),
                names: HashMap::new(),
            })),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> String {
        self.read().config.name.clone()
    }

    pub fn config(&self) -> GraphConfig {
        self.read().config.clone()
    }

    // Every mutation is a single push/insert/assign, so a poisoned lock
    // still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, GraphData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new tensor node and return its handle.
    ///
    /// The shape must have no zero dimension and a representable element
    /// count, the dtype must have valid widths, and initial data, if any, must
    /// hold exactly `shape.numel()` elements. The name is resolved against the
    /// calling thread's current name scope; unnamed tensors are called
    /// `tensor_<id>`. On error the graph is left untouched.
    pub fn tensor(&self, spec: TensorSpec) -> Result<Tensor> {
        let TensorSpec {
            shape,
            name,
            dtype,
            trainable,
            data,
        } = spec;

        shape.validate()?;
        dtype.validate()?;
        if let Some(data) = &data {
            check_data_len(&shape, data)?;
        }

        let scope = self.current_scope();
        let mut graph = self.write();
        let id = TensorId(graph.nodes.len());
        let name = graph.resolve_name(&scope, name.as_deref(), id)?;

        log::debug!(
            "graph `{}`: tensor `{name}` {shape} {dtype}{}",
            graph.config.name,
            if trainable { " trainable" } else { "" }
        );

        graph.names.insert(name.clone(), id);
        graph.nodes.push(TensorNode {
            id,
            name,
            shape,
            dtype,
            trainable,
            data,
        });

        Ok(Tensor::new(id, self.clone()))
    }

    /// Push a name scope on the calling thread. Tensors this thread creates in
    /// the graph while the guard lives are named `scope/name`.
    pub fn name_scope(&self, name: &str) -> Result<ScopeGuard> {
        if name.is_empty() || name.contains(SCOPE_SEPARATOR) {
            return Err(Error::InvalidScopeName(name.to_string()));
        }
        static TOKENS: AtomicU64 = AtomicU64::new(0);
        let token = TOKENS.fetch_add(1, Ordering::Relaxed);
        SCOPES.with(|scopes| {
            scopes
                .borrow_mut()
                .entry(self.id)
                .or_default()
                .push((token, name.to_string()))
        });
        log::debug!(
            "graph `{}`: enter scope `{}`",
            self.name(),
            self.current_scope()
        );
        Ok(ScopeGuard {
            graph: self.id,
            token,
            _not_send: PhantomData,
        })
    }

    /// The calling thread's name scope in this graph, e.g. `conv1/bn`.
    pub fn current_scope(&self) -> String {
        SCOPES.with(|scopes| {
            scopes.borrow().get(&self.id).map_or_else(String::new, |stack| {
                stack
                    .iter()
                    .map(|(_, name)| name.as_str())
                    .collect::<Vec<_>>()
                    .join(SCOPE_SEPARATOR)
            })
        })
    }

    pub fn get_tensor_by_name(&self, name: &str) -> Result<Tensor> {
        match self.read().names.get(name) {
            Some(&id) => Ok(Tensor::new(id, self.clone())),
            None => Err(Error::TensorNotFound(name.to_string())),
        }
    }

    /// All tensors, in creation order.
    pub fn tensors(&self) -> Vec<Tensor> {
        self.read()
            .nodes
            .iter()
            .map(|node| Tensor::new(node.id, self.clone()))
            .collect()
    }

    pub fn trainable_tensors(&self) -> Vec<Tensor> {
        self.read()
            .nodes
            .iter()
            .filter(|node| node.trainable)
            .map(|node| Tensor::new(node.id, self.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the data of a tensor of this graph.
    pub fn assign(&self, tensor: &Tensor, data: TensorData) -> Result<()> {
        if tensor.graph().id() != self.id {
            return Err(Error::ForeignTensor {
                graph: self.id,
                tensor_graph: tensor.graph().id(),
            });
        }
        let mut graph = self.write();
        let node = &mut graph.nodes[*tensor.id()];
        check_data_len(&node.shape, &data)?;
        node.data = Some(data);
        Ok(())
    }

    pub(crate) fn with_node<R>(&self, id: TensorId, f: impl FnOnce(&TensorNode) -> R) -> R {
        f(&self.read().nodes[*id])
    }
}

impl GraphData {
    fn resolve_name(&self, scope: &str, name: Option<&str>, id: TensorId) -> Result<String> {
        let base = match name {
            Some(name) => name.to_string(),
            None => format!("tensor_{}", *id),
        };
        let scoped = if scope.is_empty() {
            base
        } else {
            format!("{scope}{SCOPE_SEPARATOR}{base}")
        };

        if !self.names.contains_key(&scoped) {
            return Ok(scoped);
        }
        if name.is_some() && !self.config.unique_names {
            return Err(Error::DuplicateName(scoped));
        }
        let mut k = 1;
        loop {
            let candidate = format!("{scoped}_{k}");
            if !self.names.contains_key(&candidate) {
                return Ok(candidate);
            }
            k += 1;
        }
    }
}

fn check_data_len(shape: &Shape, data: &TensorData) -> Result<()> {
    if data.len() != shape.numel() {
        return Err(Error::DataLengthMismatch {
            shape: shape.clone(),
            expected: shape.numel(),
            got: data.len(),
        });
    }
    Ok(())
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.read();
        writeln!(f, "graph `{}` ({} tensors)", graph.config.name, graph.nodes.len())?;
        for node in &graph.nodes {
            write!(f, "  {}: {} {}", node.name, node.shape, node.dtype)?;
            if node.trainable {
                write!(f, " trainable")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let graph = self.read();
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("name", &graph.config.name)
            .field("tensors", &graph.nodes.len())
            .finish()
    }
}

/// Pops the name scope pushed by [`Graph::name_scope`] when dropped.
///
/// Dropping a guard early also pops every scope opened after it; a guard
/// whose scope is already gone does nothing.
#[must_use = "the scope is popped as soon as the guard is dropped"]
pub struct ScopeGuard {
    graph: GraphId,
    token: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            let Some(stack) = scopes.get_mut(&self.graph) else {
                return;
            };
            if let Some(pos) = stack.iter().position(|(token, _)| *token == self.token) {
                for (_, scope) in stack.drain(pos..) {
                    log::debug!("graph {}: leave scope `{scope}`", self.graph);
                }
            }
            if stack.is_empty() {
                scopes.remove(&self.graph);
            }
        });
    }
}

/// Process-unique identity of a graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GraphId(usize);

impl GraphId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a tensor node within its graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TensorId(usize);

impl Deref for TensorId {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<usize> for TensorId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}
