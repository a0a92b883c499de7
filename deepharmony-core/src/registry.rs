//! The default graph: the graph [`crate::get_tensor`] builds into when the
//! caller does not pass one explicitly.
//!
//! Each thread keeps a stack of graphs activated with [`Graph::as_default`].
//! When that stack is empty the process-wide default graph is used, created
//! on first access from [`GraphConfig::from_env`].

use std::{
    cell::RefCell,
    marker::PhantomData,
    rc::Rc,
    sync::{
        atomic::{AtomicU64, Ordering},
        PoisonError, RwLock,
    },
};

use crate::{Error, Graph, GraphConfig, Result};

static DEFAULT_GRAPH: RwLock<Option<Graph>> = RwLock::new(None);

thread_local! {
    // Activated graphs, tagged with the token of the guard that activated them.
    static GRAPH_STACK: RefCell<Vec<(u64, Graph)>> = const { RefCell::new(Vec::new()) };
}

/// The graph currently active on this thread.
///
/// This is the innermost graph activated with [`Graph::as_default`], or the
/// process-wide default graph when none is active. It is looked up on every
/// call, never cached.
pub fn get_default_graph() -> Graph {
    let active = GRAPH_STACK.with(|stack| stack.borrow().last().map(|(_, graph)| graph.clone()));
    if let Some(graph) = active {
        log::trace!("default graph: thread override `{}`", graph.name());
        return graph;
    }
    process_default_graph()
}

fn process_default_graph() -> Graph {
    if let Some(graph) = DEFAULT_GRAPH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return graph.clone();
    }
    let mut slot = DEFAULT_GRAPH.write().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(|| {
        let graph = Graph::with_config(GraphConfig::from_env());
        log::debug!("created process default graph `{}`", graph.name());
        graph
    })
    .clone()
}

/// Drop the process-wide default graph; the next lookup creates a fresh one.
///
/// Handles to tensors of the old graph stay valid. Fails if this thread has
/// a graph activated with [`Graph::as_default`].
pub fn reset_default_graph() -> Result<()> {
    if has_default_override() {
        return Err(Error::ResetInsideDefaultScope);
    }
    let old = DEFAULT_GRAPH
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if let Some(old) = old {
        log::debug!("reset process default graph `{}` ({})", old.name(), old.id());
    }
    Ok(())
}

/// Whether this thread has a graph activated with [`Graph::as_default`].
pub fn has_default_override() -> bool {
    GRAPH_STACK.with(|stack| !stack.borrow().is_empty())
}

impl Graph {
    /// Make this graph the default graph of the calling thread until the
    /// returned guard is dropped.
    pub fn as_default(&self) -> DefaultGraphGuard {
        static TOKENS: AtomicU64 = AtomicU64::new(0);
        let token = TOKENS.fetch_add(1, Ordering::Relaxed);
        let depth = GRAPH_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push((token, self.clone()));
            stack.len()
        });
        log::debug!("graph `{}` is now the default (depth {depth})", self.name());
        DefaultGraphGuard {
            token,
            _not_send: PhantomData,
        }
    }
}

/// Deactivates a graph activated with [`Graph::as_default`] when dropped.
///
/// Guards are expected to drop in reverse order of creation. Dropping a guard
/// early also deactivates every graph activated after it; a guard whose
/// activation is already gone does nothing.
#[must_use = "the graph stops being the default as soon as the guard is dropped"]
pub struct DefaultGraphGuard {
    token: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for DefaultGraphGuard {
    fn drop(&mut self) {
        GRAPH_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().position(|(token, _)| *token == self.token) {
                stack.truncate(pos);
            }
        });
    }
}
