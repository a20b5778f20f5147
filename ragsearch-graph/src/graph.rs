//! A minimal state graph: named nodes joined by edges into one path from
//! [`START`] to [`END`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::Instrument;

use crate::error::{GraphError, Result};
use crate::node::Node;

/// Virtual node every graph starts from.
pub const START: &str = "__start__";
/// Virtual node every graph finishes at.
pub const END: &str = "__end__";

/// Builder for a [`CompiledGraph`].
///
/// ```rust,ignore
/// let graph = StateGraph::new()
///     .add_node(retrieve)
///     .add_node(generate)
///     .add_edge(START, "retriever")
///     .add_edge("retriever", "responder")
///     .add_edge("responder", END)
///     .compile()?;
/// ```
pub struct StateGraph<S> {
    nodes: Vec<Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
}

impl<S> Default for StateGraph<S> {
    fn default() -> Self {
        Self { nodes: Vec::new(), edges: Vec::new() }
    }
}

impl<S: Send + 'static> StateGraph<S> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node.
    pub fn add_node(mut self, node: impl Node<S> + 'static) -> Self {
        self.nodes.push(Arc::new(node));
        self
    }

    /// Register an already shared node.
    pub fn add_shared_node(mut self, node: Arc<dyn Node<S>>) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a directed edge. Use [`START`] and [`END`] for the graph boundaries.
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Validate the topology and freeze it into an executable path.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidGraph`] when node names are duplicated or
    /// reserved, an edge references an unknown node, a node has more than one
    /// outgoing edge, the path from [`START`] never reaches [`END`], or some
    /// node is not on that path.
    pub fn compile(self) -> Result<CompiledGraph<S>> {
        let mut by_name: HashMap<&str, &Arc<dyn Node<S>>> = HashMap::new();
        for node in &self.nodes {
            let name = node.name();
            if name == START || name == END {
                return Err(invalid(format!("node name '{name}' is reserved")));
            }
            if by_name.insert(name, node).is_some() {
                return Err(invalid(format!("duplicate node '{name}'")));
            }
        }

        let mut next: HashMap<&str, &str> = HashMap::new();
        for (from, to) in &self.edges {
            if from != START && !by_name.contains_key(from.as_str()) {
                return Err(invalid(format!("edge from unknown node '{from}'")));
            }
            if to != END && !by_name.contains_key(to.as_str()) {
                return Err(invalid(format!("edge to unknown node '{to}'")));
            }
            if next.insert(from.as_str(), to.as_str()).is_some() {
                return Err(invalid(format!("node '{from}' has more than one outgoing edge")));
            }
        }

        let mut steps = Vec::with_capacity(by_name.len());
        let mut visited = HashSet::new();
        let mut current = START;
        loop {
            let Some(&to) = next.get(current) else {
                return Err(invalid(format!("node '{current}' has no outgoing edge")));
            };
            if to == END {
                break;
            }
            if !visited.insert(to) {
                return Err(invalid(format!("cycle through node '{to}'")));
            }
            if let Some(node) = by_name.get(to) {
                steps.push(Arc::clone(node));
            }
            current = to;
        }

        if let Some(orphan) = self.nodes.iter().find(|n| !visited.contains(n.name())) {
            return Err(invalid(format!("node '{}' is unreachable from start", orphan.name())));
        }

        Ok(CompiledGraph { steps })
    }
}

fn invalid(message: String) -> GraphError {
    GraphError::InvalidGraph(message)
}

/// An immutable, validated graph ready to run.
pub struct CompiledGraph<S> {
    steps: Vec<Arc<dyn Node<S>>>,
}

impl<S> std::fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph").field("steps", &self.node_names()).finish()
    }
}

impl<S> CompiledGraph<S> {
    /// Node names in execution order.
    pub fn node_names(&self) -> Vec<&str> {
        self.steps.iter().map(|n| n.name()).collect()
    }
}

impl<S: Send + 'static> CompiledGraph<S> {
    /// Run every node in order, feeding each the previous node's output.
    ///
    /// Stops at the first failing node and returns its error.
    pub async fn invoke(&self, state: S) -> Result<S> {
        let span = tracing::info_span!("graph.invoke", graph.steps = self.steps.len());
        async move {
            let mut state = state;
            for node in &self.steps {
                let node_span = tracing::debug_span!("graph.node", node.name = node.name());
                state = node.run(state).instrument(node_span).await.inspect_err(|e| {
                    tracing::warn!(node.name = node.name(), error = %e, "graph node failed");
                })?;
            }
            Ok(state)
        }
        .instrument(span)
        .await
    }
}
