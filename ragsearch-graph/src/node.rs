//! The node abstraction executed by a [`CompiledGraph`](crate::CompiledGraph).

use async_trait::async_trait;

use crate::error::Result;

/// A single step of a graph: consumes the state and returns the next one.
#[async_trait]
pub trait Node<S>: Send + Sync {
    /// Unique name used for edges and tracing.
    fn name(&self) -> &str;

    /// Execute the node.
    async fn run(&self, state: S) -> Result<S>;
}
