//! # ragsearch-graph
//!
//! Orchestration for RAG Search: a small state graph plus the
//! retrieve → generate pipeline built on it.
//!
//! ## Overview
//!
//! - [`RagState`]: immutable per-question record advanced by each stage
//! - [`StateGraph`] / [`CompiledGraph`]: named [`Node`]s joined by edges from [`START`] to [`END`]
//! - [`RetrieveNode`] / [`GenerateNode`]: the two stages
//! - [`AnswerGenerator`]: context-restricted prompting with a no-context fallback
//! - [`RagGraph`]: the compiled two-stage graph, built once on first use
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragsearch_graph::RagGraph;
//!
//! let graph = RagGraph::new(retriever, model, 4);
//! let state = graph.run("What is the capital of France?").await?;
//! println!("{}", state.answer());
//! ```

pub mod error;
pub mod generator;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod rag;
pub mod state;

pub use error::{GraphError, Result};
pub use generator::{AnswerGenerator, FALLBACK_ANSWER, REFUSAL_PHRASE, build_prompt};
pub use graph::{CompiledGraph, END, START, StateGraph};
pub use node::Node;
pub use nodes::{GENERATE_NODE, GenerateNode, RETRIEVE_NODE, RetrieveNode};
pub use rag::RagGraph;
pub use state::{RagState, Stage};
