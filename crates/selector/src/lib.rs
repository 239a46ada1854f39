//! # Catalog Selector
//!
//! Model selection and dependency resolution: resolve a compact selection
//! expression (e.g. `tag:marketing,+downstream_model`) against the
//! dependency graph of a model collection into the exact set of models an
//! operation should act on.
//!
//! ## Architecture
//!
//! ```text
//! &[ModelRecord]
//!     │
//!     ├──> Graph Builder (one pass)
//!     │      ├─ dependency -> dependent edges
//!     │      ├─ tag index
//!     │      └─ dangling-reference facts
//!     │
//!     ├──> Expression Parser
//!     │      └─ comma union of `[N]+ criterion +[N]` clauses
//!     │
//!     └──> Selector Evaluator
//!            ├─ seed set per clause (name / tag / *)
//!            ├─ depth-bounded BFS closures (upstream / downstream)
//!            └─ union across clauses + soft warnings
//! ```
//!
//! The whole pipeline is pure, synchronous computation over an immutable
//! snapshot; a built [`DependencyGraph`] may be shared read-only across
//! threads (see [`GraphCache`]).

mod builder;
mod cache;
mod error;
mod evaluator;
mod expr;
mod graph;

pub use cache::GraphCache;
pub use error::{Result, SelectorError};
pub use evaluator::{resolve, Resolution, SelectorWarning};
pub use expr::{Clause, Criterion, Depth, SelectionExpr};
pub use graph::{DanglingRef, DependencyGraph, ModelNode};

use catalog_model::ModelRecord;

/// Build-once, query-many selection handle over a model collection.
pub struct Selector<'a> {
    models: &'a [ModelRecord],
    graph: DependencyGraph,
}

impl<'a> Selector<'a> {
    /// Build the dependency graph for `models`. Fails on duplicate names.
    pub fn new(models: &'a [ModelRecord]) -> Result<Self> {
        let graph = DependencyGraph::build(models)?;
        Ok(Self { models, graph })
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Parse and resolve `expression`, returning the name set plus any
    /// soft warnings.
    pub fn resolve(&self, expression: &str) -> Result<Resolution> {
        let expr = SelectionExpr::parse(expression)?;
        Ok(evaluator::resolve(&self.graph, &expr))
    }

    /// Resolve `expression` and materialize the matching records, logging
    /// each soft warning. Records come back in collection order.
    pub fn select(&self, expression: &str) -> Result<Vec<&'a ModelRecord>> {
        let resolution = self.resolve(expression)?;

        for warning in &resolution.warnings {
            log::warn!("{warning}");
        }

        Ok(self
            .models
            .iter()
            .filter(|model| resolution.names.contains(&model.name))
            .collect())
    }
}

/// One-call selection surface: build, parse, resolve, materialize.
pub fn select<'a>(models: &'a [ModelRecord], expression: &str) -> Result<Vec<&'a ModelRecord>> {
    Selector::new(models)?.select(expression)
}
