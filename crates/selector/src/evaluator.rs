use crate::expr::{Clause, Criterion, SelectionExpr};
use crate::graph::DependencyGraph;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Non-fatal finding recorded while resolving an expression. Warnings
/// never abort the union; other clauses still contribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorWarning {
    /// A literal name criterion named a model absent from the collection.
    UnknownName { name: String, clause: String },

    /// A clause resolved to zero models.
    NoMatch { clause: String },
}

impl fmt::Display for SelectorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorWarning::UnknownName { name, clause } => {
                write!(f, "Model `{name}` from clause `{clause}` is not in the catalog")
            }
            SelectorWarning::NoMatch { clause } => {
                write!(f, "No models matched clause `{clause}`")
            }
        }
    }
}

/// Outcome of resolving a selection expression against a graph.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Selected model names. Set semantics; callers needing an order must
    /// impose their own.
    pub names: HashSet<String>,

    /// Soft findings collected per clause.
    pub warnings: Vec<SelectorWarning>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in lexicographic order, for stable display.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }
}

/// Resolve a parsed expression to the set of selected model names.
pub fn resolve(graph: &DependencyGraph, expr: &SelectionExpr) -> Resolution {
    let mut resolution = Resolution::default();

    for clause in &expr.clauses {
        let matched = resolve_clause(graph, clause, &mut resolution.warnings);
        resolution.names.extend(
            matched
                .into_iter()
                .filter_map(|idx| graph.node_name(idx))
                .map(str::to_string),
        );
    }

    resolution
}

fn resolve_clause(
    graph: &DependencyGraph,
    clause: &Clause,
    warnings: &mut Vec<SelectorWarning>,
) -> HashSet<NodeIndex> {
    let mut warned = false;

    let seeds: HashSet<NodeIndex> = match &clause.criterion {
        Criterion::Name(name) => match graph.find_node(name) {
            Some(idx) => HashSet::from([idx]),
            None => {
                warnings.push(SelectorWarning::UnknownName {
                    name: name.clone(),
                    clause: clause.to_string(),
                });
                warned = true;
                HashSet::new()
            }
        },
        Criterion::Tag(tag) => graph.nodes_with_tag(tag).iter().copied().collect(),
        Criterion::Wildcard => graph.node_indices().collect(),
    };

    let mut matched = seeds.clone();

    if let Some(depth) = clause.upstream {
        for &seed in &seeds {
            matched.extend(graph.ancestors(seed, depth.limit()));
        }
    }

    if let Some(depth) = clause.downstream {
        for &seed in &seeds {
            matched.extend(graph.descendants(seed, depth.limit()));
        }
    }

    if matched.is_empty() && !warned {
        warnings.push(SelectorWarning::NoMatch {
            clause: clause.to_string(),
        });
    }

    matched
}
