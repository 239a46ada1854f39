use crate::error::{Result, SelectorError};
use crate::graph::{DanglingRef, DependencyGraph, ModelNode};
use catalog_model::ModelRecord;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

impl DependencyGraph {
    /// Build the dependency graph for a model collection.
    ///
    /// Duplicate names are a construction error: the name is the
    /// addressing key for everything downstream of this graph. Input
    /// records are never mutated.
    pub fn build(models: &[ModelRecord]) -> Result<Self> {
        let mut graph = DependencyGraph::new();

        // Phase 1: one node per record, tag index in the same pass.
        let mut name_to_node: HashMap<&str, NodeIndex> = HashMap::new();

        for model in models {
            if name_to_node.contains_key(model.name.as_str()) {
                return Err(SelectorError::DuplicateName {
                    name: model.name.clone(),
                });
            }

            let node = ModelNode {
                name: model.name.clone(),
            };
            let idx = graph.add_node(node, &model.tags);
            name_to_node.insert(model.name.as_str(), idx);
        }

        // Phase 2: dependency -> dependent edges. References to models
        // outside the collection become dangling facts, not edges.
        for model in models {
            let to_idx = name_to_node[model.name.as_str()];

            for dep in &model.depends_on {
                match name_to_node.get(dep.as_str()) {
                    Some(&from_idx) => graph.add_edge(from_idx, to_idx),
                    None => {
                        log::debug!(
                            "Model {} references {} which is not in the collection",
                            model.name,
                            dep
                        );
                        graph.dangling.push(DanglingRef {
                            model: model.name.clone(),
                            reference: dep.clone(),
                        });
                    }
                }
            }
        }

        log::info!(
            "Built dependency graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        if graph.is_cyclic() {
            log::warn!("Dependency graph contains a cycle; traversals stay bounded");
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, deps: &[&str]) -> ModelRecord {
        ModelRecord::new(name).depends_on(deps.iter().copied())
    }

    #[test]
    fn builds_simple_graph() {
        let models = vec![
            model("a", &[]),
            model("b", &["a"]),
            model("c", &["a", "b"]),
        ];

        let graph = DependencyGraph::build(&models).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.is_cyclic());
    }

    #[test]
    fn duplicate_names_are_a_construction_error() {
        let models = vec![model("a", &[]), model("a", &[])];

        let err = DependencyGraph::build(&models).unwrap_err();
        assert!(matches!(err, SelectorError::DuplicateName { name } if name == "a"));
    }

    #[test]
    fn missing_references_become_dangling_facts() {
        let models = vec![model("a", &["raw_events"])];

        let graph = DependencyGraph::build(&models).unwrap();

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(
            graph.dangling(),
            &[DanglingRef {
                model: "a".to_string(),
                reference: "raw_events".to_string(),
            }]
        );
    }

    #[test]
    fn tag_index_is_built_with_the_nodes() {
        let models = vec![
            ModelRecord::new("a").tags(["core", "finance"]),
            ModelRecord::new("b").tags(["core"]),
        ];

        let graph = DependencyGraph::build(&models).unwrap();

        assert_eq!(graph.nodes_with_tag("core").len(), 2);
        assert_eq!(graph.nodes_with_tag("finance").len(), 1);
        assert!(graph.nodes_with_tag("marketing").is_empty());
    }

    #[test]
    fn detects_cycles_without_failing_construction() {
        let models = vec![model("a", &["b"]), model("b", &["a"])];

        let graph = DependencyGraph::build(&models).unwrap();
        assert!(graph.is_cyclic());
    }
}
