use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
    /// Model name, unique across the graph.
    pub name: String,
}

/// A `depends_on` reference whose target is not a supplied model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingRef {
    /// Model that declared the reference.
    pub model: String,

    /// Name the reference points at.
    pub reference: String,
}

/// Directed dependency graph over a model collection.
///
/// Edge `A -> B` means B depends on A: A is upstream of B. Once built the
/// graph is a read-only snapshot and safe to share across concurrent
/// resolutions.
#[derive(Debug)]
pub struct DependencyGraph {
    /// Directed graph (dependency -> dependent).
    pub(crate) graph: DiGraph<ModelNode, ()>,

    /// Model name -> NodeIndex mapping for fast lookup.
    pub(crate) name_index: HashMap<String, NodeIndex>,

    /// Tag -> nodes carrying it, built in the same pass as the nodes.
    pub(crate) tag_index: HashMap<String, Vec<NodeIndex>>,

    /// References to models absent from the collection. Kept as graph
    /// facts; never edges, so traversal cannot reach them.
    pub(crate) dangling: Vec<DanglingRef>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_index: HashMap::new(),
            tag_index: HashMap::new(),
            dangling: Vec::new(),
        }
    }

    pub(crate) fn add_node(&mut self, node: ModelNode, tags: &[String]) -> NodeIndex {
        let name = node.name.clone();
        let idx = self.graph.add_node(node);

        self.name_index.insert(name, idx);
        for tag in tags {
            self.tag_index.entry(tag.clone()).or_default().push(idx);
        }

        idx
    }

    pub(crate) fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        self.graph.add_edge(from, to, ());
    }

    /// Find node by model name
    pub fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.name_index.get(name).copied()
    }

    /// Get node name
    pub fn node_name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|node| node.name.as_str())
    }

    /// Nodes carrying `tag`; empty when no model does.
    pub fn nodes_with_tag(&self, tag: &str) -> &[NodeIndex] {
        self.tag_index.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get all node indices
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Get all node names
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|node| node.name.as_str())
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Dependency references whose target is not in the collection.
    pub fn dangling(&self) -> &[DanglingRef] {
        &self.dangling
    }

    /// Whether the graph contains a dependency cycle. Traversals stay
    /// bounded either way; this only reports the fact.
    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Every model upstream of `start` (its dependencies, transitively),
    /// up to `depth` hops; `None` means the full closure. The start node
    /// is not included.
    pub fn ancestors(&self, start: NodeIndex, depth: Option<usize>) -> HashSet<NodeIndex> {
        self.reachable(start, Direction::Incoming, depth)
    }

    /// Every model downstream of `start` (its dependents, transitively),
    /// up to `depth` hops; `None` means the full closure. The start node
    /// is not included.
    pub fn descendants(&self, start: NodeIndex, depth: Option<usize>) -> HashSet<NodeIndex> {
        self.reachable(start, Direction::Outgoing, depth)
    }

    /// Breadth-first reachability with a visited set. The visited set is
    /// what guarantees termination and linear cost on cyclic input.
    fn reachable(
        &self,
        start: NodeIndex,
        direction: Direction,
        depth: Option<usize>,
    ) -> HashSet<NodeIndex> {
        let mut visited = HashSet::new();
        let mut result = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back((start, 0usize));

        while let Some((current, dist)) = queue.pop_front() {
            if depth.is_some_and(|limit| dist >= limit) {
                continue;
            }

            for next in self.graph.neighbors_directed(current, direction) {
                if visited.insert(next) {
                    result.insert(next);
                    queue.push_back((next, dist + 1));
                }
            }
        }

        result
    }
}
