use crate::error::Result;
use crate::graph::DependencyGraph;
use catalog_model::ModelRecord;
use std::sync::{Arc, Mutex};

/// Host-owned cache for a built dependency graph.
///
/// The host decides when the underlying model collection has changed and
/// calls [`GraphCache::invalidate`]; the cache does no staleness detection
/// of its own and holds no process-wide state.
#[derive(Default)]
pub struct GraphCache {
    slot: Mutex<Option<Arc<DependencyGraph>>>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached graph, building it from `models` on first use.
    pub fn get_or_build(&self, models: &[ModelRecord]) -> Result<Arc<DependencyGraph>> {
        let mut slot = self.slot.lock().expect("graph cache mutex poisoned");

        if let Some(graph) = slot.as_ref() {
            return Ok(Arc::clone(graph));
        }

        log::debug!("Graph cache empty, building from {} models", models.len());
        let graph = Arc::new(DependencyGraph::build(models)?);
        *slot = Some(Arc::clone(&graph));
        Ok(graph)
    }

    /// Drop the cached graph. Call whenever the model collection changes;
    /// the next `get_or_build` rebuilds from the fresh collection.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("graph cache mutex poisoned");
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_same_snapshot_until_invalidated() {
        let cache = GraphCache::new();
        let models = vec![ModelRecord::new("a")];

        let first = cache.get_or_build(&models).unwrap();
        let second = cache.get_or_build(&models).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate();
        let third = cache.get_or_build(&models).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn build_errors_leave_the_cache_empty() {
        let cache = GraphCache::new();
        let duplicates = vec![ModelRecord::new("a"), ModelRecord::new("a")];
        assert!(cache.get_or_build(&duplicates).is_err());

        let models = vec![ModelRecord::new("a")];
        let graph = cache.get_or_build(&models).unwrap();
        assert_eq!(graph.node_count(), 1);
    }
}
