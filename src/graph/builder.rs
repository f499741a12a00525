//! Bounded BFS expansion over a remote knowledge store.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::GraphConfig;
use crate::graph::classify::local_name;
use crate::graph::{EntityType, KnowledgeGraph, StopReason};
use crate::store::KnowledgeStore;

/// Budgets for one build. All three caps apply independently.
#[derive(Debug, Clone)]
pub struct GraphLimits {
    /// Includes the root, so values below 1 are raised to 1.
    pub max_nodes: usize,
    pub max_edges: usize,
    /// Nodes at this depth or deeper are never expanded.
    pub max_depth: usize,
    pub root_type: EntityType,
    /// Checked between relation queries, never mid-query.
    pub deadline: Option<Duration>,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl From<&GraphConfig> for GraphLimits {
    fn from(config: &GraphConfig) -> Self {
        Self {
            max_nodes: config.max_nodes,
            max_edges: config.max_edges,
            max_depth: config.max_depth,
            root_type: config.root_type,
            deadline: (config.build_timeout_secs > 0)
                .then(|| Duration::from_secs(config.build_timeout_secs)),
        }
    }
}

/// Builds one size-capped graph per call. Holds no state between builds.
pub struct GraphBuilder<'a, S> {
    store: &'a S,
    limits: GraphLimits,
}

impl<'a, S: KnowledgeStore> GraphBuilder<'a, S> {
    pub fn new(store: &'a S, mut limits: GraphLimits) -> Self {
        limits.max_nodes = limits.max_nodes.max(1);
        Self { store, limits }
    }

    /// Expand the neighborhood of `root_uri` breadth-first.
    ///
    /// Relation queries are issued one at a time in queue order. A failed
    /// query leaves that node as a leaf and the build continues. Hitting a cap
    /// or the deadline is a normal stop and yields a partial graph.
    pub async fn build(&self, root_uri: &str, root_label: &str) -> KnowledgeGraph {
        let started = Instant::now();
        let limits = &self.limits;
        let mut graph = KnowledgeGraph::with_root(root_uri, root_label, limits.root_type);
        let mut queue = VecDeque::new();
        queue.push_back((root_uri.to_string(), 0usize));

        let stop_reason = loop {
            if let Some(reason) = self.cap_reached(&graph) {
                break reason;
            }
            if limits.deadline.is_some_and(|d| started.elapsed() >= d) {
                break StopReason::Deadline;
            }
            let Some((uri, depth)) = queue.pop_front() else {
                break StopReason::Exhausted;
            };
            if depth >= limits.max_depth {
                continue;
            }

            let relations = match self.store.find_outgoing_relations(&uri).await {
                Ok(relations) => relations,
                Err(e) => {
                    log::warn!("Skipping expansion of {}: {}", uri, e);
                    graph.report.failed.push(uri);
                    continue;
                }
            };
            graph.report.expanded += 1;
            log::debug!("{} (depth {}): {} relations", uri, depth, relations.len());

            for rel in relations {
                if self.cap_reached(&graph).is_some() {
                    break;
                }
                if !graph.contains_node(&rel.target_uri) {
                    let label = rel
                        .target_label
                        .clone()
                        .unwrap_or_else(|| humanize_uri(&rel.target_uri));
                    graph.add_node(&rel.target_uri, &label, rel.target_type);
                    if depth + 1 < limits.max_depth {
                        queue.push_back((rel.target_uri.clone(), depth + 1));
                    }
                }
                if !graph.add_edge(&uri, &rel.property, &rel.target_uri) {
                    graph.report.duplicates += 1;
                }
            }
        };

        graph.report.stop_reason = stop_reason;
        log::info!(
            "Built graph for {}: {} nodes, {} edges, {} expanded, {} failed, stopped on {:?} after {:?}",
            root_uri,
            graph.node_count(),
            graph.edge_count(),
            graph.report.expanded,
            graph.report.failed.len(),
            stop_reason,
            started.elapsed()
        );
        graph
    }

    fn cap_reached(&self, graph: &KnowledgeGraph) -> Option<StopReason> {
        if graph.node_count() >= self.limits.max_nodes {
            Some(StopReason::NodeCap)
        } else if graph.edge_count() >= self.limits.max_edges {
            Some(StopReason::EdgeCap)
        } else {
            None
        }
    }
}

/// Display label derived from a URI: its trailing segment with underscores as spaces.
pub fn humanize_uri(uri: &str) -> String {
    let local = local_name(uri);
    if local.is_empty() {
        return uri.to_string();
    }
    local.replace('_', " ")
}
