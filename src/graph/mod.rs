//! Knowledge graph module: entity classification and bounded BFS expansion.
//!
//! Starts from a resolved entity, pulls outgoing relations from a
//! [`KnowledgeStore`](crate::store::KnowledgeStore) level by level and
//! accumulates a size-capped directed graph for rendering.

mod builder;
pub(crate) mod classify;

pub use builder::{humanize_uri, GraphBuilder, GraphLimits};
pub use classify::EntityType;

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A single entity in the graph, unique by URI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Resource identifier, e.g. `http://dbpedia.org/resource/Marie_Curie`.
    pub uri: String,
    /// Human-readable label.
    pub label: String,
    /// Coarse type assigned when the node was discovered.
    pub entity_type: EntityType,
}

/// A directed relation (source --property--> target).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub source: String,
    /// Local name of the predicate, e.g. `birthPlace`.
    pub property: String,
    pub target: String,
}

/// Why a build stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every queued node was expanded or skipped.
    Exhausted,
    NodeCap,
    EdgeCap,
    Deadline,
}

/// Statistics recorded while building one graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    /// Number of relation queries issued.
    pub expanded: usize,
    /// Nodes whose relation query failed and were left as leaves.
    pub failed: Vec<String>,
    /// Relations dropped because the same (source, property, target) was already present.
    pub duplicates: usize,
    pub stop_reason: StopReason,
}

impl Default for BuildReport {
    fn default() -> Self {
        Self {
            expanded: 0,
            failed: Vec::new(),
            duplicates: 0,
            stop_reason: StopReason::Exhausted,
        }
    }
}

/// Graph produced by one build request.
///
/// Nodes keep insertion order (root first, then BFS discovery order), which
/// makes render output deterministic for a given store response.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    pub report: BuildReport,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    edge_set: HashSet<GraphEdge>,
}

impl KnowledgeGraph {
    /// Create a graph holding only the root entity.
    pub fn with_root(uri: &str, label: &str, entity_type: EntityType) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            report: BuildReport::default(),
            node_index: HashMap::new(),
            edge_set: HashSet::new(),
        };
        graph.add_node(uri, label, entity_type);
        graph
    }

    /// Add a node if its URI is new. Returns false when it already existed;
    /// the existing label and type are kept.
    pub fn add_node(&mut self, uri: &str, label: &str, entity_type: EntityType) -> bool {
        if self.node_index.contains_key(uri) {
            return false;
        }
        self.node_index.insert(uri.to_string(), self.nodes.len());
        self.nodes.push(GraphNode {
            uri: uri.to_string(),
            label: label.to_string(),
            entity_type,
        });
        true
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// Returns false if the exact (source, property, target) triple is already
    /// present or if either endpoint is not a node.
    pub fn add_edge(&mut self, source: &str, property: &str, target: &str) -> bool {
        if !self.contains_node(source) || !self.contains_node(target) {
            log::debug!("Refusing dangling edge {} -{}-> {}", source, property, target);
            return false;
        }
        let edge = GraphEdge {
            source: source.to_string(),
            property: property.to_string(),
            target: target.to_string(),
        };
        if !self.edge_set.insert(edge.clone()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains_node(&self, uri: &str) -> bool {
        self.node_index.contains_key(uri)
    }

    pub fn node(&self, uri: &str) -> Option<&GraphNode> {
        self.node_index.get(uri).map(|&i| &self.nodes[i])
    }

    /// The seed entity.
    pub fn root(&self) -> &GraphNode {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
