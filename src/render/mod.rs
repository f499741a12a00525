//! Render adapter: knowledge graph to the vis-network data model.
//!
//! Pure transform, no store access. The serialized [`RenderModel`] is what the
//! browser-side renderer consumes (`nodes`, `edges`, `options`).

mod html;

pub use html::{escape_html, render_fragment};

use crate::config::RenderConfig;
use crate::error::{KgscopeError, Result};
use crate::graph::{EntityType, KnowledgeGraph};
use serde::Serialize;
use std::collections::HashMap;

const FALLBACK_COLOR: &str = "#6a3d9a";

/// Immutable type -> color lookup, built once at startup.
#[derive(Debug, Clone)]
pub struct ColorTable {
    colors: HashMap<EntityType, String>,
    fallback: String,
}

impl ColorTable {
    /// Build from `type name -> color` pairs. The `Default` entry, if present,
    /// becomes the fallback for unlisted types.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut colors = HashMap::new();
        for (name, color) in pairs {
            let entity_type = name
                .parse::<EntityType>()
                .map_err(KgscopeError::Config)?;
            colors.insert(entity_type, color.clone());
        }
        let fallback = colors
            .get(&EntityType::Default)
            .cloned()
            .unwrap_or_else(|| FALLBACK_COLOR.to_string());
        Ok(Self { colors, fallback })
    }

    pub fn color_for(&self, entity_type: EntityType) -> &str {
        self.colors
            .get(&entity_type)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        let config = RenderConfig::default();
        // The built-in table only holds valid type names
        Self::from_pairs(&config.colors).unwrap_or(Self {
            colors: HashMap::new(),
            fallback: FALLBACK_COLOR.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisNode {
    pub id: String,
    pub label: String,
    pub color: String,
    /// Hover tooltip.
    pub title: String,
    pub shape: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub arrows: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarnesHut {
    pub gravitational_constant: f64,
    pub spring_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsOptions {
    pub enabled: bool,
    pub barnes_hut: BarnesHut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionOptions {
    pub hover: bool,
    pub navigation_buttons: bool,
    pub keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisOptions {
    pub physics: PhysicsOptions,
    pub interaction: InteractionOptions,
}

/// Everything the renderer needs to draw one graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub nodes: Vec<VisNode>,
    pub edges: Vec<VisEdge>,
    pub options: VisOptions,
}

/// Maps graphs to render models using injected colors and layout constants.
#[derive(Debug, Clone)]
pub struct RenderAdapter {
    colors: ColorTable,
    barnes_hut: BarnesHut,
}

impl RenderAdapter {
    pub fn new(colors: ColorTable, gravitational_constant: f64, spring_length: f64) -> Self {
        Self {
            colors,
            barnes_hut: BarnesHut {
                gravitational_constant,
                spring_length,
            },
        }
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Ok(Self::new(
            ColorTable::from_pairs(&config.colors)?,
            config.gravitational_constant,
            config.spring_length,
        ))
    }

    /// Map nodes and edges in graph order; interaction affordances are always on.
    pub fn to_render_model(&self, graph: &KnowledgeGraph, physics: bool) -> RenderModel {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| VisNode {
                id: node.uri.clone(),
                label: node.label.clone(),
                color: self.colors.color_for(node.entity_type).to_string(),
                title: node.uri.clone(),
                shape: "dot",
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| VisEdge {
                from: edge.source.clone(),
                to: edge.target.clone(),
                label: edge.property.clone(),
                arrows: "to",
            })
            .collect();

        RenderModel {
            nodes,
            edges,
            options: VisOptions {
                physics: PhysicsOptions {
                    enabled: physics,
                    barnes_hut: self.barnes_hut.clone(),
                },
                interaction: InteractionOptions {
                    hover: true,
                    navigation_buttons: true,
                    keyboard: true,
                },
            },
        }
    }
}

impl Default for RenderAdapter {
    fn default() -> Self {
        let config = RenderConfig::default();
        Self::new(
            ColorTable::default(),
            config.gravitational_constant,
            config.spring_length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::with_root("ex:curie", "Marie Curie", EntityType::Person);
        graph.add_node("ex:warsaw", "Warsaw", EntityType::Place);
        graph.add_node("ex:nobel", "Nobel Prize", EntityType::Default);
        graph.add_edge("ex:curie", "birthPlace", "ex:warsaw");
        graph.add_edge("ex:curie", "award", "ex:nobel");
        graph
    }

    #[test]
    fn test_nodes_colored_by_type() {
        let model = RenderAdapter::default().to_render_model(&sample_graph(), true);
        assert_eq!(model.nodes.len(), 3);
        assert_eq!(model.nodes[0].id, "ex:curie");
        assert_eq!(model.nodes[0].color, "#1f78b4");
        assert_eq!(model.nodes[1].color, "#33a02c");
        assert_eq!(model.nodes[2].color, "#6a3d9a");
    }

    #[test]
    fn test_edges_carry_property_labels() {
        let model = RenderAdapter::default().to_render_model(&sample_graph(), true);
        assert_eq!(model.edges.len(), 2);
        assert_eq!(model.edges[0].from, "ex:curie");
        assert_eq!(model.edges[0].to, "ex:warsaw");
        assert_eq!(model.edges[0].label, "birthPlace");
        assert_eq!(model.edges[0].arrows, "to");
    }

    #[test]
    fn test_physics_toggle_keeps_interaction() {
        let adapter = RenderAdapter::default();
        let on = adapter.to_render_model(&sample_graph(), true);
        let off = adapter.to_render_model(&sample_graph(), false);
        assert!(on.options.physics.enabled);
        assert!(!off.options.physics.enabled);
        assert_eq!(on.options.interaction, off.options.interaction);
        assert!(off.options.interaction.hover);
        assert!(off.options.interaction.navigation_buttons);
        assert!(off.options.interaction.keyboard);
    }

    #[test]
    fn test_options_serialize_in_vis_shape() {
        let model = RenderAdapter::default().to_render_model(&sample_graph(), false);
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["options"]["physics"]["enabled"], false);
        assert_eq!(
            json["options"]["physics"]["barnesHut"]["gravitationalConstant"],
            -8000.0
        );
        assert_eq!(json["options"]["physics"]["barnesHut"]["springLength"], 250.0);
        assert_eq!(json["options"]["interaction"]["navigationButtons"], true);
    }

    #[test]
    fn test_render_is_deterministic() {
        let adapter = RenderAdapter::default();
        let graph = sample_graph();
        assert_eq!(
            adapter.to_render_model(&graph, true),
            adapter.to_render_model(&graph, true)
        );
    }

    #[test]
    fn test_partial_color_table_falls_back() {
        let mut colors = BTreeMap::new();
        colors.insert("Place".to_string(), "#00ff00".to_string());
        let table = ColorTable::from_pairs(&colors).unwrap();
        assert_eq!(table.color_for(EntityType::Place), "#00ff00");
        assert_eq!(table.color_for(EntityType::Person), FALLBACK_COLOR);

        colors.insert("Default".to_string(), "#cccccc".to_string());
        let table = ColorTable::from_pairs(&colors).unwrap();
        assert_eq!(table.color_for(EntityType::Event), "#cccccc");
    }

    #[test]
    fn test_unknown_color_key_rejected() {
        let mut colors = BTreeMap::new();
        colors.insert("Organisation".to_string(), "#000000".to_string());
        assert!(matches!(
            ColorTable::from_pairs(&colors),
            Err(KgscopeError::Config(_))
        ));
    }
}
