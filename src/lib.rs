pub mod config;
pub mod error;
pub mod graph;
pub mod render;
pub mod resolve;
pub mod store;
pub mod web;

pub use config::Config;
pub use error::{KgscopeError, Result};
pub use graph::{EntityType, GraphBuilder, GraphLimits, KnowledgeGraph};
pub use render::{RenderAdapter, RenderModel};
pub use resolve::{Candidate, Resolution, Resolver};
pub use store::{KnowledgeStore, SparqlClient};
