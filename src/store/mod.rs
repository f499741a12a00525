//! Remote knowledge store access.
//!
//! [`KnowledgeStore`] is the seam between the resolver / graph builder and the
//! network. [`SparqlClient`] implements it against a SPARQL 1.1 endpoint.

pub mod query;
pub mod results;
mod sparql;

#[cfg(test)]
pub(crate) mod mock;

pub use sparql::SparqlClient;

use crate::error::Result;
use crate::graph::EntityType;
use serde::Serialize;
use std::future::Future;

/// An entity whose label matched a label search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelMatch {
    pub uri: String,
    pub label: String,
    /// Store-side popularity hint used for ordering, when available.
    pub rank_hint: Option<f64>,
}

/// One outgoing relation of a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationRow {
    /// Predicate local name, e.g. `birthPlace`.
    pub property: String,
    pub target_uri: String,
    pub target_label: Option<String>,
    /// Already classified; `Default` when the store reported no recognised type.
    pub target_type: EntityType,
}

/// Read-only access to a remote triple store.
///
/// Every call is one round trip. `Err` always means the query failed; an empty
/// `Ok` means the store answered with no rows. Result sizes are capped by the
/// store-side query, so callers must not assume completeness.
pub trait KnowledgeStore: Send + Sync {
    /// Entities whose label contains `text`, case-insensitively.
    fn find_entities_by_label(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<LabelMatch>>> + Send;

    /// Outgoing relations of `uri`, in store order.
    fn find_outgoing_relations(
        &self,
        uri: &str,
    ) -> impl Future<Output = Result<Vec<RelationRow>>> + Send;

    /// Short text abstract of `uri`, if the store has one.
    fn find_abstract(&self, uri: &str) -> impl Future<Output = Result<Option<String>>> + Send;
}
