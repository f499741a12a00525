//! In-memory [`KnowledgeStore`] for unit tests.

use crate::error::{KgscopeError, Result};
use crate::graph::EntityType;
use crate::store::{KnowledgeStore, LabelMatch, RelationRow};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockStore {
    entities: Vec<LabelMatch>,
    relations: HashMap<String, Vec<RelationRow>>,
    abstracts: HashMap<String, String>,
    failing: HashSet<String>,
    fail_all: bool,
    calls: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, uri: &str, label: &str) -> Self {
        self.entities.push(LabelMatch {
            uri: uri.to_string(),
            label: label.to_string(),
            rank_hint: None,
        });
        self
    }

    pub fn with_relation(
        mut self,
        source: &str,
        property: &str,
        target: &str,
        label: Option<&str>,
        target_type: EntityType,
    ) -> Self {
        self.relations
            .entry(source.to_string())
            .or_default()
            .push(RelationRow {
                property: property.to_string(),
                target_uri: target.to_string(),
                target_label: label.map(str::to_string),
                target_type,
            });
        self
    }

    pub fn with_abstract(mut self, uri: &str, text: &str) -> Self {
        self.abstracts.insert(uri.to_string(), text.to_string());
        self
    }

    /// Relation queries for `uri` fail.
    pub fn failing_on(mut self, uri: &str) -> Self {
        self.failing.insert(uri.to_string());
        self
    }

    /// Every query fails.
    pub fn unavailable(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// URIs passed to `find_outgoing_relations`, in call order.
    pub fn relation_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.fail_all {
            return Err(KgscopeError::StoreQuery("Network error: connection refused".to_string()));
        }
        Ok(())
    }
}

impl KnowledgeStore for MockStore {
    async fn find_entities_by_label(&self, text: &str) -> Result<Vec<LabelMatch>> {
        self.check_available()?;
        let needle = text.to_lowercase();
        Ok(self
            .entities
            .iter()
            .filter(|e| e.label.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_outgoing_relations(&self, uri: &str) -> Result<Vec<RelationRow>> {
        self.calls.lock().unwrap().push(uri.to_string());
        self.check_available()?;
        if self.failing.contains(uri) {
            return Err(KgscopeError::StoreQuery(format!("timeout expanding {}", uri)));
        }
        Ok(self.relations.get(uri).cloned().unwrap_or_default())
    }

    async fn find_abstract(&self, uri: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.abstracts.get(uri).cloned())
    }
}
