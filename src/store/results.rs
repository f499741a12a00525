//! SPARQL 1.1 JSON results parsing.
//!
//! Rows are turned into fixed-shape records here so that a missing required
//! binding fails the whole query instead of surfacing downstream.

use crate::error::{KgscopeError, Result};
use crate::graph::classify::local_name;
use crate::graph::EntityType;
use crate::store::{LabelMatch, RelationRow};
use serde::Deserialize;
use std::collections::HashMap;

/// `application/sparql-results+json` document for a SELECT query.
#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: SparqlBindings,
}

#[derive(Debug, Default, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SparqlBindings {
    pub bindings: Vec<HashMap<String, SparqlTerm>>,
}

/// One bound RDF term.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlTerm {
    /// `uri`, `literal`, `typed-literal` or `bnode`.
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl SparqlTerm {
    pub fn is_iri(&self) -> bool {
        self.kind == "uri"
    }
}

impl SparqlResults {
    /// Parse a JSON results body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| KgscopeError::StoreQuery(format!("malformed SPARQL JSON results: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.results.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.bindings.is_empty()
    }

    /// Rows of a label search (`?entity ?label ?rank`).
    pub fn into_label_matches(self) -> Result<Vec<LabelMatch>> {
        self.results
            .bindings
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let entity = required(row, "entity", i)?;
                let label = required(row, "label", i)?;
                Ok(LabelMatch {
                    uri: entity.value.clone(),
                    label: label.value.clone(),
                    rank_hint: row.get("rank").and_then(|t| t.value.parse::<f64>().ok()),
                })
            })
            .collect()
    }

    /// Rows of a relation query (`?property ?value ?valueLabel ?type`).
    ///
    /// Non-resource values are dropped; the query already filters them, this
    /// only guards against stores that ignore the filter.
    pub fn into_relation_rows(self) -> Result<Vec<RelationRow>> {
        let mut rows = Vec::with_capacity(self.len());
        for (i, row) in self.results.bindings.iter().enumerate() {
            let property = required(row, "property", i)?;
            let value = required(row, "value", i)?;
            if !value.is_iri() {
                log::debug!("Skipping non-resource value in row {}: {}", i, value.value);
                continue;
            }
            rows.push(RelationRow {
                property: local_name(&property.value).to_string(),
                target_uri: value.value.clone(),
                target_label: row
                    .get("valueLabel")
                    .map(|t| t.value.clone())
                    .filter(|l| !l.trim().is_empty()),
                target_type: EntityType::classify(row.get("type").map(|t| t.value.as_str())),
            });
        }
        Ok(rows)
    }

    /// First `?abstract` value, if any.
    pub fn into_abstract(self) -> Result<Option<String>> {
        match self.results.bindings.first() {
            Some(row) => Ok(Some(required(row, "abstract", 0)?.value.clone())),
            None => Ok(None),
        }
    }
}

fn required<'a>(
    row: &'a HashMap<String, SparqlTerm>,
    var: &str,
    index: usize,
) -> Result<&'a SparqlTerm> {
    row.get(var).ok_or_else(|| {
        KgscopeError::StoreQuery(format!("row {} is missing required binding ?{}", index, var))
    })
}
