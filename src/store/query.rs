//! SPARQL query text for the three store operations.

use crate::config::StoreConfig;
use crate::error::{KgscopeError, Result};
use crate::graph::EntityType;

const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Characters that may not appear inside a SPARQL `<IRIREF>`.
const IRI_FORBIDDEN: &[char] = &['<', '>', '"', '{', '}', '|', '^', '`', '\\'];

/// Check that `uri` can be embedded as `<uri>` in a query.
///
/// Rejects empty input, whitespace or control characters, IRIREF-forbidden
/// characters and anything that does not parse as an absolute URL.
pub fn validate_uri(uri: &str) -> Result<()> {
    if uri.trim().is_empty() {
        return Err(KgscopeError::InvalidInput("resource identifier is empty".to_string()));
    }
    if uri.chars().any(|c| c.is_whitespace() || c.is_control() || IRI_FORBIDDEN.contains(&c)) {
        return Err(KgscopeError::InvalidInput(format!(
            "resource identifier contains forbidden characters: {}",
            uri
        )));
    }
    url::Url::parse(uri).map_err(|e| {
        KgscopeError::InvalidInput(format!("not an absolute resource identifier '{}': {}", uri, e))
    })?;
    Ok(())
}

/// Escape text for use inside a double-quoted SPARQL string literal.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Label search: `?entity ?label ?rank`, best-ranked first.
pub fn label_search(config: &StoreConfig, text: &str) -> String {
    let class_pattern = if config.search_class.is_empty() {
        String::new()
    } else {
        format!("?entity a <{}> .\n  ", config.search_class)
    };
    let (rank_pattern, order) = if config.rank_property.is_empty() {
        (String::new(), String::new())
    } else {
        (
            format!("OPTIONAL {{ ?entity <{}> ?rank }}\n  ", config.rank_property),
            "ORDER BY DESC(?rank)\n".to_string(),
        )
    };

    format!(
        "SELECT DISTINCT ?entity ?label ?rank WHERE {{\n  \
         {class}?entity <{label_pred}> ?label .\n  \
         {rank}FILTER (langMatches(lang(?label), \"{lang}\"))\n  \
         FILTER (CONTAINS(LCASE(?label), LCASE(\"{text}\")))\n\
         }}\n\
         {order}LIMIT {limit}",
        class = class_pattern,
        label_pred = RDFS_LABEL,
        rank = rank_pattern,
        lang = escape_literal(&config.language),
        text = escape_literal(text),
        order = order,
        limit = config.label_limit,
    )
}

/// Outgoing relations: `?property ?value ?valueLabel ?type`.
///
/// Only resource-valued objects are returned; `?type` is restricted to the
/// recognised entity types.
pub fn outgoing_relations(config: &StoreConfig, uri: &str) -> String {
    let types = EntityType::recognised()
        .map(|name| format!("<{}{}>", config.type_namespace, name))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT ?property ?value ?valueLabel ?type WHERE {{\n  \
         <{uri}> ?property ?value .\n  \
         FILTER (isIRI(?value))\n  \
         OPTIONAL {{\n    \
         ?value <{rdf_type}> ?type .\n    \
         FILTER (?type IN ({types}))\n  \
         }}\n  \
         OPTIONAL {{\n    \
         ?value <{label_pred}> ?valueLabel .\n    \
         FILTER (langMatches(lang(?valueLabel), \"{lang}\"))\n  \
         }}\n\
         }}\n\
         LIMIT {limit}",
        uri = uri,
        rdf_type = RDF_TYPE,
        types = types,
        label_pred = RDFS_LABEL,
        lang = escape_literal(&config.language),
        limit = config.relation_limit,
    )
}

/// Abstract lookup: `?abstract`, at most one row.
pub fn abstract_of(config: &StoreConfig, uri: &str) -> String {
    format!(
        "SELECT ?abstract WHERE {{\n  \
         <{uri}> <{pred}> ?abstract .\n  \
         FILTER (langMatches(lang(?abstract), \"{lang}\"))\n\
         }}\n\
         LIMIT 1",
        uri = uri,
        pred = config.abstract_property,
        lang = escape_literal(&config.language),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uri_accepts_resources() {
        assert!(validate_uri("http://dbpedia.org/resource/Marie_Curie").is_ok());
        assert!(validate_uri("http://dbpedia.org/resource/Curie_(unit)").is_ok());
        assert!(validate_uri("ex:A").is_ok());
    }

    #[test]
    fn test_validate_uri_rejects_bad_input() {
        assert!(matches!(validate_uri(""), Err(KgscopeError::InvalidInput(_))));
        assert!(matches!(validate_uri("   "), Err(KgscopeError::InvalidInput(_))));
        assert!(validate_uri("Marie Curie").is_err());
        assert!(validate_uri("relative/path").is_err());
        // Closing the IRI early would allow query injection
        assert!(validate_uri("http://x.org/a> ?p ?o } #").is_err());
        assert!(validate_uri("http://x.org/{a}").is_err());
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("Curie"), "Curie");
        assert_eq!(escape_literal("O\"Brien"), "O\\\"Brien");
        assert_eq!(escape_literal("a\\b"), "a\\\\b");
        assert_eq!(escape_literal("line\nbreak"), "line\\nbreak");
        assert_eq!(escape_literal("d'Arc"), "d\\'Arc");
    }

    #[test]
    fn test_label_search_query() {
        let config = StoreConfig::default();
        let q = label_search(&config, "Cu\"rie");
        assert!(q.contains("?entity a <http://dbpedia.org/ontology/Person>"));
        assert!(q.contains("LCASE(\"Cu\\\"rie\")"));
        assert!(q.contains("langMatches(lang(?label), \"en\")"));
        assert!(q.contains("ORDER BY DESC(?rank)"));
        assert!(q.ends_with("LIMIT 200"));
    }

    #[test]
    fn test_label_search_without_class_or_rank() {
        let config = StoreConfig {
            search_class: String::new(),
            rank_property: String::new(),
            ..StoreConfig::default()
        };
        let q = label_search(&config, "Curie");
        assert!(!q.contains("?entity a <"));
        assert!(!q.contains("ORDER BY"));
        assert!(!q.contains("OPTIONAL"));
    }

    #[test]
    fn test_outgoing_relations_query() {
        let config = StoreConfig::default();
        let q = outgoing_relations(&config, "http://dbpedia.org/resource/Marie_Curie");
        assert!(q.contains("<http://dbpedia.org/resource/Marie_Curie> ?property ?value"));
        assert!(q.contains("FILTER (isIRI(?value))"));
        assert!(q.contains(
            "<http://dbpedia.org/ontology/Person>, <http://dbpedia.org/ontology/Place>, \
             <http://dbpedia.org/ontology/Event>, <http://dbpedia.org/ontology/Thing>"
        ));
        assert!(q.ends_with("LIMIT 50"));
    }

    #[test]
    fn test_abstract_query() {
        let config = StoreConfig::default();
        let q = abstract_of(&config, "http://dbpedia.org/resource/Marie_Curie");
        assert!(q.contains("<http://dbpedia.org/ontology/abstract> ?abstract"));
        assert!(q.ends_with("LIMIT 1"));
    }
}
