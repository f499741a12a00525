//! Coarse entity typing from store type annotations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse semantic category used for display coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Person,
    Place,
    Event,
    Thing,
    Default,
}

/// Recognised type-URI local names, in classification priority order.
const TYPE_SUFFIXES: [(&str, EntityType); 4] = [
    ("Person", EntityType::Person),
    ("Place", EntityType::Place),
    ("Event", EntityType::Event),
    ("Thing", EntityType::Thing),
];

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Person,
        EntityType::Place,
        EntityType::Event,
        EntityType::Thing,
        EntityType::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "Person",
            EntityType::Place => "Place",
            EntityType::Event => "Event",
            EntityType::Thing => "Thing",
            EntityType::Default => "Default",
        }
    }

    /// Classify a type URI such as `http://dbpedia.org/ontology/Place`.
    ///
    /// Matches the URI's local name (after the last `/` or `#`) against the
    /// recognised names; anything else is `Default`.
    pub fn from_type_uri(type_uri: &str) -> Self {
        let local = local_name(type_uri);
        TYPE_SUFFIXES
            .iter()
            .find(|(suffix, _)| *suffix == local)
            .map(|(_, t)| *t)
            .unwrap_or(EntityType::Default)
    }

    /// Classify an optional annotation; absent means `Default`.
    pub fn classify(type_uri: Option<&str>) -> Self {
        type_uri.map(Self::from_type_uri).unwrap_or(EntityType::Default)
    }

    /// Local names the store should be asked to report, i.e. every variant but `Default`.
    pub fn recognised() -> impl Iterator<Item = &'static str> {
        TYPE_SUFFIXES.iter().map(|(suffix, _)| *suffix)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown entity type '{}'", s))
    }
}

/// Trailing segment of a URI after the last `/` or `#`.
pub(crate) fn local_name(uri: &str) -> &str {
    uri.rsplit(['/', '#']).next().unwrap_or(uri)
}
