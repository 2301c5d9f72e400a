//! Vocabulary registry: maps vocabulary prefix URIs to per-property
//! attribute bags.
//!
//! The source is a JSON object keyed by prefix URI:
//!
//! ```json
//! {"http://schema.org/": {"properties": {"name": {"equivalentProperty": ["http://purl.org/dc/terms/title"]}}}}
//! ```
//!
//! Entries keep their load order (serde_json's `preserve_order`), and
//! [`VocabularyRegistry::match_type`] returns the first entry whose prefix
//! matches, so overlapping prefixes resolve by load order. A registry is
//! never mutated after construction and can be shared across runs behind an
//! `Arc`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::debug;

use crate::error::RegistryError;

/// The W3C microdata registry (`http://www.w3.org/ns/md`), embedded at build time.
const BUILTIN_REGISTRY_JSON: &str = include_str!("../data/md.json");

static BUILTIN: OnceLock<Arc<VocabularyRegistry>> = OnceLock::new();

/// A registry attribute value: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Single(String),
    List(Vec<String>),
}

/// Open-ended attribute bag for one property (`subPropertyOf`,
/// `equivalentProperty`, and whatever else the source carries).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PropertyAttributes {
    attributes: HashMap<String, AttributeValue>,
}

impl PropertyAttributes {
    pub fn new(attributes: HashMap<String, AttributeValue>) -> Self {
        Self { attributes }
    }

    pub fn get(&self, attr: &str) -> Option<&AttributeValue> {
        self.attributes.get(attr)
    }

    /// The attribute as a single string. Lists are joined with spaces.
    pub fn get_str(&self, attr: &str) -> Option<String> {
        match self.attributes.get(attr)? {
            AttributeValue::Single(s) => Some(s.clone()),
            AttributeValue::List(items) => Some(items.join(" ")),
        }
    }

    /// The attribute as a list; a single string becomes a one-element list,
    /// a missing attribute an empty one.
    pub fn get_list(&self, attr: &str) -> Vec<String> {
        match self.attributes.get(attr) {
            None => Vec::new(),
            Some(AttributeValue::Single(s)) => vec![s.clone()],
            Some(AttributeValue::List(items)) => items.clone(),
        }
    }
}

/// One vocabulary: its prefix URI and known properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    prefix_uri: String,
    properties: HashMap<String, PropertyAttributes>,
}

impl RegistryEntry {
    pub fn new(prefix_uri: impl Into<String>) -> Self {
        Self {
            prefix_uri: prefix_uri.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, attributes: PropertyAttributes) -> Self {
        self.properties.insert(name.into(), attributes);
        self
    }

    pub fn prefix_uri(&self) -> &str {
        &self.prefix_uri
    }

    pub fn property(&self, name: &str) -> Option<&PropertyAttributes> {
        self.properties.get(name)
    }

    pub fn property_attribute(&self, name: &str, attr: &str) -> Option<String> {
        self.properties.get(name)?.get_str(attr)
    }

    pub fn property_attribute_list(&self, name: &str, attr: &str) -> Vec<String> {
        self.properties
            .get(name)
            .map(|p| p.get_list(attr))
            .unwrap_or_default()
    }
}

/// Serde shape of one entry in the registry source.
#[derive(Deserialize)]
struct EntrySource {
    #[serde(default)]
    properties: HashMap<String, PropertyAttributes>,
}

/// Immutable, ordered collection of [`RegistryEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyRegistry {
    entries: Vec<RegistryEntry>,
}

impl VocabularyRegistry {
    /// Registry from entries already in load order.
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    /// The embedded W3C registry, parsed once per process.
    pub fn builtin() -> Result<Arc<Self>, RegistryError> {
        if let Some(registry) = BUILTIN.get() {
            return Ok(Arc::clone(registry));
        }
        let registry = Arc::new(Self::from_json_str(BUILTIN_REGISTRY_JSON)?);
        // A concurrent initializer may win; both parsed the same data.
        Ok(Arc::clone(BUILTIN.get_or_init(|| registry)))
    }

    /// Load a registry from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a registry from its JSON source.
    pub fn from_json_str(source: &str) -> Result<Self, RegistryError> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RegistryError> {
        let serde_json::Value::Object(map) = value else {
            return Err(RegistryError::Malformed {
                reason: "registry source must be a JSON object".to_string(),
            });
        };

        let mut entries = Vec::with_capacity(map.len());
        for (prefix, entry_value) in map {
            if !entry_value.is_object() {
                return Err(RegistryError::Malformed {
                    reason: format!("entry for {prefix:?} is not an object"),
                });
            }
            let source: EntrySource =
                serde_json::from_value(entry_value).map_err(|e| RegistryError::Malformed {
                    reason: format!("entry for {prefix:?}: {e}"),
                })?;
            let entry = RegistryEntry {
                prefix_uri: prefix,
                properties: source.properties,
            };
            debug!(prefix = %entry.prefix_uri, properties = entry.properties.len(), "registry entry");
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, in load order, whose prefix is a literal prefix of `type_uri`.
    pub fn match_type(&self, type_uri: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| type_uri.starts_with(entry.prefix_uri.as_str()))
    }

    /// Entry whose prefix is exactly `vocabulary`.
    pub fn entry_for_vocabulary(&self, vocabulary: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.prefix_uri == vocabulary)
    }
}
