//! Types and constants used across flowsample
//!
//! Every component can describe itself as a [`ComponentManifest`]: what it is, which properties it
//! accepts, where it routes records and which attributes it reads and writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::property::PropertyDescriptor;
use crate::record::Outcome;

/// Crate version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Kinds of components shipped by this crate
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Processor,
    LookupService,
    ControllerService,
}

/// A named record attribute and what it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDoc {
    pub attribute: String,
    pub description: String,
}

impl AttributeDoc {
    pub fn new(attribute: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDoc {
    pub name: String,
    pub description: String,
}

impl From<Outcome> for RelationshipDoc {
    fn from(outcome: Outcome) -> Self {
        Self {
            name: outcome.name().to_string(),
            description: outcome.description().to_string(),
        }
    }
}

/// Self-description of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentManifest {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether the component only runs when handed an incoming record.
    #[serde(default)]
    pub input_required: bool,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default)]
    pub supports_dynamic_properties: bool,
    #[serde(default)]
    pub relationships: Vec<RelationshipDoc>,
    #[serde(default)]
    pub reads_attributes: Vec<AttributeDoc>,
    #[serde(default)]
    pub writes_attributes: Vec<AttributeDoc>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>, // Metadata is optional
}

impl ComponentManifest {
    pub fn new(component_type: ComponentType, name: impl Into<String>) -> Self {
        Self {
            component_type,
            name: name.into(),
            version: VERSION.to_string(),
            description: String::new(),
            tags: Vec::new(),
            input_required: false,
            properties: Vec::new(),
            supports_dynamic_properties: false,
            relationships: Vec::new(),
            reads_attributes: Vec::new(),
            writes_attributes: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_input_required(mut self, required: bool) -> Self {
        self.input_required = required;
        self
    }

    pub fn with_properties<'a>(
        mut self,
        properties: impl IntoIterator<Item = &'a PropertyDescriptor>,
    ) -> Self {
        self.properties = properties.into_iter().cloned().collect();
        self
    }

    pub fn with_dynamic_properties(mut self, supported: bool) -> Self {
        self.supports_dynamic_properties = supported;
        self
    }

    pub fn with_relationships(mut self, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        self.relationships = outcomes.into_iter().map(RelationshipDoc::from).collect();
        self
    }

    pub fn with_reads_attributes(mut self, attributes: Vec<AttributeDoc>) -> Self {
        self.reads_attributes = attributes;
        self
    }

    pub fn with_writes_attributes(mut self, attributes: Vec<AttributeDoc>) -> Self {
        self.writes_attributes = attributes;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Implemented by every component that can publish a [`ComponentManifest`].
pub trait Documented {
    fn manifest(&self) -> ComponentManifest;
}
