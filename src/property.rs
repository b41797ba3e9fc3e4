//! Configuration properties declared by components.
//!
//! Every component publishes the [`PropertyDescriptor`]s it understands. The values configured for
//! a component live in a [`PropertyContext`], which resolves defaults, validates values against
//! their descriptors and evaluates attribute expressions.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::expression;

/// Where a property value may look up `${...}` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionScope {
    /// Value is taken literally.
    None,
    /// Evaluated once against the variable registry, e.g. when a service is enabled.
    VariableRegistry,
    /// Evaluated per record against its attributes.
    RecordAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Any value, including the empty string.
    Any,
    /// Value must not be empty.
    NonEmpty,
}

impl Validator {
    fn check(&self, name: &str, value: &str) -> Result<()> {
        match self {
            Validator::Any => Ok(()),
            Validator::NonEmpty if value.is_empty() => Err(Error::PropertyError(
                ErrorKind::ValidationError(format!("'{name}' must not be empty")),
            )),
            Validator::NonEmpty => Ok(()),
        }
    }
}

/// Describes a single configuration property of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    name: String,
    display_name: String,
    description: String,
    required: bool,
    default_value: Option<String>,
    expression_scope: ExpressionScope,
    validator: Validator,
    dynamic: bool,
}

impl PropertyDescriptor {
    /// Creates an optional, literal property accepting any value.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            description: String::new(),
            required: false,
            default_value: None,
            expression_scope: ExpressionScope::None,
            validator: Validator::Any,
            dynamic: false,
        }
    }

    /// Descriptor for a user-added property the component did not declare up front.
    pub fn dynamic(name: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("Dynamic property: {name}");
        Self {
            dynamic: true,
            ..Self::new(name)
                .with_description(description)
                .with_validator(Validator::NonEmpty)
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_expression_scope(mut self, scope: ExpressionScope) -> Self {
        self.expression_scope = scope;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn expression_scope(&self) -> ExpressionScope {
        self.expression_scope
    }

    pub fn validator(&self) -> Validator {
        self.validator
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Validates an effective value (configured or default) for this property.
    pub fn validate(&self, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.validator.check(&self.name, value),
            None if self.required => Err(Error::PropertyError(ErrorKind::ValidationError(
                format!("'{}' is required", self.name),
            ))),
            None => Ok(()),
        }
    }
}

/// Values configured for one component, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyContext {
    values: HashMap<String, String>,
}

impl PropertyContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Parses a JSON object of `"property": "value"` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON property file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::PropertyError(ErrorKind::ConfigError(format!(
                "reading {}: {e}",
                path.as_ref().display()
            )))
        })?;
        Self::from_json(&content)
    }

    /// The configured value, without falling back to a default.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The configured value, or the descriptor's default when none is configured.
    pub fn get<'a>(&'a self, descriptor: &'a PropertyDescriptor) -> Option<&'a str> {
        self.raw(descriptor.name()).or(descriptor.default_value())
    }

    /// Properties configured here but not declared in `supported`, sorted by name.
    pub fn dynamic_properties(&self, supported: &[&PropertyDescriptor]) -> Vec<(&str, &str)> {
        let mut dynamic: Vec<_> = self
            .values
            .iter()
            .filter(|(name, _)| !supported.iter().any(|d| d.name() == name.as_str()))
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        dynamic.sort_unstable();
        dynamic
    }

    /// Validates every declared property, and every dynamic one when `allow_dynamic` is set.
    /// Undeclared properties are rejected otherwise.
    pub fn validate(&self, supported: &[&PropertyDescriptor], allow_dynamic: bool) -> Result<()> {
        for descriptor in supported {
            descriptor.validate(self.get(descriptor))?;
        }
        for (name, value) in self.dynamic_properties(supported) {
            if !allow_dynamic {
                return Err(Error::PropertyError(ErrorKind::ValidationError(format!(
                    "'{name}' is not a supported property"
                ))));
            }
            PropertyDescriptor::dynamic(name).validate(Some(value))?;
        }
        Ok(())
    }

    /// Evaluates the property's expressions against `variables`. Literal properties are
    /// returned as configured.
    pub fn evaluate(
        &self,
        descriptor: &PropertyDescriptor,
        variables: &HashMap<String, String>,
    ) -> Result<String> {
        let value = self.get(descriptor).ok_or_else(|| {
            Error::PropertyError(ErrorKind::ConfigError(format!(
                "'{}' is not set",
                descriptor.name()
            )))
        })?;
        Ok(match descriptor.expression_scope() {
            ExpressionScope::None => value.to_string(),
            ExpressionScope::VariableRegistry | ExpressionScope::RecordAttributes => {
                expression::evaluate(value, variables)
            }
        })
    }
}
