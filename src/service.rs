//! Controller services shared between processors.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use tracing::{info, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::property::{ExpressionScope, PropertyContext, PropertyDescriptor, Validator};
use crate::shared::{ComponentManifest, ComponentType, Documented};

/// A long-lived collaborator configured once and shared by processors.
pub trait ControllerService: Send + Sync {
    fn do_something(&self);
}

/// Variables available to expressions evaluated outside of a record, e.g. when a service is
/// enabled.
pub type VariableRegistry = HashMap<String, String>;

/// Everything a service needs when it is enabled.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationContext {
    pub properties: PropertyContext,
    pub variables: VariableRegistry,
}

impl ConfigurationContext {
    pub fn new(properties: PropertyContext) -> Self {
        Self {
            properties,
            variables: VariableRegistry::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

pub static SAMPLE_PROPERTY: LazyLock<PropertyDescriptor> = LazyLock::new(|| {
    PropertyDescriptor::new("sampleProperty")
        .with_display_name("Sample Property")
        .with_description("A value evaluated against the variable registry when the service is enabled.")
        .required(true)
        .with_validator(Validator::NonEmpty)
        .with_expression_scope(ExpressionScope::VariableRegistry)
});

/// Configuration service that evaluates `sampleProperty` once on enable and caches the result.
#[derive(Debug, Default)]
pub struct ConfigurationService {
    sample_value: RwLock<Option<String>>,
}

impl ConfigurationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supported_properties() -> Vec<&'static PropertyDescriptor> {
        vec![&*SAMPLE_PROPERTY]
    }

    /// Validates the configuration and caches the evaluated `sampleProperty`.
    pub fn on_enabled(&self, context: &ConfigurationContext) -> Result<()> {
        context
            .properties
            .validate(&Self::supported_properties(), false)
            .map_err(|e| Error::ServiceError(e.kind().clone()))?;

        let value = context
            .properties
            .evaluate(&SAMPLE_PROPERTY, &context.variables)
            .map_err(|e| Error::ServiceError(e.kind().clone()))?;
        if value.is_empty() {
            return Err(Error::ServiceError(ErrorKind::ConfigError(format!(
                "'{}' evaluated to an empty value",
                SAMPLE_PROPERTY.name()
            ))));
        }

        let mut cached = self.sample_value.write().map_err(|_| {
            Error::ServiceError(ErrorKind::InternalError("configuration lock poisoned".into()))
        })?;
        info!(sample_value = %value, "Configuration service enabled");
        *cached = Some(value);
        Ok(())
    }

    /// Drops the cached value.
    pub fn on_disabled(&self) {
        match self.sample_value.write() {
            Ok(mut cached) => *cached = None,
            Err(_) => warn!("Configuration lock poisoned while disabling"),
        }
    }

    /// The value cached by the last successful [`ConfigurationService::on_enabled`].
    pub fn sample_value(&self) -> Option<String> {
        self.sample_value.read().ok().and_then(|v| v.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.sample_value().is_some()
    }
}

impl ControllerService for ConfigurationService {
    fn do_something(&self) {
        info!("Did something");
    }
}

impl Documented for ConfigurationService {
    fn manifest(&self) -> ComponentManifest {
        ComponentManifest::new(ComponentType::ControllerService, "ConfigurationService")
            .with_description("Evaluates a configured value once when enabled and shares it.")
            .with_tags(&["configuration", "sample"])
            .with_properties(Self::supported_properties())
    }
}
