use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::{Error, ErrorKind, Result};
use crate::hash::{Hasher, Sha256Hasher};
use crate::processor::Processor;
use crate::property::{ExpressionScope, PropertyContext, PropertyDescriptor, Validator};
use crate::provenance::{ProvenanceEvent, ProvenanceReporter, TracingReporter};
use crate::record::{Outcome, Record, Routed};
use crate::shared::{AttributeDoc, ComponentManifest, ComponentType, Documented};

pub const COMPONENT_NAME: &str = "AttributeEnricher";

pub const ATTR_NAME: &str = "name";
pub const ATTR_EMAIL: &str = "email";
pub const ATTR_NAME_HASH: &str = "name.hash";
pub const ATTR_EMAIL_HASH: &str = "email.hash";

/// Default value of the [`TEMPLATE`] property.
pub const DEFAULT_TEMPLATE: &str = "${name} => ${email}";

pub static TEMPLATE: LazyLock<PropertyDescriptor> = LazyLock::new(|| {
    PropertyDescriptor::new("template")
        .with_display_name("Template")
        .with_description(
            "Expression evaluated against the record attributes after enrichment. The result is logged.",
        )
        .required(true)
        .with_default_value(DEFAULT_TEMPLATE)
        .with_expression_scope(ExpressionScope::RecordAttributes)
        .with_validator(Validator::NonEmpty)
});

/// Adds SHA-256 digests of the `name` and `email` attributes to each record.
///
/// Records carrying both attributes get `name.hash` and `email.hash` written (overwriting any
/// previous value) and are routed to [`Outcome::Success`]. Records missing either attribute are
/// routed to [`Outcome::Failure`] untouched.
pub struct AttributeEnricher {
    properties: PropertyContext,
    hasher: Arc<dyn Hasher>,
    provenance: Arc<dyn ProvenanceReporter>,
}

impl AttributeEnricher {
    /// Validates `properties` and builds an enricher hashing with SHA-256 and reporting
    /// provenance to the log.
    pub fn new(properties: PropertyContext) -> Result<Self> {
        properties
            .validate(&Self::supported_properties(), true)
            .map_err(|e| Error::EnricherError(e.kind().clone()))?;
        Ok(Self {
            properties,
            hasher: Arc::new(Sha256Hasher),
            provenance: Arc::new(TracingReporter),
        })
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn Hasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_provenance_reporter(mut self, reporter: Arc<dyn ProvenanceReporter>) -> Self {
        self.provenance = reporter;
        self
    }

    pub fn supported_properties() -> Vec<&'static PropertyDescriptor> {
        vec![&*TEMPLATE]
    }

    /// Descriptor for any property not in [`AttributeEnricher::supported_properties`].
    pub fn dynamic_property_descriptor(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::dynamic(name)
    }

    /// User-added properties. They are validated but otherwise unused.
    pub fn dynamic_properties(&self) -> Vec<(&str, &str)> {
        self.properties.dynamic_properties(&Self::supported_properties())
    }

    fn validate_attributes(record: &Record) -> Result<(&str, &str)> {
        match (record.attribute(ATTR_NAME), record.attribute(ATTR_EMAIL)) {
            (Some(name), Some(email)) => Ok((name, email)),
            (name, email) => Err(Error::EnricherError(ErrorKind::MissingAttribute {
                has_name: name.is_some(),
                has_email: email.is_some(),
            })),
        }
    }

    /// Returns the enriched copy of `record` and the evaluated template.
    fn enrich(&self, record: &Record) -> Result<(Record, String)> {
        let (name, email) = Self::validate_attributes(record)?;
        let hashes = [
            (ATTR_EMAIL_HASH, self.hasher.hash_hex(email.as_bytes())),
            (ATTR_NAME_HASH, self.hasher.hash_hex(name.as_bytes())),
        ];

        let mut enriched = record.clone();
        enriched.put_all_attributes(hashes);

        let evaluated = self
            .properties
            .evaluate(&TEMPLATE, enriched.attributes())
            .map_err(|e| Error::EnricherError(e.kind().clone()))?;
        Ok((enriched, evaluated))
    }
}

#[async_trait]
impl Processor for AttributeEnricher {
    async fn process(&self, record: Record) -> Routed {
        match self.enrich(&record) {
            Ok((enriched, evaluated)) => {
                info!(record = %enriched.uuid(), "Evaluated property as {evaluated}");
                self.provenance.report(ProvenanceEvent::attributes_modified(
                    &enriched,
                    COMPONENT_NAME,
                    format!("Added {ATTR_EMAIL_HASH} and {ATTR_NAME_HASH}"),
                ));
                Routed::success(enriched)
            }
            Err(e) => {
                error!(
                    record = %record.uuid(),
                    missing = ?e.kind().missing_keys(),
                    error = %e,
                    "Error reading attributes"
                );
                Routed::failure(record)
            }
        }
    }
}

impl Documented for AttributeEnricher {
    fn manifest(&self) -> ComponentManifest {
        ComponentManifest::new(ComponentType::Processor, COMPONENT_NAME)
            .with_description("Adds SHA-256 digests of the name and email attributes to each record.")
            .with_tags(&["hash", "sha256", "attributes", "enrich", "sample"])
            .with_input_required(true)
            .with_properties(Self::supported_properties())
            .with_dynamic_properties(true)
            .with_relationships(Outcome::ALL)
            .with_reads_attributes(vec![
                AttributeDoc::new(ATTR_NAME, "Person name"),
                AttributeDoc::new(ATTR_EMAIL, "Person's email"),
            ])
            .with_writes_attributes(vec![
                AttributeDoc::new(ATTR_NAME_HASH, "Hash of name"),
                AttributeDoc::new(ATTR_EMAIL_HASH, "Hash of email"),
            ])
    }
}
