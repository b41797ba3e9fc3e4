use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::{Error, ErrorKind, Result};
use crate::lookup::LookupService;
use crate::processor::Processor;
use crate::property::PropertyDescriptor;
use crate::provenance::{ProvenanceEvent, ProvenanceReporter, TracingReporter};
use crate::record::{Outcome, Record, Routed};
use crate::service::ControllerService;
use crate::shared::{ComponentManifest, ComponentType, Documented};

pub const COMPONENT_NAME: &str = "LookupGateway";

/// Number of times the controller service is invoked before each lookup.
pub const DEFAULT_DEMONSTRATION_CALLS: usize = 20;

pub static LOOKUP_SERVICE: LazyLock<PropertyDescriptor> = LazyLock::new(|| {
    PropertyDescriptor::new("lookup-service")
        .with_display_name("Lookup Service")
        .with_description("Lookup service queried with the attributes of each record.")
        .required(true)
});

pub static CONTROLLER_SERVICE: LazyLock<PropertyDescriptor> = LazyLock::new(|| {
    PropertyDescriptor::new("controller-service")
        .with_display_name("Controller Service")
        .with_description("Controller service invoked before each lookup.")
        .required(true)
});

/// Replaces the content of each record with the result of a lookup on its attributes.
///
/// A present result routes the record to [`Outcome::Success`]. An absent result, a failed
/// lookup, or a lookup that panics routes it to [`Outcome::Failure`] with its content untouched.
pub struct LookupGateway {
    lookup: Arc<dyn LookupService>,
    service: Arc<dyn ControllerService>,
    provenance: Arc<dyn ProvenanceReporter>,
    demonstration_calls: usize,
}

impl LookupGateway {
    pub fn new(lookup: Arc<dyn LookupService>, service: Arc<dyn ControllerService>) -> Self {
        Self {
            lookup,
            service,
            provenance: Arc::new(TracingReporter),
            demonstration_calls: DEFAULT_DEMONSTRATION_CALLS,
        }
    }

    pub fn with_provenance_reporter(mut self, reporter: Arc<dyn ProvenanceReporter>) -> Self {
        self.provenance = reporter;
        self
    }

    /// Sets how many times [`ControllerService::do_something`] runs before each lookup. The calls
    /// have no effect on routing; 0 disables them.
    pub fn with_demonstration_calls(mut self, calls: usize) -> Self {
        self.demonstration_calls = calls;
        self
    }

    pub fn demonstration_calls(&self) -> usize {
        self.demonstration_calls
    }

    pub fn supported_properties() -> Vec<&'static PropertyDescriptor> {
        vec![&*LOOKUP_SERVICE, &*CONTROLLER_SERVICE]
    }

    async fn run_lookup(&self, record: &Record) -> Result<Option<String>> {
        let lookup = Arc::clone(&self.lookup);
        let coordinates = record.attributes().clone();

        // A new task is spawned to catch the panic
        let lookup_task = tokio::spawn(async move { lookup.lookup(&coordinates).await });

        match lookup_task.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(Error::GatewayError(ErrorKind::LookupFailure(e.to_string()))),
            Err(e) => Err(Error::GatewayError(ErrorKind::LookupFailure(format!(
                "lookup task failed: {e:?}"
            )))),
        }
    }
}

#[async_trait]
impl Processor for LookupGateway {
    async fn process(&self, mut record: Record) -> Routed {
        for _ in 0..self.demonstration_calls {
            self.service.do_something();
        }

        match self.run_lookup(&record).await {
            Ok(Some(value)) => {
                record.write_content(value.into_bytes());
                self.provenance
                    .report(ProvenanceEvent::content_modified(&record, COMPONENT_NAME));
                Routed::success(record)
            }
            Ok(None) => {
                debug!(record = %record.uuid(), "Lookup returned no value");
                Routed::failure(record)
            }
            Err(e) => {
                error!(record = %record.uuid(), error = ?e, "Error processing something.");
                Routed::failure(record)
            }
        }
    }
}

impl Documented for LookupGateway {
    fn manifest(&self) -> ComponentManifest {
        ComponentManifest::new(ComponentType::Processor, COMPONENT_NAME)
            .with_description(
                "Replaces record content with the value a lookup service returns for its attributes.",
            )
            .with_tags(&["lookup", "enrich", "sample"])
            .with_input_required(true)
            .with_properties(Self::supported_properties())
            .with_relationships(Outcome::ALL)
            .with_metadata("lookup.value.type", format!("{:?}", self.lookup.value_type()))
    }
}
