//! Sample record processors and services for flow-based pipelines.
//!
//! It ships two [processors](processor::Processor), a [lookup service](lookup::LookupService) and a
//! [controller service](service::ControllerService):
//!
//! - [`enricher::AttributeEnricher`] adds SHA-256 digests of the `name` and `email` attributes.
//! - [`gateway::LookupGateway`] replaces a record's content with the result of a lookup.
//! - [`lookup::IdentityLookup`] hashes `name` and `email` into one identity digest.
//! - [`service::ConfigurationService`] holds configuration shared between processors.
//!
//! Processors are handed one record at a time and return it together with the single
//! [`record::Outcome`] it was routed to.

/// shared manifest types
mod shared;

pub use shared::{
    write_manifest, AttributeDoc, ComponentManifest, ComponentType, Documented, RelationshipDoc,
};

/// records and outcomes.
pub mod record;

/// processor is the trait every record handler implements.
pub mod processor;

/// enricher hashes identity attributes.
pub mod enricher;

/// gateway routes records on the result of a lookup.
pub mod gateway;

/// lookup services.
pub mod lookup;

/// controller services.
pub mod service;

pub mod property;

pub mod expression;

pub mod hash;

pub mod provenance;

// Error handling
//
// No error crosses `Processor::process`. Whatever goes wrong while handling a record (a missing
// attribute, a failed or panicking lookup) is logged where it happens and the record is routed to
// `Outcome::Failure`. A failed record is not retried here; redelivery is up to whoever called
// `process`.
//
// Configuration and lifecycle calls (building a processor, enabling a service, writing manifests)
// return `error::Result` so that misconfiguration surfaces before any record is processed.

/// error module
pub mod error;
