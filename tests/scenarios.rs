use std::sync::Arc;

use flowsample::enricher::{AttributeEnricher, ATTR_EMAIL_HASH, ATTR_NAME_HASH};
use flowsample::gateway::LookupGateway;
use flowsample::hash::sha256_hex;
use flowsample::lookup::IdentityLookup;
use flowsample::processor::Processor;
use flowsample::property::PropertyContext;
use flowsample::provenance::ProvenanceLog;
use flowsample::record::{Outcome, Record};
use flowsample::service::{ConfigurationContext, ConfigurationService};
use flowsample::{write_manifest, ComponentManifest, Documented};
use tempfile::TempDir;

fn person(name: Option<&str>, email: Option<&str>) -> Record {
    let mut record = Record::new(b"{}".to_vec());
    if let Some(name) = name {
        record.put_attribute("name", name);
    }
    if let Some(email) = email {
        record.put_attribute("email", email);
    }
    record
}

#[tokio::test]
async fn bob_is_enriched() {
    let enricher = AttributeEnricher::new(PropertyContext::new()).unwrap();

    let routed = enricher
        .process(person(Some("Bob"), Some("bob@test.com")))
        .await;

    assert_eq!(routed.outcome, Outcome::Success);
    let attrs = routed.record.attributes();
    assert_eq!(attrs.len(), 4);
    assert_eq!(attrs["name"], "Bob");
    assert_eq!(attrs["email"], "bob@test.com");
    assert_eq!(attrs[ATTR_NAME_HASH], sha256_hex("Bob"));
    assert_eq!(attrs[ATTR_EMAIL_HASH], sha256_hex("bob@test.com"));
}

#[tokio::test]
async fn carol_without_email_fails() {
    let enricher = AttributeEnricher::new(PropertyContext::new()).unwrap();
    let input = person(Some("Carol"), None);

    let routed = enricher.process(input.clone()).await;

    assert_eq!(routed.outcome, Outcome::Failure);
    assert_eq!(routed.record.attributes(), input.attributes());
}

#[tokio::test]
async fn every_record_gets_exactly_one_outcome() {
    let log = Arc::new(ProvenanceLog::new());
    let enricher = AttributeEnricher::new(PropertyContext::new())
        .unwrap()
        .with_provenance_reporter(log.clone());

    let inputs = vec![
        person(Some("a"), Some("a@x")),
        person(None, Some("b@x")),
        person(Some("c"), None),
        person(None, None),
        person(Some(""), Some("")),
    ];
    let mut successes = 0;
    let mut failures = 0;
    for input in inputs {
        let uuid = input.uuid();
        let routed = enricher.process(input).await;
        assert_eq!(routed.record.uuid(), uuid);
        match routed.outcome {
            Outcome::Success => successes += 1,
            Outcome::Failure => failures += 1,
        }
    }
    assert_eq!(successes, 2);
    assert_eq!(failures, 3);
    assert_eq!(log.len(), successes);
}

#[tokio::test]
async fn enricher_then_gateway() {
    let service = Arc::new(ConfigurationService::new());
    service
        .on_enabled(&ConfigurationContext::new(
            PropertyContext::new().with_property("sampleProperty", "enabled"),
        ))
        .unwrap();

    let enricher = AttributeEnricher::new(PropertyContext::new()).unwrap();
    let gateway = LookupGateway::new(Arc::new(IdentityLookup::new()), service.clone());

    let enriched = enricher
        .process(person(Some("Alice"), Some("a@x.com")))
        .await;
    assert!(enriched.is_success());

    let routed = gateway.process(enriched.record).await;
    assert_eq!(routed.outcome, Outcome::Success);
    assert_eq!(
        routed.record.content(),
        b"5dc8a287b75db7aa2418dd024626c72d22325cede3f916c220172d3e6e749c52"
    );
    assert_eq!(
        routed.record.attribute(ATTR_NAME_HASH),
        Some("3bc51062973c458d5a6f2d8d64a023246354ad7e064b1e4e009ec8a0699a3043")
    );
}

#[tokio::test]
async fn processors_are_shareable_across_tasks() {
    let enricher = Arc::new(AttributeEnricher::new(PropertyContext::new()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let enricher = Arc::clone(&enricher);
            tokio::spawn(async move {
                let name = format!("user-{i}");
                let routed = enricher
                    .process(person(Some(&name), Some("u@x")))
                    .await;
                (name, routed)
            })
        })
        .collect();

    for handle in handles {
        let (name, routed) = handle.await.unwrap();
        assert!(routed.is_success());
        assert_eq!(
            routed.record.attribute(ATTR_NAME_HASH),
            Some(sha256_hex(&name).as_str())
        );
    }
}

#[test]
fn manifests_for_all_components() -> Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(ConfigurationService::new());
    let manifests = vec![
        AttributeEnricher::new(PropertyContext::new())?.manifest(),
        LookupGateway::new(Arc::new(IdentityLookup::new()), service.clone()).manifest(),
        IdentityLookup::new().manifest(),
        service.manifest(),
    ];

    let tmp_dir = TempDir::new()?;
    let path = tmp_dir.path().join("manifest.json");
    write_manifest(&path, &manifests)?;

    let read_back: Vec<ComponentManifest> =
        serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let names: Vec<_> = read_back.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "AttributeEnricher",
            "LookupGateway",
            "IdentityLookup",
            "ConfigurationService"
        ]
    );
    Ok(())
}
