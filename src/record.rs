use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record is the unit of data handed to a processor. It carries a set of string attributes and an
/// opaque content payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    uuid: Uuid,
    entry_date: DateTime<Utc>,
    attributes: HashMap<String, String>,
    content: Vec<u8>,
}

impl Record {
    /// Creates a new record with the specified content and no attributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsample::record::Record;
    /// let record = Record::new(b"payload".to_vec());
    /// assert!(record.attributes().is_empty());
    /// ```
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            entry_date: Utc::now(),
            attributes: HashMap::new(),
            content,
        }
    }

    /// Sets a single attribute, replacing any previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowsample::record::Record;
    /// let record = Record::new(vec![]).with_attribute("name", "Alice");
    /// assert_eq!(record.attribute("name"), Some("Alice"));
    /// ```
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Merges the given attributes into the record.
    pub fn with_attributes<K, V>(mut self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.put_all_attributes(attributes);
        self
    }

    /// Replaces the content payload.
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// Unique identifier assigned when the record was created.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Time the record was created.
    pub fn entry_date(&self) -> DateTime<Utc> {
        self.entry_date
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn put_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Inserts every attribute, overwriting keys that already exist.
    pub fn put_all_attributes<K, V>(&mut self, attributes: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Overwrites the content payload.
    pub fn write_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
    }
}

/// The relationship a record is transferred to once a processor is done with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Every outcome a processor may route to.
    pub const ALL: [Outcome; 2] = [Outcome::Success, Outcome::Failure];

    /// Relationship name as seen by the pipeline.
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Outcome::Success => "Records that were processed successfully are routed here.",
            Outcome::Failure => "Records that could not be processed are routed here.",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record together with the single outcome it was transferred to.
#[derive(Debug, Clone, PartialEq)]
pub struct Routed {
    pub record: Record,
    pub outcome: Outcome,
}

impl Routed {
    pub fn success(record: Record) -> Self {
        Self {
            record,
            outcome: Outcome::Success,
        }
    }

    pub fn failure(record: Record) -> Self {
        Self {
            record,
            outcome: Outcome::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn into_parts(self) -> (Record, Outcome) {
        (self.record, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_attributes_and_content() {
        let record = Record::new("hello".into())
            .with_attribute("name", "Alice")
            .with_attributes([("email", "alice@example.com"), ("name", "Alicia")]);

        assert_eq!(record.content(), b"hello");
        assert_eq!(record.attribute("name"), Some("Alicia"));
        assert_eq!(record.attribute("email"), Some("alice@example.com"));
        assert_eq!(record.attribute("missing"), None);
    }

    #[test]
    fn mutation_keeps_identity() {
        let mut record = Record::new(vec![]);
        let uuid = record.uuid();
        let entry_date = record.entry_date();

        record.put_attribute("k", "v");
        record.write_content("new content");

        assert_eq!(record.uuid(), uuid);
        assert_eq!(record.entry_date(), entry_date);
        assert_eq!(record.content(), b"new content");
    }

    #[test]
    fn records_get_distinct_ids() {
        assert_ne!(Record::new(vec![]).uuid(), Record::new(vec![]).uuid());
    }

    #[test]
    fn outcome_names() {
        assert_eq!(Outcome::Success.to_string(), "success");
        assert_eq!(Outcome::Failure.name(), "failure");
        assert_eq!(
            serde_json::to_string(&Outcome::Failure).unwrap(),
            "\"failure\""
        );
    }

    #[test]
    fn routed_helpers() {
        let routed = Routed::success(Record::new(vec![1]));
        assert!(routed.is_success());
        let (record, outcome) = Routed::failure(routed.record).into_parts();
        assert_eq!(outcome, Outcome::Failure);
        assert_eq!(record.content(), &[1]);
    }
}
