use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hash::{Hasher, Sha256Hasher};
use crate::shared::{ComponentManifest, ComponentType, Documented};

/// Type of the values a [`LookupService`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
}

/// LookupService trait for implementing a lookup collaborator.
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Looks up a value for the given coordinates. `Ok(None)` means nothing matched.
    ///
    /// # Example
    ///
    /// A lookup that echoes one of its coordinates.
    ///
    /// ```
    /// use std::collections::{BTreeSet, HashMap};
    /// use flowsample::lookup::{LookupService, ValueType};
    ///
    /// struct Echo;
    ///
    /// #[async_trait::async_trait]
    /// impl LookupService for Echo {
    ///     async fn lookup(
    ///         &self,
    ///         coordinates: &HashMap<String, String>,
    ///     ) -> flowsample::error::Result<Option<String>> {
    ///         Ok(coordinates.get("key").cloned())
    ///     }
    ///
    ///     fn value_type(&self) -> ValueType {
    ///         ValueType::String
    ///     }
    ///
    ///     fn required_keys(&self) -> BTreeSet<&'static str> {
    ///         BTreeSet::from(["key"])
    ///     }
    /// }
    /// ```
    async fn lookup(&self, coordinates: &HashMap<String, String>) -> Result<Option<String>>;

    /// Lookup with access to the attributes of the record being processed. Implementations that
    /// don't need them can rely on the default, which ignores them.
    async fn lookup_with_context(
        &self,
        coordinates: &HashMap<String, String>,
        _record_attributes: &HashMap<String, String>,
    ) -> Result<Option<String>> {
        self.lookup(coordinates).await
    }

    /// Type of the values returned by [`LookupService::lookup`].
    fn value_type(&self) -> ValueType;

    /// Coordinates callers are expected to supply. This is metadata for callers to validate
    /// against; `lookup` itself does not enforce it.
    fn required_keys(&self) -> BTreeSet<&'static str>;
}

pub const KEY_NAME: &str = "name";
pub const KEY_EMAIL: &str = "email";

/// Rendering of an absent coordinate in the hashed identity string.
const ABSENT: &str = "null";

/// Hashes `name` and `email` into a single identity digest: `sha256hex("<name>-<email>")`.
///
/// Missing coordinates are rendered as `null` rather than rejected, so an empty map hashes
/// `"null-null"`. Callers should check [`LookupService::required_keys`] beforehand.
pub struct IdentityLookup {
    hasher: Arc<dyn Hasher>,
}

impl IdentityLookup {
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(Sha256Hasher))
    }

    pub fn with_hasher(hasher: Arc<dyn Hasher>) -> Self {
        Self { hasher }
    }

    fn identity(coordinates: &HashMap<String, String>) -> String {
        let name = coordinates.get(KEY_NAME).map_or(ABSENT, String::as_str);
        let email = coordinates.get(KEY_EMAIL).map_or(ABSENT, String::as_str);
        format!("{name}-{email}")
    }
}

impl Default for IdentityLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupService for IdentityLookup {
    async fn lookup(&self, coordinates: &HashMap<String, String>) -> Result<Option<String>> {
        let identity = Self::identity(coordinates);
        Ok(Some(self.hasher.hash_hex(identity.as_bytes())))
    }

    fn value_type(&self) -> ValueType {
        ValueType::String
    }

    fn required_keys(&self) -> BTreeSet<&'static str> {
        BTreeSet::from([KEY_EMAIL, KEY_NAME])
    }
}

impl Documented for IdentityLookup {
    fn manifest(&self) -> ComponentManifest {
        let required_keys: Vec<_> = self.required_keys().into_iter().collect();
        ComponentManifest::new(ComponentType::LookupService, "IdentityLookup")
            .with_description("Hashes the name and email coordinates into a SHA-256 identity digest.")
            .with_tags(&["lookup", "hash", "sha256", "sample"])
            .with_metadata("value.type", format!("{:?}", self.value_type()))
            .with_metadata("required.keys", required_keys.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256_hex;

    fn coordinates(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn hashes_name_and_email() {
        let lookup = IdentityLookup::new();
        let result = lookup
            .lookup(&coordinates(&[("name", "Alice"), ("email", "a@x.com")]))
            .await
            .unwrap();
        assert_eq!(
            result.as_deref(),
            Some("5dc8a287b75db7aa2418dd024626c72d22325cede3f916c220172d3e6e749c52")
        );
    }

    #[tokio::test]
    async fn ignores_extra_coordinates() {
        let lookup = IdentityLookup::new();
        let with_extra = lookup
            .lookup(&coordinates(&[
                ("name", "Alice"),
                ("email", "a@x.com"),
                ("filename", "x.csv"),
            ]))
            .await
            .unwrap();
        assert_eq!(with_extra, Some(sha256_hex("Alice-a@x.com")));
    }

    // Missing keys are hashed as "null" instead of failing the lookup.
    #[tokio::test]
    async fn missing_keys_are_lenient() {
        let lookup = IdentityLookup::new();
        assert_eq!(
            lookup.lookup(&HashMap::new()).await.unwrap().as_deref(),
            Some("8c04dffb14857a8f12260588e6bf7b513384e3ee6f0ec3fe1ee8f5789b2c5a49")
        );
        assert_eq!(
            lookup
                .lookup(&coordinates(&[("name", "Carol")]))
                .await
                .unwrap(),
            Some(sha256_hex("Carol-null"))
        );
    }

    #[tokio::test]
    async fn context_lookup_ignores_record_attributes() {
        let lookup = IdentityLookup::new();
        let coords = coordinates(&[("name", "Alice"), ("email", "a@x.com")]);
        let attrs = coordinates(&[("name", "Mallory")]);
        assert_eq!(
            lookup.lookup_with_context(&coords, &attrs).await.unwrap(),
            lookup.lookup(&coords).await.unwrap()
        );
    }

    #[tokio::test]
    async fn shared_lookup_delegates() {
        let lookup: Arc<dyn LookupService> = Arc::new(IdentityLookup::new());
        let shared = Arc::clone(&lookup);
        assert_eq!(shared.value_type(), ValueType::String);
        assert!(shared
            .lookup(&coordinates(&[("name", "a"), ("email", "b")]))
            .await
            .unwrap()
            .is_some());
    }

    #[test]
    fn metadata() {
        let lookup = IdentityLookup::default();
        assert_eq!(lookup.value_type(), ValueType::String);
        assert_eq!(lookup.required_keys(), BTreeSet::from(["email", "name"]));

        let metadata = lookup.manifest().metadata.unwrap();
        assert_eq!(metadata.get("required.keys"), Some(&"email,name".to_string()));
        assert_eq!(metadata.get("value.type"), Some(&"String".to_string()));
    }
}
