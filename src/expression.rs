//! Attribute expressions of the form `${key}`.
//!
//! References are replaced by the value registered under `key`. Unknown keys evaluate to an empty
//! string. Everything outside a reference is copied verbatim.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*([^}\s]+)\s*\}").expect("attribute reference pattern is valid")
});

/// Substitutes every `${key}` reference in `template` with its value from `variables`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use flowsample::expression::evaluate;
///
/// let vars = HashMap::from([
///     ("name".to_string(), "Alice".to_string()),
///     ("email".to_string(), "alice@example.com".to_string()),
/// ]);
/// assert_eq!(evaluate("${name} => ${email}", &vars), "Alice => alice@example.com");
/// ```
pub fn evaluate(template: &str, variables: &HashMap<String, String>) -> String {
    REFERENCE
        .replace_all(template, |caps: &Captures| {
            variables.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
