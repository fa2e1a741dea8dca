//! Shared pieces of the typed task schema
//!
//! Each resource module owns its config struct; this module holds the
//! validation trait and the serde helpers they have in common.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

/// Validation of one desired-state entry before it reaches the engine
pub trait Validate {
    /// Resource type name used in error messages
    const RESOURCE: &'static str;

    /// Check field constraints the type system cannot express
    fn validate(&self) -> Result<()>;
}

/// Validate every entry and reject duplicated identities
pub fn validate_all<T: Validate>(entries: &[T], identity: impl Fn(&T) -> &str) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        entry.validate()?;
        let id = identity(entry).trim();
        if !seen.insert(id.to_string()) {
            return Err(Error::validation(
                T::RESOURCE,
                format!("'{id}' is listed more than once"),
            ));
        }
    }
    Ok(())
}

/// Require a non-blank identity field
pub fn require_name(resource: &'static str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(resource, format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn default_true() -> Option<bool> {
    Some(true)
}

/// Accept `speed = 1000` as well as `speed = "1000"`
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Int(i) => i.to_string(),
    }))
}
