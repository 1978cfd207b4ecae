//! Positional argument schema and binding

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// One named positional slot of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalArgument {
    /// Slot name, used as the key in [`ArgumentValues`]
    pub name: String,
    /// Help text for the slot
    pub description: String,
    /// Value used when no token is left for the slot
    pub default_value: Option<String>,
}

impl PositionalArgument {
    /// Create a slot that must be filled from the input
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default_value: None,
        }
    }

    /// Create a slot that falls back to `default` when omitted
    pub fn optional(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default_value: Some(default.into()),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }
}

/// Resolved positional values keyed by slot name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentValues(BTreeMap<String, String>);

impl ArgumentValues {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value bound to `name`, or "" when the slot is unknown
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn extend_from(&mut self, other: &ArgumentValues) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ArgumentValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Fill `schema` from the front of `tokens`, in declaration order
///
/// Returns the bound values and the tokens beyond the schema length. The
/// first slot with neither a token nor a default fails the whole bind.
#[instrument(skip(schema, tokens), fields(slots = schema.len(), tokens = tokens.len()))]
pub fn bind<'t>(
    command: &str,
    schema: &[PositionalArgument],
    tokens: &'t [String],
) -> Result<(ArgumentValues, &'t [String])> {
    let mut values = ArgumentValues::new();
    let mut rest = tokens;

    for slot in schema {
        match rest.split_first() {
            Some((token, tail)) => {
                values.insert(slot.name.clone(), token.clone());
                rest = tail;
            }
            None => match &slot.default_value {
                Some(default) => values.insert(slot.name.clone(), default.clone()),
                None => return Err(CliError::missing_argument(command, slot.name.clone())),
            },
        }
    }

    debug!(
        "Bound {} positional argument(s) for '{}', {} leftover",
        values.len(),
        command,
        rest.len()
    );

    Ok((values, rest))
}
