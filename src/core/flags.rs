//! Flag descriptors, parsing and coercion
//!
//! A command owns a [`Flags`] set keyed by name. Parsing scans the tokens a
//! command receives strictly left to right and stops at the first token that
//! is not a flag, leaving everything after it untouched.

use crate::error::{FlagParseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument, trace};

/// Typed definition of a single named flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Flag {
    /// Signed 64-bit integer flag
    Integer { default: i64, description: String },
    /// Free-form string flag
    String { default: String, description: String },
    /// String flag restricted to a fixed set of choices
    Enum {
        default: String,
        description: String,
        possible_values: Vec<String>,
    },
}

impl Flag {
    /// Create an integer flag
    pub fn integer(default: i64, description: impl Into<String>) -> Self {
        Self::Integer {
            default,
            description: description.into(),
        }
    }

    /// Create a string flag
    pub fn string(default: impl Into<String>, description: impl Into<String>) -> Self {
        Self::String {
            default: default.into(),
            description: description.into(),
        }
    }

    /// Create an enum flag
    pub fn enumeration<I, S>(
        default: impl Into<String>,
        possible_values: I,
        description: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            default: default.into(),
            description: description.into(),
            possible_values: possible_values.into_iter().map(Into::into).collect(),
        }
    }

    /// Help text describing the flag
    pub fn description(&self) -> &str {
        match self {
            Self::Integer { description, .. }
            | Self::String { description, .. }
            | Self::Enum { description, .. } => description,
        }
    }

    /// Value used when the flag is absent or given an empty string
    pub fn default_value(&self) -> FlagValue {
        match self {
            Self::Integer { default, .. } => FlagValue::Integer(*default),
            Self::String { default, .. } | Self::Enum { default, .. } => {
                FlagValue::String(default.clone())
            }
        }
    }

    /// Short name of the flag kind, used by help rendering
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer { .. } => "Integer",
            Self::String { .. } => "String",
            Self::Enum { .. } => "Enum",
        }
    }

    /// Choices accepted by an enum flag; empty for other kinds
    pub fn possible_values(&self) -> &[String] {
        match self {
            Self::Enum {
                possible_values, ..
            } => possible_values,
            _ => &[],
        }
    }

    /// Convert a raw token into this flag's value
    ///
    /// An empty raw string yields the default without further coercion.
    pub fn coerce(&self, name: &str, raw: &str) -> std::result::Result<FlagValue, FlagParseError> {
        if raw.is_empty() {
            return Ok(self.default_value());
        }

        match self {
            Self::Integer { .. } => {
                raw.parse::<i64>()
                    .map(FlagValue::Integer)
                    .map_err(|_| FlagParseError::InvalidInteger {
                        flag: name.to_string(),
                        value: raw.to_string(),
                    })
            }
            Self::String { .. } => Ok(FlagValue::String(raw.to_string())),
            Self::Enum {
                possible_values, ..
            } => {
                if possible_values.iter().any(|v| v == raw) {
                    Ok(FlagValue::String(raw.to_string()))
                } else {
                    Err(FlagParseError::NotAllowed {
                        flag: name.to_string(),
                        value: raw.to_string(),
                        allowed: possible_values.clone(),
                    })
                }
            }
        }
    }
}

/// Resolved value of a flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Integer(i64),
    String(String),
}

impl FlagValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(_) => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Collection of flag descriptors keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags(BTreeMap<String, Flag>);

/// Output of [`Flags::parse`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    /// Resolved value for every declared flag
    pub values: FlagValues,
    /// Tokens left after the flag prefix
    pub remaining: Vec<String>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag, returning the set for chaining
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, flag: Flag) -> Self {
        self.insert(name, flag);
        self
    }

    /// Add or replace a flag
    pub fn insert(&mut self, name: impl Into<String>, flag: Flag) -> Option<Flag> {
        self.0.insert(name.into(), flag)
    }

    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate flags in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Flag)> {
        self.0.iter().map(|(name, flag)| (name.as_str(), flag))
    }

    /// Merge two sets into a new one; entries of `other` win on name clashes
    #[must_use]
    pub fn copy_and_merge(&self, other: &Flags) -> Flags {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Flags(merged)
    }

    /// Strip the leading `-name value` pairs from `tokens` and resolve every flag
    ///
    /// With no declared flags this is a no-op and every token passes through.
    /// `--` ends the flag prefix and is consumed; a bare `-` is not a flag.
    /// Repeated flags keep the last value.
    #[instrument(skip(self, tokens), fields(flags = self.len(), tokens = tokens.len()))]
    pub fn parse(&self, command: &str, tokens: &[String]) -> Result<ParseOutput> {
        if self.is_empty() {
            return Ok(ParseOutput {
                values: FlagValues::default(),
                remaining: tokens.to_vec(),
            });
        }

        let mut raw: BTreeMap<&str, &str> = BTreeMap::new();
        let mut index = 0;

        while let Some(token) = tokens.get(index) {
            if token == "--" {
                index += 1;
                break;
            }
            let Some(name) = token.strip_prefix('-').filter(|n| !n.is_empty()) else {
                break;
            };
            if !self.0.contains_key(name) {
                return Err(FlagParseError::Unknown {
                    command: command.to_string(),
                    flag: name.to_string(),
                }
                .into());
            }
            let value = tokens.get(index + 1).ok_or_else(|| FlagParseError::MissingValue {
                flag: name.to_string(),
            })?;
            trace!("Scanned flag -{} = '{}'", name, value);
            raw.insert(name, value.as_str());
            index += 2;
        }

        let mut values = FlagValues::default();
        for (name, flag) in &self.0 {
            let value = match raw.get(name.as_str()) {
                Some(value) => flag.coerce(name, value)?,
                None => flag.default_value(),
            };
            values.0.insert(name.clone(), value);
        }

        debug!(
            "Resolved {} flag(s) for '{}', {} token(s) remain",
            values.len(),
            command,
            tokens.len() - index
        );

        Ok(ParseOutput {
            values,
            remaining: tokens[index..].to_vec(),
        })
    }
}

impl<K: Into<String>> FromIterator<(K, Flag)> for Flags {
    fn from_iter<T: IntoIterator<Item = (K, Flag)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Resolved flag values keyed by flag name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagValues(BTreeMap<String, FlagValue>);

impl FlagValues {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// String form of a value; integers are formatted, absent names give ""
    pub fn string_value(&self, name: &str) -> String {
        self.0.get(name).map(ToString::to_string).unwrap_or_default()
    }

    /// Integer value; absent names and string values give 0
    pub fn int_value(&self, name: &str) -> i64 {
        self.0.get(name).and_then(FlagValue::as_int).unwrap_or(0)
    }

    /// Right-biased union of two value sets
    pub(crate) fn extend_from(&mut self, other: &FlagValues) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl<K: Into<String>, V: Into<FlagValue>> FromIterator<(K, V)> for FlagValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    fn say_flags() -> Flags {
        Flags::new()
            .with("voice", Flag::string("default", "voice to speak with"))
            .with("count", Flag::integer(1, "number of repetitions"))
    }

    #[test]
    fn test_parse_without_flags_passes_everything_through() {
        let flags = Flags::new();
        let input = tokens(&["-voice", "x", "rest"]);
        let out = flags.parse("say", &input).unwrap();

        assert!(out.values.is_empty());
        assert_eq!(out.remaining, input);
    }

    #[test]
    fn test_parse_stops_at_first_non_flag() {
        let out = say_flags()
            .parse("say", &tokens(&["-voice", "test", "input", "-count", "3"]))
            .unwrap();

        assert_eq!(out.values.string_value("voice"), "test");
        assert_eq!(out.values.int_value("count"), 1);
        assert_eq!(out.remaining, tokens(&["input", "-count", "3"]));
    }

    #[test]
    fn test_parse_absent_flags_use_defaults() {
        let out = say_flags().parse("say", &[]).unwrap();

        assert_eq!(out.values.get("voice"), Some(&FlagValue::from("default")));
        assert_eq!(out.values.get("count"), Some(&FlagValue::Integer(1)));
        assert!(out.remaining.is_empty());
    }

    #[test]
    fn test_parse_empty_value_uses_default() {
        let out = say_flags()
            .parse("say", &tokens(&["-voice", "", "-count", ""]))
            .unwrap();

        assert_eq!(out.values.string_value("voice"), "default");
        assert_eq!(out.values.int_value("count"), 1);
    }

    #[test]
    fn test_parse_double_dash_terminates() {
        let out = say_flags()
            .parse("say", &tokens(&["-count", "2", "--", "-voice", "x"]))
            .unwrap();

        assert_eq!(out.values.int_value("count"), 2);
        assert_eq!(out.remaining, tokens(&["-voice", "x"]));
    }

    #[test]
    fn test_parse_last_occurrence_wins() {
        let out = say_flags()
            .parse("say", &tokens(&["-count", "2", "-count", "5"]))
            .unwrap();
        assert_eq!(out.values.int_value("count"), 5);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let err = say_flags()
            .parse("say", &tokens(&["-volume", "11"]))
            .unwrap_err();

        match err {
            CliError::FlagParse(FlagParseError::Unknown { command, flag }) => {
                assert_eq!(command, "say");
                assert_eq!(flag, "volume");
            }
            other => panic!("Expected unknown flag error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_value() {
        let err = say_flags().parse("say", &tokens(&["-count"])).unwrap_err();
        assert!(matches!(
            err,
            CliError::FlagParse(FlagParseError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_integer() {
        let err = say_flags()
            .parse("say", &tokens(&["-count", "many"]))
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::FlagParse(FlagParseError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_enum_rejects_values_outside_choices() {
        let flag = Flag::enumeration("plain", ["plain", "upper"], "output style");

        assert_eq!(flag.coerce("style", "upper").unwrap(), FlagValue::from("upper"));
        for bad in ["UPPER", "lower", "up"] {
            let err = flag.coerce("style", bad).unwrap_err();
            assert!(matches!(err, FlagParseError::NotAllowed { .. }));
        }
    }

    #[test]
    fn test_string_empty_coerces_to_default() {
        let flag = Flag::string("fallback", "");
        assert_eq!(flag.coerce("name", "").unwrap(), FlagValue::from("fallback"));
    }

    #[test]
    fn test_bare_dash_is_not_a_flag() {
        let out = say_flags().parse("say", &tokens(&["-", "x"])).unwrap();
        assert_eq!(out.remaining, tokens(&["-", "x"]));
    }

    #[test]
    fn test_copy_and_merge_is_right_biased() {
        let left: Flags = [("A", Flag::integer(1, "")), ("B", Flag::integer(2, ""))]
            .into_iter()
            .collect();
        let right: Flags = [("B", Flag::integer(3, "")), ("C", Flag::integer(4, ""))]
            .into_iter()
            .collect();

        let merged = left.copy_and_merge(&right);
        let defaults: Vec<(&str, FlagValue)> = merged
            .iter()
            .map(|(name, flag)| (name, flag.default_value()))
            .collect();

        assert_eq!(
            defaults,
            vec![
                ("A", FlagValue::Integer(1)),
                ("B", FlagValue::Integer(3)),
                ("C", FlagValue::Integer(4)),
            ]
        );
        // inputs are untouched
        assert_eq!(left.get("B"), Some(&Flag::integer(2, "")));
    }

    #[test]
    fn test_flag_values_accessors() {
        let values: FlagValues = [("name", FlagValue::from("x")), ("n", FlagValue::Integer(4))]
            .into_iter()
            .collect();

        assert_eq!(values.string_value("n"), "4");
        assert_eq!(values.int_value("name"), 0);
        assert_eq!(values.string_value("missing"), "");
        assert_eq!(values.int_value("missing"), 0);
    }
}
