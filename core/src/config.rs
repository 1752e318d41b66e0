//! Block configuration supplied by the host.
//!
//! # Design
//! The host stores block settings as JSON written by a PHP form layer, so the
//! deserializers are lenient about the shapes that layer produces: enable
//! flags arrive as `0`/`1`, the quantity may be a numeric string, and older
//! saves keep the filter type under `filter_type`. Missing groups fall back to the same defaults the block
//! ships with.

use std::collections::BTreeSet;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Everything that shapes a single render of the jokes block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfiguration {
    /// Number of jokes to show.
    #[serde(deserialize_with = "quantity")]
    pub quantity: u32,
    pub renaming: Renaming,
    pub escaping: Escaping,
    pub filtering: Filtering,
}

impl Default for BlockConfiguration {
    fn default() -> Self {
        Self {
            quantity: 1,
            renaming: Renaming::default(),
            escaping: Escaping::default(),
            filtering: Filtering::default(),
        }
    }
}

impl BlockConfiguration {
    /// Parse a stored configuration from JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Replace the main character's name in the returned jokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Renaming {
    #[serde(deserialize_with = "flag")]
    pub enable: bool,
    pub first_name: String,
    pub last_name: String,
}

impl Default for Renaming {
    fn default() -> Self {
        Self {
            enable: false,
            first_name: "Chuck".to_string(),
            last_name: "Norris".to_string(),
        }
    }
}

/// Ask the API to escape special characters in joke text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Escaping {
    #[serde(deserialize_with = "flag")]
    pub enable: bool,
    pub format: EscapeFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EscapeFormat {
    #[default]
    Html,
    Javascript,
}

impl EscapeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscapeFormat::Html => "html",
            EscapeFormat::Javascript => "javascript",
        }
    }
}

impl fmt::Display for EscapeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restrict the categories the API samples from.
///
/// Only the set selected by `kind` is ever applied; the other one is kept so
/// switching the type back in the form does not lose the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filtering {
    #[serde(deserialize_with = "flag")]
    pub enable: bool,
    #[serde(rename = "type", alias = "filter_type")]
    pub kind: FilterType,
    #[serde(deserialize_with = "category_set")]
    pub inclusive: BTreeSet<String>,
    #[serde(deserialize_with = "category_set")]
    pub exclusive: BTreeSet<String>,
}

impl Default for Filtering {
    fn default() -> Self {
        Self {
            enable: false,
            kind: FilterType::Inclusive,
            inclusive: BTreeSet::from(["nerdy".to_string()]),
            exclusive: BTreeSet::from(["explicit".to_string()]),
        }
    }
}

impl Filtering {
    /// The category set that the current `kind` selects, if any.
    pub fn active_categories(&self) -> Option<&BTreeSet<String>> {
        match self.kind {
            FilterType::Inclusive => Some(&self.inclusive),
            FilterType::Exclusive => Some(&self.exclusive),
            FilterType::Other(_) => None,
        }
    }
}

/// Filter mode. Unknown strings are preserved rather than rejected and
/// disable filtering when the request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FilterType {
    #[default]
    Inclusive,
    Exclusive,
    Other(String),
}

impl From<String> for FilterType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "inclusive" => FilterType::Inclusive,
            "exclusive" => FilterType::Exclusive,
            _ => FilterType::Other(value),
        }
    }
}

impl From<FilterType> for String {
    fn from(value: FilterType) -> Self {
        match value {
            FilterType::Inclusive => "inclusive".to_string(),
            FilterType::Exclusive => "exclusive".to_string(),
            FilterType::Other(other) => other,
        }
    }
}

/// Accepts `true`/`false`, `0`/`1` and their string forms.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(n) => Ok(n != 0),
        Flag::Str(s) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"a boolean, 0 or 1",
            )),
        },
    }
}

/// Accepts a non-negative integer or its string form, as number widgets
/// store it.
fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Int(u32),
        Str(String),
    }

    match Quantity::deserialize(deserializer)? {
        Quantity::Int(n) => Ok(n),
        Quantity::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&s), &"a whole number")),
    }
}

/// Accepts a list of names or a `{"name": "name"}` map, the shape a
/// multi-select form widget stores.
fn category_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Categories {
        List(Vec<String>),
        Map(std::collections::BTreeMap<String, serde_json::Value>),
    }

    Ok(match Categories::deserialize(deserializer)? {
        Categories::List(list) => list.into_iter().collect(),
        Categories::Map(map) => map
            .into_iter()
            .filter(|(_, selected)| {
                !matches!(selected, serde_json::Value::Bool(false) | serde_json::Value::Null)
                    && selected.as_i64() != Some(0)
            })
            .map(|(name, _)| name)
            .collect(),
    })
}
