use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const DEFAULT_CATEGORY: &str = "General";

/// Number of highlights shown on a feed card before collapsing the rest.
pub const CARD_HIGHLIGHT_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// Canonical display record for one summarized newsletter issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedItem {
    pub id: ItemId,
    pub title: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub minutes: u32,
    pub description: String,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_summary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
}

impl FeaturedItem {
    pub fn category_or_default(&self) -> &str {
        self.category
            .as_deref()
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn read_time_label(&self) -> String {
        format!("{} min", self.minutes)
    }

    /// Highlights shown on a card and how many were left out.
    pub fn highlight_preview(&self) -> (&[String], usize) {
        match self.highlights.as_deref() {
            Some(all) if all.len() > CARD_HIGHLIGHT_LIMIT => {
                (&all[..CARD_HIGHLIGHT_LIMIT], all.len() - CARD_HIGHLIGHT_LIMIT)
            }
            Some(all) => (all, 0),
            None => (&[], 0),
        }
    }
}

/// A newsletter sender found by a mailbox scan or entered by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender: String,
    #[serde(rename = "count30d", default, deserialize_with = "lenient_count")]
    pub count_30d: u32,
    #[serde(default = "default_selected", deserialize_with = "lenient_selected")]
    pub selected: bool,
    #[serde(default)]
    pub manual: bool,
}

fn default_selected() -> bool {
    true
}

impl Candidate {
    pub fn manual(name: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            sender: sender.into(),
            count_30d: 0,
            selected: true,
            manual: true,
        }
    }

    /// Identity within a scan session: the id when present, else the sender.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.sender)
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.sender
        } else {
            &self.name
        }
    }
}

/// A JSON value in a slot whose type the backend does not guarantee.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl RawValue {
    /// Scalars render as text; lists and objects have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Flag(b) => Some(b.to_string()),
            RawValue::List(_) | RawValue::Other(_) => None,
        }
    }

    /// Only genuine sequences qualify. Non-scalar elements are dropped.
    pub fn as_text_list(&self) -> Option<Vec<String>> {
        match self {
            RawValue::List(values) => Some(
                values
                    .iter()
                    .filter_map(|value| match value {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        serde_json::Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) => n.as_f64(),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Loosely typed featured record as the backend sends it.
///
/// Every known key is optional and may hold any JSON shape. Building a
/// `RawItem` from a JSON value never fails: anything that is not an object
/// yields an empty record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub id: Option<RawValue>,
    pub title: Option<RawValue>,
    pub subject: Option<RawValue>,
    pub tag: Option<RawValue>,
    pub topic: Option<RawValue>,
    pub category: Option<RawValue>,
    pub minutes: Option<RawValue>,
    #[serde(rename = "readMinutes")]
    pub read_minutes: Option<RawValue>,
    pub description: Option<RawValue>,
    pub teaser: Option<RawValue>,
    pub snippet: Option<RawValue>,
    pub sender: Option<RawValue>,
    pub from: Option<RawValue>,
    pub date: Option<RawValue>,
    pub published_at: Option<RawValue>,
    pub created_at: Option<RawValue>,
    pub long_summary: Option<RawValue>,
    pub full_summary: Option<RawValue>,
    pub summary: Option<RawValue>,
    pub highlights: Option<RawValue>,
}

impl RawItem {
    pub fn from_value(value: serde_json::Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.as_text()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| v.as_f64())
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

fn lenient_selected<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawValue::Flag(b)) => b,
        _ => true,
    })
}
