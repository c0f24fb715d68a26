//! Mapping from loosely typed backend records to [`FeaturedItem`].
//!
//! Every read degrades to a default. A malformed record never fails the
//! batch it arrived in.

use crate::calendar::sort_timestamp;
use crate::types::{FeaturedItem, ItemId, RawItem, RawValue};
use chrono::{Local, TimeZone};
use std::cmp::Reverse;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_TOPIC: &str = "General";
pub const DEFAULT_SENDER: &str = "Unknown";
pub const DEFAULT_MINUTES: u32 = 3;

/// First slot holding a usable text value, null-coalescing style.
fn first_text(slots: &[&Option<RawValue>]) -> Option<String> {
    slots
        .iter()
        .filter_map(|slot| Option::as_ref(*slot))
        .find_map(RawValue::as_text)
}

fn coerce_minutes(raw: &RawItem) -> u32 {
    // The first present slot decides, as with `??`; a bad value does not
    // fall through to `readMinutes`.
    let slot = raw.minutes.as_ref().or(raw.read_minutes.as_ref());
    slot.and_then(RawValue::as_f64)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
        .unwrap_or(DEFAULT_MINUTES)
}

fn resolve_id(raw: &RawItem) -> ItemId {
    match &raw.id {
        Some(RawValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return ItemId::Number(i);
            }
            return ItemId::Text(n.to_string());
        }
        Some(RawValue::Text(s)) => return ItemId::Text(s.clone()),
        Some(RawValue::Flag(b)) => return ItemId::Text(b.to_string()),
        _ => {}
    }

    let sender = first_text(&[&raw.sender]).unwrap_or_else(|| "unknown".to_string());
    // Both halves read the raw fields only, never their fallbacks.
    let suffix = first_text(&[&raw.date, &raw.title])
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    ItemId::Text(format!("{sender}-{suffix}"))
}

pub fn normalize_item(raw: &RawItem) -> FeaturedItem {
    let date = first_text(&[&raw.date, &raw.published_at, &raw.created_at]);
    let full_summary = raw
        .full_summary
        .as_ref()
        .and_then(RawValue::as_text_list)
        .or_else(|| raw.summary.as_ref().and_then(RawValue::as_text_list));

    FeaturedItem {
        id: resolve_id(raw),
        title: first_text(&[&raw.title, &raw.subject]).unwrap_or_else(|| DEFAULT_TITLE.into()),
        topic: first_text(&[&raw.tag, &raw.topic, &raw.category])
            .unwrap_or_else(|| DEFAULT_TOPIC.into()),
        category: first_text(&[&raw.category]),
        minutes: coerce_minutes(raw),
        description: first_text(&[&raw.description, &raw.teaser, &raw.snippet])
            .unwrap_or_default(),
        sender: first_text(&[&raw.sender, &raw.from]).unwrap_or_else(|| DEFAULT_SENDER.into()),
        date,
        teaser: first_text(&[&raw.teaser]),
        long_summary: first_text(&[&raw.long_summary]),
        full_summary,
        highlights: raw.highlights.as_ref().and_then(RawValue::as_text_list),
    }
}

pub fn normalize_value(value: serde_json::Value) -> FeaturedItem {
    normalize_item(&RawItem::from_value(value))
}

/// Newest first. Stable, so equal timestamps keep backend order.
pub fn sort_newest_first<Tz: TimeZone>(items: &mut [FeaturedItem], tz: &Tz) {
    items.sort_by_cached_key(|item| Reverse(sort_timestamp(item.date.as_deref(), tz)));
}

/// Normalizes a featured response's `items` and orders them for display.
///
/// Anything other than an array yields an empty batch.
pub fn normalize_batch(items: Option<serde_json::Value>) -> Vec<FeaturedItem> {
    normalize_batch_in(items, &Local)
}

pub fn normalize_batch_in<Tz: TimeZone>(
    items: Option<serde_json::Value>,
    tz: &Tz,
) -> Vec<FeaturedItem> {
    let values = match items {
        Some(serde_json::Value::Array(values)) => values,
        Some(other) => {
            debug!("Featured items is not an array ({}), using empty list", type_name(&other));
            Vec::new()
        }
        None => Vec::new(),
    };

    let mut normalized: Vec<FeaturedItem> = values.into_iter().map(normalize_value).collect();
    sort_newest_first(&mut normalized, tz);
    normalized
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
