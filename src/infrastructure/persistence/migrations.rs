//! Load-time migrations for persisted army-list records
//!
//! Older clients stored `led_by` as a single object and items without a
//! `list_item_id`. Records are normalized at the JSON value level
//! before typed deserialization, and dangling leader references are
//! stripped rather than surfaced as errors.

use serde_json::{json, Value};
use uuid::Uuid;

/// Normalize a raw list record in place.
pub fn migrate_list(value: &mut Value) {
    let Some(items) = value.get_mut("items").and_then(Value::as_array_mut) else {
        return;
    };

    for item in items.iter_mut() {
        normalize_led_by(item);
        backfill_list_item_id(item);
    }

    strip_dangling_references(items);
}

/// Legacy records stored a single `led_by` object; wrap it in an array.
fn normalize_led_by(item: &mut Value) {
    if let Some(led_by) = item.get_mut("led_by") {
        if led_by.is_object() {
            let single = led_by.take();
            *led_by = json!([single]);
        }
    }
}

/// Items written before roster identity existed get one generated now.
fn backfill_list_item_id(item: &mut Value) {
    let missing = item
        .get("list_item_id")
        .map(|v| v.is_null() || v.as_str() == Some(""))
        .unwrap_or(true);
    if missing {
        if let Some(object) = item.as_object_mut() {
            object.insert(
                "list_item_id".to_string(),
                json!(Uuid::new_v4().to_string()),
            );
        }
    }
}

/// Remove `leading`/`led_by` references whose target no longer exists
/// in the record, matching by id first and the legacy datasheet-id +
/// name pair otherwise.
fn strip_dangling_references(items: &mut [Value]) {
    let targets: Vec<(Option<String>, Option<String>, Option<String>)> = items
        .iter()
        .map(|item| {
            (
                string_at(item, &["list_item_id"]),
                string_at(item, &["datasheet", "id"]),
                string_at(item, &["datasheet", "name"]),
            )
        })
        .collect();

    let resolves = |reference: &Value| -> bool {
        let by_id = string_at(reference, &["list_item_id"]);
        let by_sheet = string_at(reference, &["datasheet_id"]);
        let by_name = string_at(reference, &["name"]);
        targets.iter().any(|(id, sheet, name)| match &by_id {
            Some(ref_id) => id.as_deref() == Some(ref_id),
            None => {
                by_sheet.is_some() && sheet == &by_sheet && by_name.is_some() && name == &by_name
            }
        })
    };

    for item in items.iter_mut() {
        if let Some(leading) = item.get_mut("leading") {
            if !leading.is_null() && !resolves(leading) {
                *leading = Value::Null;
            }
        }
        if let Some(led_by) = item.get_mut("led_by").and_then(Value::as_array_mut) {
            led_by.retain(|reference| resolves(reference));
        }
    }
}

fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Value {
        json!({
            "id": "5a7b0000-0000-0000-0000-000000000001",
            "name": "Old List",
            "faction_id": "faction-a",
            "items": [
                {
                    "list_item_id": "5a7b0000-0000-0000-0000-0000000000aa",
                    "datasheet": { "id": "ds-squad", "name": "Intercessor Squad" },
                    "led_by": { "datasheet_id": "ds-cap", "name": "Captain" }
                },
                {
                    "datasheet": { "id": "ds-cap", "name": "Captain" },
                    "leading": {
                        "list_item_id": "5a7b0000-0000-0000-0000-0000000000aa",
                        "datasheet_id": "ds-squad",
                        "name": "Intercessor Squad"
                    }
                }
            ]
        })
    }

    #[test]
    fn test_single_led_by_object_becomes_array() {
        let mut value = record();
        migrate_list(&mut value);
        assert!(value["items"][0]["led_by"].is_array());
        assert_eq!(value["items"][0]["led_by"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_list_item_id_backfill() {
        let mut value = record();
        migrate_list(&mut value);
        let id = value["items"][1]["list_item_id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_legacy_reference_resolved_by_id_and_name_survives() {
        let mut value = record();
        migrate_list(&mut value);
        // the led_by entry has no list_item_id but matches the Captain
        // by datasheet id + name
        assert_eq!(value["items"][0]["led_by"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_dangling_references_are_stripped() {
        let mut value = record();
        value["items"][0]["led_by"] = json!([
            { "datasheet_id": "ds-gone", "name": "Deleted Leader" }
        ]);
        value["items"][1]["leading"] = json!({
            "list_item_id": "5a7b0000-0000-0000-0000-0000000000ff",
            "datasheet_id": "ds-gone",
            "name": "Deleted Squad"
        });
        migrate_list(&mut value);

        assert!(value["items"][0]["led_by"].as_array().unwrap().is_empty());
        assert!(value["items"][1]["leading"].is_null());
    }

    #[test]
    fn test_record_without_items_is_untouched() {
        let mut value = json!({ "id": "x", "name": "Empty" });
        migrate_list(&mut value);
        assert_eq!(value, json!({ "id": "x", "name": "Empty" }));
    }
}
