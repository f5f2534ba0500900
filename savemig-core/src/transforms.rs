//! Reusable transform shapes for conversion authors.
//!
//! The built-in conversions work on typed slots and use
//! [`remap_and_compact`] directly. The JSON helpers cover the same shapes
//! for untyped slots registered with
//! [`ConversionBuilder::to_raw_value`](crate::conversion::ConversionBuilder::to_raw_value).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SaveError};

/// Rewrite every entry of `entries` with `remap`, dropping entries it
/// rejects and every empty position. Survivors keep their relative order.
///
/// Returns how many occupied entries were dropped.
pub fn remap_and_compact<T>(entries: &mut Vec<Option<T>>, mut remap: impl FnMut(T) -> Option<T>) -> usize {
    let mut dropped = 0;
    let kept = entries
        .drain(..)
        .flatten()
        .filter_map(|entry| {
            let next = remap(entry);
            if next.is_none() {
                dropped += 1;
            }
            next
        })
        .map(Some)
        .collect();
    *entries = kept;
    dropped
}

/// View a slot value as a JSON object.
///
/// # Errors
/// Returns [`SaveError::MalformedSlot`] if the value is not an object.
pub fn object_mut<'a>(slot: &str, value: &'a mut Value) -> Result<&'a mut Map<String, Value>> {
    value.as_object_mut().ok_or_else(|| SaveError::MalformedSlot {
        slot: slot.to_string(),
        reason: "expected an object".to_string(),
    })
}

/// Give `field` a value if it is absent or null. Returns whether the
/// default was written.
pub fn normalize_default(object: &mut Map<String, Value>, field: &str, default: Value) -> bool {
    if object.get(field).is_some_and(|value| !value.is_null()) {
        return false;
    }
    object.insert(field.to_string(), default);
    true
}

/// Move `field` from one object to another, removing it at the source.
/// Returns whether anything was moved; an absent field leaves both objects
/// unchanged.
pub fn relocate_field(from: &mut Map<String, Value>, to: &mut Map<String, Value>, field: &str) -> bool {
    match from.remove(field) {
        Some(value) => {
            to.insert(field.to_string(), value);
            true
        }
        None => false,
    }
}

/// Build a `T` from an older-shape value: fields `T` knows are carried over,
/// fields `T` has but `old` lacks come from `defaults`, and fields `T` no
/// longer has are discarded.
///
/// # Errors
/// Returns [`SaveError::Serialization`] if a carried field has the wrong
/// type for `T`.
pub fn structural_upcast<T>(old: Value, defaults: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(defaults).map_err(|e| SaveError::Serialization(e.to_string()))?;
    if let (Some(target), Value::Object(fields)) = (merged.as_object_mut(), old) {
        for (name, value) in fields {
            if !value.is_null() && target.contains_key(&name) {
                target.insert(name, value);
            }
        }
    }
    serde_json::from_value(merged).map_err(|e| SaveError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Options;
    use serde_json::json;

    #[test]
    fn remap_drops_and_compacts_in_order() {
        let mut entries = vec![Some((1, 'x')), None, Some((2, 'y')), Some((3, 'z'))];
        let dropped = remap_and_compact(&mut entries, |(id, v)| match id {
            1 => Some((1, v)),
            3 => Some((30, v)),
            _ => None,
        });
        assert_eq!(entries, vec![Some((1, 'x')), Some((30, 'z'))]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn relocate_moves_the_field() {
        let mut a = json!({"flag": true});
        let mut b = json!({});
        let moved = relocate_field(
            object_mut("a", &mut a).expect("object"),
            object_mut("b", &mut b).expect("object"),
            "flag",
        );
        assert!(moved);
        assert_eq!(a, json!({}));
        assert_eq!(b, json!({"flag": true}));
    }

    #[test]
    fn normalize_fills_absent_and_null_only() {
        let mut value = json!({"bridge": null, "encounter_version": 2});
        let object = object_mut("global", &mut value).expect("object");
        assert!(normalize_default(object, "bridge", json!(0)));
        assert!(!normalize_default(object, "encounter_version", json!(0)));
        assert!(normalize_default(object, "missing", json!("x")));
        assert_eq!(value, json!({"bridge": 0, "encounter_version": 2, "missing": "x"}));
    }

    #[test]
    fn non_objects_are_malformed() {
        let mut value = json!([1, 2]);
        let err = object_mut("switches", &mut value).expect_err("array");
        assert!(matches!(err, SaveError::MalformedSlot { ref slot, .. } if slot == "switches"));
    }

    #[test]
    fn upcast_fills_missing_font_from_defaults() {
        let defaults = Options::default();
        let old = json!({"text_speed": 2, "frame": 3, "retired_field": true});
        let options: Options = structural_upcast(old, &defaults).expect("upcast");
        assert_eq!(options.text_speed, 2);
        assert_eq!(options.frame, 3);
        assert_eq!(options.font, defaults.font);
        assert_eq!(options.bgm_volume, defaults.bgm_volume);
    }
}
