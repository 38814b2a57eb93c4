//! Strict decoding routine
//!
//! A single generic routine walks an attribute map and applies the
//! entity's field table. Unknown keys and shape mismatches fail the whole
//! entity; nested failures are wrapped with the parent attribute name.

use super::types::{Setter, StrictEntity};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};

/// Decode `map` into `T`, failing on the first unrecognized or mistyped key
///
/// JSON `null` on a recognized key leaves the attribute at its default.
pub fn decode_strict<T: StrictEntity>(map: &JsonObject) -> Result<T> {
    let mut entity = T::default();

    for (key, value) in map {
        let field = T::field(key).ok_or_else(|| Error::UnsupportedAttribute {
            entity: T::NAME,
            key: key.clone(),
            value: value.clone(),
        })?;

        if value.is_null() {
            continue;
        }

        apply(&mut entity, key, &field.setter, value)?;
    }

    Ok(entity)
}

fn apply<T: StrictEntity>(
    entity: &mut T,
    key: &str,
    setter: &Setter<T>,
    value: &JsonValue,
) -> Result<()> {
    match setter {
        Setter::Text(set) => {
            let text = value
                .as_str()
                .ok_or_else(|| mismatch::<T>(key, setter.expected(), value))?;
            set(entity, text.to_string());
        }
        Setter::Number(set) => {
            let number = value
                .as_f64()
                .ok_or_else(|| mismatch::<T>(key, setter.expected(), value))?;
            set(entity, number);
        }
        Setter::TextList(set) => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch::<T>(key, setter.expected(), value))?;
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let text = item
                    .as_str()
                    .ok_or_else(|| mismatch::<T>(&format!("{key}[{i}]"), "a string", item))?;
                list.push(text.to_string());
            }
            set(entity, list);
        }
        Setter::Object(set) => {
            let nested = value
                .as_object()
                .ok_or_else(|| mismatch::<T>(key, setter.expected(), value))?;
            set(entity, nested).map_err(|e| Error::nested(T::NAME, key, e))?;
        }
        Setter::ObjectList(set) => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch::<T>(key, setter.expected(), value))?;
            for (i, item) in items.iter().enumerate() {
                let slot = format!("{key}[{i}]");
                let nested = item
                    .as_object()
                    .ok_or_else(|| mismatch::<T>(&slot, "an object", item))?;
                set(entity, nested).map_err(|e| Error::nested(T::NAME, slot, e))?;
            }
        }
    }
    Ok(())
}

fn mismatch<T: StrictEntity>(key: &str, expected: &'static str, value: &JsonValue) -> Error {
    Error::TypeMismatch {
        entity: T::NAME,
        key: key.to_string(),
        expected,
        value: value.clone(),
    }
}
