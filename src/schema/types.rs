//! Schema table types
//!
//! An entity's recognized attributes are described by a static table of
//! [`Field`] entries. Each entry pairs the wire name with a typed setter,
//! so the decoder can check the JSON value shape before handing it over.

use crate::error::Result;
use crate::types::JsonObject;
use std::fmt;

/// Typed assignment of one decoded attribute into an entity
pub enum Setter<T> {
    /// JSON string
    Text(fn(&mut T, String)),
    /// JSON number, widened to `f64`
    Number(fn(&mut T, f64)),
    /// JSON array whose items are all strings
    TextList(fn(&mut T, Vec<String>)),
    /// JSON object decoded as a nested entity
    Object(fn(&mut T, &JsonObject) -> Result<()>),
    /// JSON array of objects, the setter runs once per item in order
    ObjectList(fn(&mut T, &JsonObject) -> Result<()>),
}

impl<T> Setter<T> {
    /// Human-readable shape, used in type mismatch errors
    pub fn expected(&self) -> &'static str {
        match self {
            Setter::Text(_) => "a string",
            Setter::Number(_) => "a number",
            Setter::TextList(_) => "an array of strings",
            Setter::Object(_) => "an object",
            Setter::ObjectList(_) => "an array of objects",
        }
    }
}

/// One recognized attribute of an entity
pub struct Field<T> {
    /// Attribute name on the wire
    pub name: &'static str,
    /// How the value is checked and stored
    pub setter: Setter<T>,
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("expected", &self.setter.expected())
            .finish()
    }
}

/// An entity decoded through a field table
pub trait StrictEntity: Default + Sized + 'static {
    /// Entity name used in error messages
    const NAME: &'static str;

    /// Every attribute the entity accepts
    const FIELDS: &'static [Field<Self>];

    /// Look up a recognized attribute by its wire name
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }

    /// Wire names of all recognized attributes, in table order
    fn field_names() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.name).collect()
    }

    /// Decode an attribute map, rejecting any key outside [`Self::FIELDS`]
    fn from_object(map: &JsonObject) -> Result<Self> {
        super::decoder::decode_strict(map)
    }
}
