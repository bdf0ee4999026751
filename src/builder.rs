//! Argument dispatch and the build passes.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{BuildError, Result};
use crate::object::Object;
use crate::supplier::{resolve_key_supplier, resolve_value_supplier, ValueSupplier};
use crate::value::Value;

/// One element of an entry source.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// An array whose first two items are the key and the value.
    Pair(Value, Value),
    /// An object read through its `key` and `value` properties.
    Labeled { key: Value, value: Value },
}

impl Entry {
    /// Classifies an element of an entry source; array pairs are checked first.
    ///
    /// Anything that is not an array is read as a labeled entry. Shapes without
    /// properties (strings, numbers, functions, ...) have neither `key` nor
    /// `value`, so both come back undefined.
    pub fn classify(element: &Value) -> Entry {
        match element {
            Value::Array(items) => Entry::Pair(
                items.first().cloned().unwrap_or_default(),
                items.get(1).cloned().unwrap_or_default(),
            ),
            Value::Object(obj) => Entry::Labeled {
                key: obj.get("key"),
                value: obj.get("value"),
            },
            _ => Entry::Labeled {
                key: Value::Undefined,
                value: Value::Undefined,
            },
        }
    }

    /// Splits the entry into its key and value.
    pub fn into_parts(self) -> (Value, Value) {
        match self {
            Entry::Pair(key, value) => (key, value),
            Entry::Labeled { key, value } => (key, value),
        }
    }
}

/// Builds an object from one, two or three positional arguments.
///
/// | arguments                                  | result                                      |
/// |--------------------------------------------|---------------------------------------------|
/// | `(source)`                                 | see [`from_source`]                         |
/// | `(keys, value_supplier)`                   | see [`from_keys`]                           |
/// | `(elements, key_supplier, value_supplier)` | see [`from_elements`]                       |
///
/// ```
/// use buildobject::{build, Value};
///
/// let upper = Value::function(|args| {
///     let key = args[0].as_str().unwrap_or_default();
///     Ok(Value::from(key.to_uppercase()))
/// });
/// let obj = build(&[Value::array(["a", "b"]), upper]).unwrap();
///
/// assert_eq!(obj.get("a"), Value::from("A"));
/// assert_eq!(obj.get("b"), Value::from("B"));
/// ```
///
/// # Errors
/// [`BuildError::ArgumentCount`] for zero or more than three arguments, plus
/// whatever the selected form reports.
#[tracing::instrument(level = "trace", skip_all, fields(arity = args.len()))]
pub fn build(args: &[Value]) -> Result<Object> {
    match args {
        [source] => from_source(source),
        [keys, value_supplier] => from_keys(keys, value_supplier),
        [elements, key_supplier, value_supplier] => {
            from_elements(elements, key_supplier, value_supplier)
        }
        _ => Err(BuildError::ArgumentCount { found: args.len() }),
    }
}

/// One-argument form.
///
/// An iterable source is consumed once as a sequence of entries, later keys
/// overwriting earlier ones. Any other source is shallow-cloned: own
/// properties only, values shared. Booleans, numbers and functions have no
/// own properties and clone to an empty object.
///
/// # Errors
/// [`BuildError::InvalidSource`] for null and undefined.
pub fn from_source(source: &Value) -> Result<Object> {
    if let Some(elements) = source.elements() {
        let mut obj = Object::new();
        for element in elements.iter() {
            let (key, value) = Entry::classify(element).into_parts();
            obj.insert_or_update(key.to_property_key(), value);
        }
        debug!(entries = elements.len(), keys = obj.len(), "built object from entries");
        return Ok(obj);
    }

    match source {
        Value::Object(obj) => {
            trace!(keys = obj.len(), "shallow clone");
            Ok(obj.shallow_clone())
        }
        Value::Undefined | Value::Null => Err(BuildError::InvalidSource { kind: source.kind() }),
        _ => Ok(Object::new()),
    }
}

/// Two-argument form.
///
/// Keys come from an iterable (each element coerced to a key) or from the own
/// keys of an object, whose own values then serve as the elements. Values
/// come from the resolved value supplier, which a function sees as
/// `f(key, index, keys, element, elements)`.
///
/// # Errors
/// [`BuildError::InvalidSource`], [`BuildError::InvalidValueSupplier`], or a
/// [`BuildError::Supplier`] failure.
pub fn from_keys(source: &Value, value_supplier: &Value) -> Result<Object> {
    let supplier = resolve_value_supplier(value_supplier)?;

    let (keys, elements): (Vec<String>, Vec<Value>) = if let Some(elements) = source.elements() {
        let keys = elements.iter().map(Value::to_property_key).collect();
        (keys, elements)
    } else {
        match source {
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .unzip(),
            other => return Err(BuildError::InvalidSource { kind: other.kind() }),
        }
    };

    assign_values(keys, Rc::new(elements), &supplier)
}

/// Three-argument form.
///
/// Elements are materialized once. The first pass derives every key; the
/// second pass supplies every value, so a value function always receives the
/// complete key list.
///
/// ```
/// use buildobject::{from_elements, Value};
/// use serde_json::json;
///
/// let elements = Value::from(json!([{ "x": "a" }, { "x": "b" }]));
/// let key_of = Value::function(|args| {
///     Ok(args[0].as_object().map(|o| o.get("x")).unwrap_or_default())
/// });
/// let decorate = Value::function(|args| {
///     let key = args[0].as_str().unwrap_or_default();
///     Ok(Value::from(format!("-{}-", key.to_uppercase())))
/// });
///
/// let obj = from_elements(&elements, &key_of, &decorate).unwrap();
/// assert_eq!(obj.get("a"), Value::from("-A-"));
/// assert_eq!(obj.get("b"), Value::from("-B-"));
/// ```
///
/// # Errors
/// [`BuildError::InvalidSource`] for a non-iterable element source,
/// [`BuildError::InvalidKeySupplier`], [`BuildError::InvalidValueSupplier`],
/// or a [`BuildError::Supplier`] failure.
pub fn from_elements(
    source: &Value,
    key_supplier: &Value,
    value_supplier: &Value,
) -> Result<Object> {
    let key_supplier = resolve_key_supplier(key_supplier)?;
    let value_supplier = resolve_value_supplier(value_supplier)?;

    let elements = source
        .elements()
        .map(Rc::new)
        .ok_or(BuildError::InvalidSource { kind: source.kind() })?;
    let elements_value = Value::Array(Rc::clone(&elements));

    let keys = elements
        .iter()
        .enumerate()
        .map(|(index, element)| key_supplier.derive(element, index, &elements_value))
        .collect::<Result<Vec<String>>>()?;
    trace!(keys = keys.len(), "derived keys");

    assign_values(keys, elements, &value_supplier)
}

/// Second pass: one value per key, in key order.
///
/// The key and element lists are frozen into shared arrays before the first
/// value is supplied.
fn assign_values(
    keys: Vec<String>,
    elements: Rc<Vec<Value>>,
    supplier: &ValueSupplier,
) -> Result<Object> {
    let keys_value = Value::array(keys.iter().map(String::as_str));
    let elements_value = Value::Array(Rc::clone(&elements));

    let mut obj = Object::new();
    for (index, key) in keys.iter().enumerate() {
        let element = elements.get(index).cloned().unwrap_or_default();
        let value = supplier.supply(key, index, &keys_value, &element, &elements_value)?;
        obj.insert_or_update(key.as_str(), value);
    }
    debug!(keys = keys.len(), properties = obj.len(), "built object");
    Ok(obj)
}
