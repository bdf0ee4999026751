//! Resolution of key and value suppliers.
//!
//! A supplier argument may be a function, an array, an object or (for values)
//! a primitive constant. Its shape is inspected once per build and turned into
//! one of the closed variants below; the build loops then only call
//! [`KeySupplier::derive`] and [`ValueSupplier::supply`].

use std::rc::Rc;

use tracing::trace;

use crate::error::{BuildError, Result};
use crate::object::Object;
use crate::value::{Function, Value};

/// How keys are derived from elements.
#[derive(Debug, Clone)]
pub enum KeySupplier {
    /// Called as `f(element, index, elements)`.
    Func(Function),
    /// The key at the element's index.
    Array(Rc<Vec<Value>>),
    /// The property named by the element's key coercion.
    Lookup(Rc<Object>),
}

/// How values are derived from keys.
#[derive(Debug, Clone)]
pub enum ValueSupplier {
    /// Called as `f(key, index, keys, element, elements)`.
    Func(Function),
    /// The value at the key's index; beyond the end is undefined.
    Array(Rc<Vec<Value>>),
    /// The property named by the key, looked up through the prototype chain.
    Lookup(Rc<Object>),
    /// The same value for every key.
    Constant(Value),
}

/// Resolves a key supplier argument.
///
/// # Errors
/// [`BuildError::InvalidKeySupplier`] unless `input` is a function, an array
/// or an object.
pub fn resolve_key_supplier(input: &Value) -> Result<KeySupplier> {
    let supplier = match input {
        Value::Function(f) => KeySupplier::Func(f.clone()),
        Value::Array(items) => KeySupplier::Array(Rc::clone(items)),
        Value::Object(obj) => KeySupplier::Lookup(Rc::clone(obj)),
        other => return Err(BuildError::InvalidKeySupplier { kind: other.kind() }),
    };
    trace!(kind = input.kind(), "resolved key supplier");
    Ok(supplier)
}

/// Resolves a value supplier argument.
///
/// Primitives (including null and undefined) become constants. Any other
/// shape is rejected rather than coerced.
///
/// # Errors
/// [`BuildError::InvalidValueSupplier`] for an iterator.
pub fn resolve_value_supplier(input: &Value) -> Result<ValueSupplier> {
    let supplier = match input {
        Value::Function(f) => ValueSupplier::Func(f.clone()),
        Value::Array(items) => ValueSupplier::Array(Rc::clone(items)),
        Value::Object(obj) => ValueSupplier::Lookup(Rc::clone(obj)),
        constant if constant.is_primitive() => ValueSupplier::Constant(constant.clone()),
        other => return Err(BuildError::InvalidValueSupplier { kind: other.kind() }),
    };
    trace!(kind = input.kind(), "resolved value supplier");
    Ok(supplier)
}

impl KeySupplier {
    /// Derives the property key for `element` at `index`.
    ///
    /// `elements` must be the array value holding every element of the build.
    pub fn derive(&self, element: &Value, index: usize, elements: &Value) -> Result<String> {
        let key = match self {
            KeySupplier::Func(f) => f
                .call(&[element.clone(), Value::from(index), elements.clone()])
                .map_err(|source| BuildError::Supplier { source })?,
            KeySupplier::Array(keys) => keys.get(index).cloned().unwrap_or_default(),
            KeySupplier::Lookup(obj) => obj.get(&element.to_property_key()),
        };
        Ok(key.to_property_key())
    }
}

impl ValueSupplier {
    /// Supplies the value for `key` at `index`.
    ///
    /// `keys` and `elements` are array values holding the complete key and
    /// element sequences of the build.
    pub fn supply(
        &self,
        key: &str,
        index: usize,
        keys: &Value,
        element: &Value,
        elements: &Value,
    ) -> Result<Value> {
        match self {
            ValueSupplier::Func(f) => f
                .call(&[
                    Value::from(key),
                    Value::from(index),
                    keys.clone(),
                    element.clone(),
                    elements.clone(),
                ])
                .map_err(|source| BuildError::Supplier { source }),
            ValueSupplier::Array(values) => Ok(values.get(index).cloned().unwrap_or_default()),
            ValueSupplier::Lookup(obj) => Ok(obj.get(key)),
            ValueSupplier::Constant(value) => Ok(value.clone()),
        }
    }
}
