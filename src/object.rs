use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// # Object
///
/// An insertion-ordered, string-keyed property map, the output of every build.
///
/// Properties are kept in a plain vector and located by linear scan. Objects
/// produced by the builder are typically small, and a scan over a contiguous
/// vector keeps both the insertion order and the cache behavior simple.
///
/// ## Ordering
///
/// - New keys are appended.
/// - Writing an existing key replaces its value in place; the key keeps the
///   position of its first insertion.
/// - Integer-like keys are not hoisted: `"2"` inserted before `"1"` stays first.
///
/// ## Prototype
///
/// An object may delegate lookups to a prototype. [`Object::get`] walks the
/// chain; everything else (`get_own`, `iter`, `len`, [`Object::shallow_clone`])
/// only sees own properties.
///
/// ## Example
///
/// ```rust
/// use buildobject::{Object, Value};
///
/// let mut obj = Object::new();
/// obj.insert_or_update("b", Value::from(1));
/// obj.insert_or_update("a", Value::from(2));
/// obj.insert_or_update("b", Value::from(3));
///
/// assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// assert_eq!(obj.get("b"), Value::from(3));
/// assert_eq!(obj.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Object {
    // Own properties in insertion order
    properties: Vec<Property>,
    prototype: Option<Rc<Object>>,
}

/// A single own property.
#[derive(Debug, Clone)]
struct Property {
    key: String,
    value: Value,
}

impl Object {
    /// Creates an empty object with no prototype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object whose lookups fall back to `prototype`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::rc::Rc;
    /// use buildobject::{Object, Value};
    ///
    /// let mut base = Object::new();
    /// base.insert_or_update("greeting", Value::from("hi"));
    ///
    /// let derived = Object::with_prototype(Rc::new(base));
    /// assert_eq!(derived.get("greeting"), Value::from("hi"));
    /// assert_eq!(derived.get_own("greeting"), None);
    /// ```
    pub fn with_prototype(prototype: Rc<Object>) -> Self {
        Self {
            properties: Vec::new(),
            prototype: Some(prototype),
        }
    }

    /// Returns the object lookups fall back to, if any.
    pub fn prototype(&self) -> Option<&Rc<Object>> {
        self.prototype.as_ref()
    }

    /// Inserts a property or replaces the value of an existing one.
    ///
    /// Time Complexity: O(N) in the worst case (linear scan through properties)
    ///
    /// # Returns
    /// - `Some(old)` if the key already existed; it keeps its position
    /// - `None` if the key was appended
    pub fn insert_or_update(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();

        // Check for existing key first
        for property in self.properties.iter_mut() {
            if property.key == key {
                return Some(std::mem::replace(&mut property.value, value));
            }
        }

        self.properties.push(Property { key, value });
        None
    }

    /// Retrieves an own property.
    ///
    /// Time Complexity: O(N) in the worst case
    pub fn get_own(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// Looks a key up through the prototype chain.
    ///
    /// Returns [`Value::Undefined`] when no object in the chain has the key.
    pub fn get(&self, key: &str) -> Value {
        let mut current = Some(self);
        while let Some(obj) = current {
            if let Some(value) = obj.get_own(key) {
                return value.clone();
            }
            current = obj.prototype.as_deref();
        }
        Value::Undefined
    }

    /// Checks for an own property; inherited keys do not count.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get_own(key).is_some()
    }

    /// Removes an own property, returning its value if found.
    ///
    /// The remaining properties keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.properties.iter().position(|p| p.key == key)?;
        Some(self.properties.remove(index).value)
    }

    /// Returns the number of own properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Checks if the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Removes all own properties. The prototype is kept.
    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Returns an iterator over own properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|p| (p.key.as_str(), &p.value))
    }

    /// Returns own keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.key.as_str())
    }

    /// Returns own values in key insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.properties.iter().map(|p| &p.value)
    }

    /// Copies own properties into a new object.
    ///
    /// Values are shared, not deep-copied, and the prototype is not carried
    /// over.
    pub fn shallow_clone(&self) -> Object {
        Object {
            properties: self.properties.clone(),
            prototype: None,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut obj = Object::new();
        for (key, value) in iter {
            obj.insert_or_update(key, value);
        }
        obj
    }
}

impl PartialEq for Object {
    /// Own properties must match; order and prototypes are ignored.
    fn eq(&self, other: &Object) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get_own(k).is_some_and(|o| o == v))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
