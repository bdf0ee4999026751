//! # buildobject
//!
//! Builds an insertion-ordered, string-keyed [`Object`] from one of three
//! argument shapes:
//!
//! - **one argument**: an iterable of entries (array pairs or objects with
//!   `key` and `value`), or an object to shallow-clone;
//! - **two arguments**: a source of keys and a value supplier;
//! - **three arguments**: a source of elements, a key supplier and a value
//!   supplier.
//!
//! A supplier is inspected once per call and resolved by shape: a function is
//! called, an array is indexed, an object is looked up, and (for values only)
//! a primitive is used as a constant. In the three-argument form every key is
//! derived before any value is computed, so a value function always sees the
//! complete key list.
//!
//! Keys are produced by [`Value::to_property_key`] and never reordered: the
//! result enumerates keys in the order they were first produced, integer-like
//! keys included.
//!
//! ## Example
//!
//! ```rust
//! use buildobject::{build, Value};
//!
//! // keys and a constant
//! let flags = build(&[Value::array(["read", "write"]), Value::from(true)]).unwrap();
//! assert_eq!(flags.get("write"), Value::from(true));
//!
//! // keys and an array of values; extras are ignored
//! let named = build(&[
//!     Value::array(["a", "b"]),
//!     Value::array(["one", "two", "ignored"]),
//! ])
//! .unwrap();
//! assert_eq!(named.keys().collect::<Vec<_>>(), vec!["a", "b"]);
//! assert_eq!(named.get("b"), Value::from("two"));
//!
//! // entries
//! let pairs = build(&[Value::array([Value::array(["x", "1"]), Value::array(["y", "2"])])]).unwrap();
//! assert_eq!(pairs.get("y"), Value::from("2"));
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`BuildError`]; nothing is returned from a failed build.
//! Supplier functions report failures through their `Result`, which surfaces
//! as [`BuildError::Supplier`].

// --- Module Declarations ---

pub mod builder;
pub mod error;
pub mod object;
pub mod supplier;
pub mod value;

mod json;

// --- Re-exports ---

pub use builder::{build, from_elements, from_keys, from_source, Entry};
pub use error::{BoxError, BuildError, Result};
pub use object::Object;
pub use supplier::{resolve_key_supplier, resolve_value_supplier, KeySupplier, ValueSupplier};
pub use value::{Function, Value};
