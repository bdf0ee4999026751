//! Dynamic values accepted and produced by the builder.
//!
//! The builder decides what to do with an argument by looking at its shape, so
//! arguments are modeled as a closed set of variants. Compound variants are
//! reference counted: cloning a `Value` shares the underlying array, object or
//! function, which is what makes a shallow clone observable through
//! [`Value::is_same`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::BoxError;
use crate::object::Object;

type NativeFn = dyn Fn(&[Value]) -> Result<Value, BoxError>;
type SharedIter = Rc<RefCell<Box<dyn Iterator<Item = Value>>>>;

/// A callable supplier.
///
/// Arguments are passed positionally; a function that ignores trailing
/// arguments simply does not read them.
#[derive(Clone)]
pub struct Function(Rc<NativeFn>);

impl Function {
    /// Wraps a closure as a callable value.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, BoxError> + 'static,
    {
        Function(Rc::new(f))
    }

    /// Invokes the function with positional arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, BoxError> {
        (self.0)(args)
    }

    /// Returns `true` if both handles refer to the same closure.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// A dynamically shaped value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value: array shortfall, missing lookup, missing argument.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(Rc<Object>),
    Function(Function),
    /// A lazily produced sequence that can be consumed only once.
    Iterator(SharedIter),
}

impl Value {
    /// Builds a function value from a closure.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, BoxError> + 'static,
    {
        Value::Function(Function::new(f))
    }

    /// Builds a one-shot iterator value.
    ///
    /// ```
    /// use buildobject::Value;
    ///
    /// let it = Value::iterator((0..3).map(Value::from));
    /// assert_eq!(it.elements().map(|v| v.len()), Some(3));
    /// // already consumed
    /// assert_eq!(it.elements().map(|v| v.len()), Some(0));
    /// ```
    pub fn iterator<I>(iter: I) -> Self
    where
        I: Iterator<Item = Value> + 'static,
    {
        Value::Iterator(Rc::new(RefCell::new(Box::new(iter))))
    }

    /// Builds an array value from anything convertible to values.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Array(Rc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Name of the shape, as reported in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
            Value::Iterator(_) => "iterator",
        }
    }

    /// Undefined, null, booleans, numbers and strings.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// Arrays, strings and iterators; see [`Value::elements`].
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::Array(_) | Value::String(_) | Value::Iterator(_))
    }

    /// Returns the object behind an `Object` value.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(&**o),
            _ => None,
        }
    }

    /// Returns the text of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Returns the number of a `Number` value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Materializes an iterable in iteration order.
    ///
    /// Strings yield one single-character string per Unicode scalar value.
    /// Iterators are drained, so a second call sees an empty sequence.
    /// Returns `None` for values that are not iterable.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.as_ref().clone()),
            Value::String(s) => Some(s.chars().map(|c| Value::from(c.to_string())).collect()),
            Value::Iterator(iter) => Some(iter.borrow_mut().by_ref().collect()),
            _ => None,
        }
    }

    /// Coerces the value to the string used as an object key.
    ///
    /// Numbers use the shortest decimal that round-trips. Magnitudes of at
    /// least `1e21` or below `1e-6` switch to exponent form with an explicit
    /// exponent sign (`1e+21`, `1.5e-7`).
    ///
    /// ```
    /// use buildobject::Value;
    ///
    /// assert_eq!(Value::from(3.0).to_property_key(), "3");
    /// assert_eq!(Value::from(-0.0).to_property_key(), "0");
    /// assert_eq!(Value::from(1.5).to_property_key(), "1.5");
    /// assert_eq!(Value::Null.to_property_key(), "null");
    /// assert_eq!(Value::array([1, 2]).to_property_key(), "1,2");
    /// ```
    pub fn to_property_key(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_key(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|v| match v {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_property_key(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(_) => "[object Function]".to_string(),
            Value::Iterator(_) => "[object Iterator]".to_string(),
        }
    }

    /// Identity comparison.
    ///
    /// Compound values are the same only when they share storage; primitives
    /// compare by value.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Iterator(a), Value::Iterator(b)) => Rc::ptr_eq(a, b),
            (a, b) if a.is_primitive() => a == b,
            _ => false,
        }
    }
}

fn number_key(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if n == 0.0 {
        // -0 and 0 name the same key
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // "1e21" -> "1e+21", "1.5e-7" stays
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    } else {
        format!("{n}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Iterator(a), Value::Iterator(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", number_key(*n)),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(o) => fmt::Debug::fmt(o, f),
            Value::Function(func) => fmt::Debug::fmt(func, f),
            Value::Iterator(_) => f.write_str("Iterator"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

// Integers become doubles: `i64` and `usize` values beyond 2^53 are rounded
// to the nearest representable number.
macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
        /// Converts to a number. Magnitudes above 2^53 lose precision.
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Number(n as f64)
            }
        })*
    };
}

from_integer!(i32, u32, i64, u8, usize);

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(Rc::new(o))
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that numbers coerce to their canonical key text.
    ///
    /// This test verifies that:
    /// 1. Integral numbers drop the fraction
    /// 2. Negative zero names the same key as zero
    /// 3. Non-finite numbers use their symbolic names
    fn test_number_keys() {
        assert_eq!(Value::from(127).to_property_key(), "127");
        assert_eq!(Value::from(255.0).to_property_key(), "255");
        assert_eq!(Value::from(-0.0).to_property_key(), "0");
        assert_eq!(Value::from(-2.25).to_property_key(), "-2.25");
        assert_eq!(Value::from(f64::NAN).to_property_key(), "NaN");
        assert_eq!(Value::from(f64::INFINITY).to_property_key(), "Infinity");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_property_key(), "-Infinity");
    }

    #[test]
    /// Test the switch to exponent form at both ends of the magnitude range.
    ///
    /// This test verifies that:
    /// 1. Values from 1e-6 up to below 1e21 stay in plain decimal
    /// 2. Large magnitudes carry an explicit "+" exponent sign
    /// 3. Small magnitudes use a negative exponent
    fn test_number_keys_exponent_form() {
        assert_eq!(Value::from(1e20).to_property_key(), "100000000000000000000");
        assert_eq!(Value::from(0.000001).to_property_key(), "0.000001");
        assert_eq!(Value::from(1e21).to_property_key(), "1e+21");
        assert_eq!(Value::from(-2.5e22).to_property_key(), "-2.5e+22");
        assert_eq!(Value::from(1e-7).to_property_key(), "1e-7");
        assert_eq!(Value::from(1.5e-7).to_property_key(), "1.5e-7");
    }

    #[test]
    /// Test that large integers convert to the nearest double.
    fn test_large_integer_conversion_rounds() {
        let exact = 1i64 << 53;
        assert_eq!(Value::from(exact).as_f64(), Some(9007199254740992.0));
        assert_eq!(Value::from(exact + 1).as_f64(), Some(9007199254740992.0));
    }

    #[test]
    /// Test key coercion for the non-numeric shapes.
    fn test_other_keys() {
        assert_eq!(Value::from("a").to_property_key(), "a");
        assert_eq!(Value::from(true).to_property_key(), "true");
        assert_eq!(Value::Undefined.to_property_key(), "undefined");
        assert_eq!(
            Value::array(vec![Value::from(1), Value::Null, Value::from("x")]).to_property_key(),
            "1,,x"
        );
        assert_eq!(Value::from(Object::new()).to_property_key(), "[object Object]");
        assert_eq!(
            Value::function(|_| Ok(Value::Undefined)).to_property_key(),
            "[object Function]"
        );
    }

    #[test]
    /// Test materializing each iterable shape.
    ///
    /// This test verifies that:
    /// 1. Arrays yield their items
    /// 2. Strings yield their characters
    /// 3. Iterators are consumed by the first materialization
    /// 4. Non-iterables yield None
    fn test_elements() {
        let arr = Value::array(["a", "b"]);
        assert_eq!(arr.elements(), Some(vec![Value::from("a"), Value::from("b")]));

        let s = Value::from("añb");
        assert_eq!(
            s.elements(),
            Some(vec![Value::from("a"), Value::from("ñ"), Value::from("b")])
        );

        let it = Value::iterator(vec![Value::from(1), Value::from(2)].into_iter());
        assert_eq!(it.elements().map(|e| e.len()), Some(2));
        assert_eq!(it.elements(), Some(vec![]));

        assert_eq!(Value::from(1).elements(), None);
        assert_eq!(Value::from(Object::new()).elements(), None);
    }

    #[test]
    /// Test identity versus structural equality.
    ///
    /// This test verifies that:
    /// 1. Clones of compound values are the same value
    /// 2. Structurally equal but separate arrays are equal yet not the same
    /// 3. Primitives are the same when equal
    fn test_identity_and_equality() {
        let a = Value::array([1, 2]);
        let b = a.clone();
        let c = Value::array([1, 2]);

        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
        assert_eq!(a, c);

        assert!(Value::from("x").is_same(&Value::from("x")));
        assert!(!Value::from(1).is_same(&Value::from("1")));
    }

    #[test]
    /// Test that functions receive positional arguments and compare by identity.
    fn test_function_call() {
        let f = Function::new(|args| Ok(args.get(1).cloned().unwrap_or_default()));
        assert_eq!(f.call(&[Value::from("a"), Value::from(2)]).unwrap(), Value::from(2));
        assert_eq!(f.call(&[]).unwrap(), Value::Undefined);

        let g = f.clone();
        assert!(Value::from(f).is_same(&Value::from(g)));
    }

    #[test]
    /// Test the shape names used in error messages.
    fn test_kinds() {
        assert_eq!(Value::Undefined.kind(), "undefined");
        assert_eq!(Value::from(None::<i32>).kind(), "undefined");
        assert_eq!(Value::from(Some(1)).kind(), "number");
        assert_eq!(Value::iterator(std::iter::empty()).kind(), "iterator");
        assert!(Value::Null.is_primitive());
        assert!(!Value::array(Vec::<Value>::new()).is_primitive());
        assert!(Value::from("s").is_iterable());
        assert!(!Value::from(Object::new()).is_iterable());
    }
}
