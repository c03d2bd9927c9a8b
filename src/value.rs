// SPDX-License-Identifier: MIT OR Apache-2.0

//! The input side of a logging call.
//!
//! Callers hand the logger a [`Message`]: one input [`Value`] plus positional
//! arguments.  `Value` covers everything the compiler knows how to present:
//! scalars, errors with causal chains, lists and objects.
//!
//! ```
//! use tintlog::{ErrorValue, Message, Value};
//!
//! let plain: Message = "service started".into();
//! let formatted = Message::new("listening on %s:%d").arg("0.0.0.0").arg(8080);
//! let failure: Message = ErrorValue::new("connection refused")
//!     .with_cause(ErrorValue::new("dns lookup failed"))
//!     .into();
//! assert_eq!(formatted.args().len(), 2);
//! # let _ = (plain, failure);
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// What [`Value::Circular`] serializes as.
pub const CIRCULAR_REPRESENTATION: &str = "[Circular *1]";

/// A loggable value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Error(ErrorValue),
    List(Vec<Value>),
    /// Key/value pairs in insertion order.
    Object(Vec<(String, Value)>),
    /// A back-reference in graph-shaped data.
    Circular,
}

impl Value {
    /// Values a logging call treats as "nothing was given": undefined, null and the
    /// empty string.
    ///
    /// This is deliberately narrower than JavaScript-style truthiness: `false` and
    /// `0` are real values and are presented as such, also as template values.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => true,
            Value::Str(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Strings, numbers and booleans.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Converts any serde-serializable value.
    ///
    /// Serialization failures degrade to a string describing the failure rather
    /// than an error, since logging never fails.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Value {
        match serde_json::to_value(value) {
            Ok(json) => json.into(),
            Err(e) => Value::Str(format!("<unserializable: {e}>")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Error(e) => e.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Circular => serializer.serialize_str(CIRCULAR_REPRESENTATION),
        }
    }
}

/// An error as the logger sees it: a message, stack frames and an optional cause.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    pub name: String,
    pub message: String,
    pub stack: Vec<String>,
    pub cause: Option<Box<Value>>,
}

impl ErrorValue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: "Error".to_string(),
            message: message.into(),
            stack: Vec::new(),
            cause: None,
        }
    }

    /// Like [`ErrorValue::new`], with stack frames from
    /// [`std::backtrace::Backtrace::capture`] when backtraces are enabled.
    pub fn capture(message: impl Into<String>) -> Self {
        let backtrace = std::backtrace::Backtrace::capture();
        let stack = match backtrace.status() {
            std::backtrace::BacktraceStatus::Captured => backtrace
                .to_string()
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Self::new(message).with_stack(stack)
    }

    /// Converts a std error, following `source()` into a cause chain.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut value = Self::new(error.to_string());
        if let Some(source) = error.source() {
            value.cause = Some(Box::new(Value::Error(Self::from_error(source))));
        }
        value
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stack = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cause(mut self, cause: impl Into<Value>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }

    /// Number of errors in the chain, this one included.
    pub fn depth(&self) -> usize {
        match self.cause.as_deref() {
            Some(Value::Error(cause)) => 1 + cause.depth(),
            Some(_) => 2,
            None => 1,
        }
    }
}

impl Serialize for ErrorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("message", &self.message)?;
        if !self.stack.is_empty() {
            map.serialize_entry("stack", &self.stack)?;
        }
        if let Some(cause) = &self.cause {
            map.serialize_entry("cause", cause)?;
        }
        map.end()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::Int(i64::from(value))
            }
        })*
    };
}
from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! from_wide_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(value: $t) -> Self {
                match i64::try_from(value) {
                    Ok(i) => Value::Int(i),
                    Err(_) => Value::Float(value as f64),
                }
            }
        })*
    };
}
from_wide_int!(u64, usize, isize, i128, u128);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<ErrorValue> for Value {
    fn from(value: ErrorValue) -> Self {
        Value::Error(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// The unit a logging call accepts: an input and its positional arguments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    input: Value,
    args: Vec<Value>,
}

impl Message {
    pub fn new(input: impl Into<Value>) -> Self {
        Self {
            input: input.into(),
            args: Vec::new(),
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.args.extend(args);
        self
    }

    /// A template-literal-style message: literal segments interleaved with values.
    ///
    /// Usually built by the [`template!`](crate::template) macro.  Without values
    /// the segments are joined into a plain string message.
    pub fn template(segments: Vec<String>, args: Vec<Value>) -> Self {
        if args.is_empty() {
            return Self::new(segments.concat());
        }
        Self {
            input: Value::List(segments.into_iter().map(Value::Str).collect()),
            args,
        }
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Message::new(value)
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Message::new(value)
    }
}

impl From<ErrorValue> for Message {
    fn from(value: ErrorValue) -> Self {
        Message::new(value)
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_absent_values_are_falsy() {
        assert!(Value::Undefined.is_falsy());
        assert!(Value::Str(String::new()).is_falsy());
        assert!(Value::Null.is_falsy());
        assert!(!Value::Int(0).is_falsy());
        assert!(!Value::Bool(false).is_falsy());
        assert!(!Value::List(vec![]).is_falsy());
        assert!(!Value::Object(vec![]).is_falsy());
        assert!(!Value::from("0").is_falsy());
    }

    #[derive(Debug)]
    struct Outer(Inner);
    #[derive(Debug)]
    struct Inner;
    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("request failed")
        }
    }
    impl std::fmt::Display for Inner {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("socket closed")
        }
    }
    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }
    impl std::error::Error for Inner {}

    #[test]
    fn std_errors_become_cause_chains() {
        let value = ErrorValue::from_error(&Outer(Inner));
        assert_eq!(value.message, "request failed");
        assert_eq!(value.depth(), 2);
        match value.cause.as_deref() {
            Some(Value::Error(inner)) => assert_eq!(inner.message, "socket closed"),
            other => panic!("unexpected cause {other:?}"),
        }
    }

    #[test]
    fn serde_values_convert() {
        #[derive(Serialize)]
        struct Job {
            id: u32,
            tags: Vec<&'static str>,
        }
        let value = Value::from_serialize(&Job {
            id: 7,
            tags: vec!["a"],
        });
        assert_eq!(
            value,
            Value::Object(vec![
                ("id".to_string(), Value::Int(7)),
                ("tags".to_string(), Value::List(vec![Value::from("a")])),
            ])
        );
    }

    #[test]
    fn circular_serializes_with_marker() {
        let json = serde_json::to_string(&Value::List(vec![Value::Circular])).unwrap();
        assert_eq!(json, "[\"[Circular *1]\"]");
    }

    #[test]
    fn templates_without_values_are_plain_strings() {
        let plain = Message::template(vec!["no values".to_string()], vec![]);
        assert_eq!(plain.input(), &Value::from("no values"));
        let with = Message::template(vec!["a ".to_string(), "".to_string()], vec![Value::Int(1)]);
        assert!(matches!(with.input(), Value::List(items) if items.len() == 2));
    }
}
