// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable serialization of values and printf-style argument substitution.

use crate::value::{CIRCULAR_REPRESENTATION, Value};

/// Nesting deeper than this is summarized as `[Object]` / `[Array]`.
const MAX_DEPTH: usize = 2;
/// Collections whose one-line form would pass this width are broken over lines.
const BREAK_LENGTH: usize = 72;
const INDENT: usize = 2;

/// Renders a value for humans: `{ id: 7, tags: [ 'a', 'b' ] }`.
///
/// Nested strings are quoted, top-level strings are not.  Output may span several
/// lines when a collection is long or an error carries stack frames.
///
/// ```
/// use tintlog::{inspect, Value};
/// let value = Value::Object(vec![
///     ("id".into(), Value::Int(7)),
///     ("tags".into(), Value::from(vec!["a", "b"])),
/// ]);
/// assert_eq!(inspect::inspect(&value), "{ id: 7, tags: [ 'a', 'b' ] }");
/// ```
pub fn inspect(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Error(e) => {
            let mut out = format!("{}: {}", e.name, e.message);
            for frame in &e.stack {
                out.push_str("\n    ");
                out.push_str(frame.trim());
            }
            if let Some(cause) = &e.cause {
                out.push_str(" { cause: ");
                out.push_str(&render(cause, 1, INDENT));
                out.push_str(" }");
            }
            out
        }
        other => render(other, 0, 0),
    }
}

fn number(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        f.to_string()
    }
}

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('\'', "\\'").replace('\n', "\\n");
    format!("'{escaped}'")
}

fn key(k: &str) -> String {
    let mut chars = k.chars();
    let plain = match chars.next() {
        Some(c) if c == '_' || c == '$' || c.is_alphabetic() => {
            chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
        }
        _ => false,
    };
    if plain { k.to_string() } else { quote(k) }
}

fn render(value: &Value, depth: usize, indent: usize) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => number(*f),
        Value::Str(s) => quote(s),
        Value::Circular => CIRCULAR_REPRESENTATION.to_string(),
        Value::Error(e) => format!("[{}: {}]", e.name, e.message),
        Value::List(items) => {
            if items.is_empty() {
                return "[]".to_string();
            }
            if depth > MAX_DEPTH {
                return "[Array]".to_string();
            }
            let parts: Vec<String> = items
                .iter()
                .map(|item| render(item, depth + 1, indent + INDENT))
                .collect();
            wrap('[', ']', parts, indent)
        }
        Value::Object(entries) => {
            if entries.is_empty() {
                return "{}".to_string();
            }
            if depth > MAX_DEPTH {
                return "[Object]".to_string();
            }
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", key(k), render(v, depth + 1, indent + INDENT)))
                .collect();
            wrap('{', '}', parts, indent)
        }
    }
}

fn wrap(open: char, close: char, parts: Vec<String>, indent: usize) -> String {
    let single = format!("{open} {} {close}", parts.join(", "));
    if indent + single.chars().count() <= BREAK_LENGTH && !single.contains('\n') {
        return single;
    }
    let pad = " ".repeat(indent + INDENT);
    let mut out = String::new();
    out.push(open);
    out.push('\n');
    let last = parts.len().saturating_sub(1);
    for (i, part) in parts.iter().enumerate() {
        out.push_str(&pad);
        out.push_str(part);
        if i != last {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&" ".repeat(indent));
    out.push(close);
    out
}

/// How a scalar reads when substituted into text.
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Float(f) => number(*f),
        other => render(other, 0, 0),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(0.0),
        _ => None,
    }
}

/// Result of printf-style substitution.
#[derive(Debug, PartialEq)]
pub struct Formatted<'a> {
    pub text: String,
    /// Arguments that were not consumed and are not scalars; the caller presents
    /// them separately.
    pub appendices: Vec<&'a Value>,
}

/// Substitutes `%s %d %i %f %j %o %O %%` with positional arguments.
///
/// Specifiers without a matching argument are left as written.  Unconsumed scalar
/// arguments are appended, separated by spaces; unconsumed non-scalars are returned
/// as appendices.
///
/// ```
/// use tintlog::{inspect, Value};
/// let args = [Value::from("World"), Value::from(3)];
/// let formatted = inspect::format_args("Hello, %s!", &args);
/// assert_eq!(formatted.text, "Hello, World! 3");
/// ```
pub fn format_args<'a>(text: &str, args: &'a [Value]) -> Formatted<'a> {
    if args.is_empty() {
        return Formatted {
            text: text.to_string(),
            appendices: Vec::new(),
        };
    }
    let mut out = String::with_capacity(text.len());
    let mut next = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&spec) = chars.peek() else {
            out.push(c);
            continue;
        };
        if spec == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !matches!(spec, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O') {
            out.push(c);
            continue;
        }
        let Some(arg) = args.get(next) else {
            out.push(c);
            continue;
        };
        chars.next();
        next += 1;
        let substituted = match spec {
            's' => match arg {
                Value::List(_) | Value::Object(_) => render(arg, MAX_DEPTH, 0),
                other => display_scalar(other),
            },
            'd' => as_number(arg).map_or_else(|| "NaN".to_string(), number),
            'i' => as_number(arg).map_or_else(|| "NaN".to_string(), |n| number(n.trunc())),
            'f' => as_number(arg).map_or_else(|| "NaN".to_string(), number),
            'j' => serde_json::to_string(arg).unwrap_or_else(|_| "undefined".to_string()),
            _ => match arg {
                Value::Str(s) => quote(s),
                other => inspect(other),
            },
        };
        out.push_str(&substituted);
    }

    let mut appendices = Vec::new();
    for arg in &args[next..] {
        if arg.is_scalar() || matches!(arg, Value::Undefined | Value::Null) {
            out.push(' ');
            out.push_str(&display_scalar(arg));
        } else {
            appendices.push(arg);
        }
    }
    Formatted {
        text: out,
        appendices,
    }
}
