//SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro::{
    Delimiter, Group, Ident, Literal, Punct, Spacing, Span, TokenStream, TokenTree,
};
use std::collections::{HashMap, VecDeque};

/// Pops tokens up to the next top-level `,` (consumed) or the end of input.
///
/// Delimited groups arrive as single token trees, so commas nested inside calls
/// or brackets never end the run early.
fn take_until_comma(input: &mut VecDeque<TokenTree>) -> Vec<TokenTree> {
    let mut taken = Vec::new();
    while let Some(token) = input.pop_front() {
        if matches!(&token, TokenTree::Punct(p) if p.as_char() == ',') {
            break;
        }
        taken.push(token);
    }
    taken
}

/// Parses the `, key = expr, ...` list after the template literal into a map from
/// key to expression source.
///
/// ```ignore
/// # // ignore because: operates on proc_macro tokens, which only exist inside a macro
/// // `, name = "alice", count = items.len()`
/// // => { "name" => "\"alice\"", "count" => "items . len ()" }
/// ```
fn build_kvs(input: &mut VecDeque<TokenTree>) -> Result<HashMap<String, String>, TokenStream> {
    let mut kvs = HashMap::new();
    match input.pop_front() {
        None => return Ok(kvs),
        Some(TokenTree::Punct(p)) if p.as_char() == ',' => {}
        Some(_) => return Err(compile_error("Expected ','")),
    }
    while !input.is_empty() {
        let pair = take_until_comma(input);
        let (key, value) = match pair.as_slice() {
            [TokenTree::Ident(key), TokenTree::Punct(eq), value @ ..]
                if eq.as_char() == '=' && !value.is_empty() =>
            {
                (key.to_string(), value)
            }
            //trailing comma
            [] => continue,
            _ => return Err(compile_error("Expected `key = value`")),
        };
        let source = value.iter().cloned().collect::<TokenStream>().to_string();
        if kvs.insert(key.clone(), source).is_some() {
            return Err(compile_error(&format!("Key {} given twice", key)));
        }
    }
    Ok(kvs)
}

/// `compile_error!("message")`, built from tokens.
pub(crate) fn compile_error(message: &str) -> TokenStream {
    let args = TokenTree::Group(Group::new(
        Delimiter::Parenthesis,
        TokenTree::Literal(Literal::string(message)).into(),
    ));
    [
        TokenTree::Ident(Ident::new("compile_error", Span::call_site())),
        TokenTree::Punct(Punct::new('!', Spacing::Alone)),
        args,
    ]
    .into_iter()
    .collect()
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// A template string split at its placeholders.
///
/// There is always one more segment than there are keys, so literal text and
/// values interleave as `segments[0] keys[0] segments[1] ... segments[n]`.
/// Segments may be empty.
#[derive(Debug, PartialEq)]
pub(crate) struct Split {
    pub segments: Vec<String>,
    pub keys: Vec<String>,
}

/// Splits the body of a string literal (escape sequences still as source text)
/// at `{key}` placeholders. `{{` and `}}` are literal braces.
pub(crate) fn split_template(body: &str) -> Result<Split, String> {
    enum Mode {
        Literal,
        Key(String),
    }
    let mut segments = Vec::new();
    let mut keys = Vec::new();
    let mut literal = String::new();
    let mut mode = Mode::Literal;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Literal => match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    segments.push(std::mem::take(&mut literal));
                    mode = Mode::Key(String::new());
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err("Unmatched '}' in template".to_string()),
                _ => literal.push(c),
            },
            Mode::Key(mut key) => {
                if c == '}' {
                    let key = key.trim().to_string();
                    if key.is_empty() {
                        return Err("Empty placeholder in template".to_string());
                    }
                    keys.push(key);
                    mode = Mode::Literal;
                } else {
                    key.push(c);
                    mode = Mode::Key(key);
                }
            }
        }
    }
    match mode {
        Mode::Literal => {
            segments.push(literal);
            Ok(Split { segments, keys })
        }
        Mode::Key(_) => Err("Expected '}'".to_string()),
    }
}

/// Generates the `tintlog::Message::template(..)` expression for a `template!` invocation.
pub(crate) fn template_impl(collect: &mut VecDeque<TokenTree>) -> TokenStream {
    let body = match collect.pop_front() {
        Some(TokenTree::Literal(l)) => {
            let out = l.to_string();
            if out.len() < 2 || !out.starts_with('"') || !out.ends_with('"') {
                return compile_error("template!() must be called with a string literal");
            }
            out[1..out.len() - 1].to_string()
        }
        _ => return compile_error("template!() must be called with a string literal"),
    };

    let kvs = match build_kvs(collect) {
        Ok(kvs) => kvs,
        Err(e) => return e,
    };
    let split = match split_template(&body) {
        Ok(split) => split,
        Err(e) => return compile_error(&e),
    };

    let mut source = String::from("tintlog::Message::template(::std::vec![");
    for segment in &split.segments {
        source.push('"');
        source.push_str(segment);
        source.push_str("\".to_string(),");
    }
    source.push_str("], ::std::vec![");
    for key in &split.keys {
        let value = match kvs.get(key) {
            Some(v) => v.clone(),
            //implicit capture, like format_args!
            None if is_identifier(key) => key.clone(),
            None => return compile_error(&format!("Key {} not found", key)),
        };
        source.push_str("tintlog::Value::from(");
        source.push_str(&value);
        source.push_str("),");
    }
    source.push_str("])");

    match source.parse() {
        Ok(stream) => stream,
        Err(_) => compile_error("template!() produced an invalid expression"),
    }
}
