//SPDX-License-Identifier: MIT OR Apache-2.0

//! # tintlog procedural macros
//!
//! This crate provides the `template!` macro for the tintlog logging front-end.
//!
//! A template is the Rust counterpart of a tagged template literal: the literal text
//! is split at compile time into segments, and the placeholder values are carried
//! alongside as separate arguments.  The logger styles the values differently from
//! the surrounding text and can move multi-line values onto continuation lines.
//!
//! ```rust
//! use tintlog::template;
//!
//! let user = "alice";
//! let message = template!("user {user} has {count} items", count = 42);
//! assert_eq!(message.args().len(), 2);
//! ```
//!
//! This expands to approximately:
//! ```ignore
//! # // ignore because: This shows macro expansion output, not actual runnable code
//! tintlog::Message::template(
//!     vec!["user ".to_string(), " has ".to_string(), " items".to_string()],
//!     vec![tintlog::Value::from(user), tintlog::Value::from(42)],
//! )
//! ```

mod parser;

use proc_macro::TokenStream;
use std::collections::VecDeque;

/// Builds a `tintlog::Message` from a template string with `{key}` placeholders.
///
/// Values are given as `key = expression` pairs after the template.  A placeholder
/// naming a variable in scope may omit its pair, as with `format!`.  `{{` and `}}`
/// produce literal braces.
///
/// # Examples
///
/// ```
/// use tintlog::template;
/// let attempts = 3;
/// let message = template!("retrying {attempts} times against {host}", host = "db-1");
/// assert_eq!(message.args().len(), 2);
/// ```
///
/// # Error Cases
///
/// A template must be a string literal:
/// ```compile_fail
/// use tintlog::template;
/// let fmt = "hello {x}";
/// template!(fmt, x = 1);
/// ```
///
/// Placeholders that are not identifiers must be provided:
/// ```compile_fail
/// use tintlog::template;
/// template!("Hello {0}!");
/// ```
#[proc_macro]
pub fn template(input: TokenStream) -> TokenStream {
    let mut collect: VecDeque<_> = input.into_iter().collect();
    parser::template_impl(&mut collect)
}
