// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns caller input into styled chunks.
//!
//! The compiler is where redaction and primitive coloring happen; sinks only ever see
//! the chunk list it produces.  Compilation is recursive (error causes, leftover
//! arguments and template arguments are compiled as sublines) and never fails.

use crate::chunk::{Chunk, Style};
use crate::colorize::colorize;
use crate::defaults::Defaults;
use crate::inspect::{display_scalar, format_args, inspect};
use crate::redact::Redactor;
use crate::value::{ErrorValue, Value};

/// Content of the marker chunk placed between an error and its cause.
pub const CAUSED_BY: &str = "# Caused by:";

/// Compiles values against a defaults table and a redactor.
///
/// ```
/// use tintlog::{Compiler, Defaults, Redactor, Value};
///
/// let defaults = Defaults::default();
/// let redactor = Redactor::new(["secret\\w*"], &defaults.redaction_text).unwrap();
/// let compiler = Compiler::new(&defaults, &redactor);
/// let chunks = compiler.compile(&Value::from("using %s"), false, &["secret42".into()]);
/// let text: String = chunks.iter().map(|c| c.content.as_str()).collect();
/// assert_eq!(text, "using [REDACTED]");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'a> {
    defaults: &'a Defaults,
    redactor: &'a Redactor,
}

impl<'a> Compiler<'a> {
    pub fn new(defaults: &'a Defaults, redactor: &'a Redactor) -> Self {
        Self { defaults, redactor }
    }

    /// Compiles `input` with positional `args`.
    ///
    /// With `force_sub_line` every produced chunk is a subline, and the first one
    /// starts a new visual line.
    pub fn compile(&self, input: &Value, force_sub_line: bool, args: &[Value]) -> Vec<Chunk> {
        let mut chunks = if input.is_falsy() {
            vec![
                Chunk::new("undefined")
                    .styled(Style::TextColor(self.defaults.primitive_colors.undefined)),
            ]
        } else {
            match input {
                Value::Error(error) => self.compile_error(error, force_sub_line, args),
                Value::List(segments) if !args.is_empty() => {
                    self.compile_template(segments, force_sub_line, args)
                }
                scalar if scalar.is_scalar() => {
                    self.compile_text(&display_scalar(scalar), force_sub_line, args)
                }
                other => {
                    let mut chunks = self.compile_text(&inspect(other), force_sub_line, &[]);
                    for arg in args {
                        chunks.extend(self.compile(arg, true, &[]));
                    }
                    chunks
                }
            }
        };
        if force_sub_line {
            for chunk in &mut chunks {
                chunk.sub_line = true;
            }
            if let Some(first) = chunks.first_mut() {
                first.breaks_line = true;
            }
        }
        chunks
    }

    fn compile_text(&self, text: &str, force_sub_line: bool, args: &[Value]) -> Vec<Chunk> {
        let formatted = format_args(text, args);
        let redacted = self.redactor.redact(&formatted.text);
        let mut chunks = Vec::new();
        for (i, line) in redacted.split('\n').enumerate() {
            chunks.extend(self.colorized_line(line, force_sub_line || i > 0));
        }
        for appendix in formatted.appendices {
            chunks.extend(self.compile(appendix, true, &[]));
        }
        chunks
    }

    fn colorized_line(&self, line: &str, sub_line: bool) -> Vec<Chunk> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let tokens = colorize(line, self.defaults);
        if tokens.is_empty() {
            return vec![Chunk::new("").sub_line(sub_line).breaks_line(true)];
        }
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| {
                let chunk = Chunk::new(token.text).sub_line(sub_line).breaks_line(i == 0);
                match token.color {
                    Some(color) => chunk.styled(Style::TextColor(color)),
                    None => chunk,
                }
            })
            .collect()
    }

    fn compile_error(&self, error: &ErrorValue, force_sub_line: bool, args: &[Value]) -> Vec<Chunk> {
        let formatted = format_args(&error.message, args);
        let headline = self
            .redactor
            .redact(&format!("{}: {}", error.name, formatted.text));
        let mut chunks: Vec<Chunk> = headline
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                Chunk::new(line.strip_suffix('\r').unwrap_or(line))
                    .sub_line(force_sub_line || i > 0)
                    .breaks_line(true)
            })
            .collect();
        for frame in &error.stack {
            chunks.push(
                Chunk::new(self.redactor.redact(frame.trim()))
                    .sub_line(true)
                    .breaks_line(true),
            );
        }
        if let Some(cause) = error.cause.as_deref().filter(|cause| !cause.is_falsy()) {
            chunks.push(self.caused_by_marker());
            match cause {
                Value::Error(_) | Value::Str(_) | Value::List(_) => {
                    chunks.extend(self.compile(cause, true, &[]));
                }
                other => chunks.extend(self.compile_text(&inspect(other), true, &[])),
            }
        }
        for appendix in formatted.appendices {
            chunks.extend(self.compile(appendix, true, &[]));
        }
        chunks
    }

    fn caused_by_marker(&self) -> Chunk {
        let mut marker = Chunk::new(CAUSED_BY)
            .sub_line(true)
            .breaks_line(true)
            .styled(Style::SpecialSubLine);
        if let Some(background) = self.defaults.caused_by_background_color {
            marker = marker.styled(Style::BackgroundColor(background));
        }
        if let Some(text) = self.defaults.caused_by_text_color {
            marker = marker.styled(Style::TextColor(text));
        }
        marker
    }

    /// Template mode: literal segments interleaved with arguments.
    ///
    /// Once an argument spills onto sublines everything after it stays on sublines;
    /// the fold carries that switch.
    fn compile_template(&self, segments: &[Value], force_sub_line: bool, args: &[Value]) -> Vec<Chunk> {
        let count = segments.len().max(args.len());
        let (chunks, _) = (0..count).fold(
            (Vec::new(), force_sub_line),
            |(mut chunks, mut switched), i| {
                if let Some(segment) = segments.get(i).filter(|s| !s.is_falsy()) {
                    let text = match segment {
                        Value::Str(s) => s.clone(),
                        other if other.is_scalar() => display_scalar(other),
                        other => inspect(other),
                    };
                    let redacted = self.redactor.redact(&text);
                    for (line_index, line) in redacted.split('\n').enumerate() {
                        if line_index > 0 {
                            switched = true;
                        }
                        if line.is_empty() && line_index == 0 {
                            continue;
                        }
                        chunks.push(
                            Chunk::new(line)
                                .styled(Style::SpecialSubLine)
                                .sub_line(switched)
                                .breaks_line(line_index > 0),
                        );
                    }
                }
                if let Some(arg) = args.get(i) {
                    let mut compiled = self.compile(arg, switched, &[]);
                    if let Some(first) = compiled.first_mut() {
                        first.styling.extend(self.defaults.variable_styling.iter().copied());
                        // the argument continues the line it was written on
                        first.breaks_line = false;
                    }
                    if compiled.iter().any(|chunk| chunk.sub_line) {
                        switched = true;
                    }
                    chunks.extend(compiled);
                }
                (chunks, switched)
            },
        );
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(input: impl Into<Value>, args: &[Value]) -> Vec<Chunk> {
        let defaults = Defaults::default();
        let redactor = Redactor::disabled();
        Compiler::new(&defaults, &redactor).compile(&input.into(), false, args)
    }

    fn contents(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.content.as_str()).collect()
    }

    #[test]
    fn falsy_input_is_undefined() {
        let undefined = Defaults::default().primitive_colors.undefined;
        for input in [Value::Undefined, Value::Null, Value::from("")] {
            let chunks = compile(input, &[]);
            assert_eq!(contents(&chunks), ["undefined"]);
            assert_eq!(chunks[0].text_color(), Some(undefined));
            assert!(!chunks[0].sub_line);
        }
        assert_eq!(contents(&compile(0, &[])), ["0"]);
        assert_eq!(contents(&compile(false, &[])), ["false"]);
    }

    #[test]
    fn multi_line_string() {
        let chunks = compile("a\nb\nc", &[]);
        assert_eq!(contents(&chunks), ["a", "b", "c"]);
        assert_eq!(
            chunks.iter().map(|c| c.sub_line).collect::<Vec<_>>(),
            [false, true, true]
        );
        assert!(chunks[1].breaks_line && chunks[2].breaks_line);
    }

    #[test]
    fn primitive_tokens_are_colored() {
        let p = Defaults::default().primitive_colors;
        assert_eq!(compile("true", &[])[0].text_color(), Some(p.boolean));
        assert_eq!(compile("123", &[])[0].text_color(), Some(p.number));
        assert_eq!(compile("\"quoted\"", &[])[0].text_color(), Some(p.string));
    }

    #[test]
    fn printf_substitution() {
        let chunks = compile("Hello, %s!", &["World".into()]);
        let text: String = contents(&chunks).concat();
        assert_eq!(text, "Hello, World!");
        assert!(chunks.iter().all(|c| !c.sub_line));
    }

    #[test]
    fn leftover_objects_become_sublines() {
        let object = Value::Object(vec![("id".to_string(), Value::Int(3))]);
        let chunks = compile("loaded", &[object]);
        assert_eq!(chunks[0].content, "loaded");
        let sub: String = chunks.iter().filter(|c| c.sub_line).map(|c| c.content.as_str()).collect();
        assert_eq!(sub, "{ id: 3 }");
        assert!(chunks.iter().find(|c| c.sub_line).unwrap().breaks_line);
    }

    #[test]
    fn error_with_cause() {
        let error = ErrorValue::new("boom")
            .with_stack(["  at a (a.rs:1)", "at b (b.rs:2)"])
            .with_cause(ErrorValue::new("root").with_stack(["at c (c.rs:3)"]));
        let chunks = compile(error, &[]);
        assert_eq!(
            contents(&chunks),
            [
                "Error: boom",
                "at a (a.rs:1)",
                "at b (b.rs:2)",
                CAUSED_BY,
                "Error: root",
                "at c (c.rs:3)",
            ]
        );
        assert!(!chunks[0].sub_line);
        assert!(chunks[1..].iter().all(|c| c.sub_line && c.breaks_line));
        assert!(chunks[3].is_special());
    }

    #[test]
    fn cause_chain_depth_gives_marker_count() {
        let mut error = ErrorValue::new("level 0");
        for depth in 1..5 {
            error = ErrorValue::new(format!("level {depth}")).with_cause(error);
        }
        assert_eq!(error.depth(), 5);
        let chunks = compile(error, &[]);
        let markers = chunks.iter().filter(|c| c.content == CAUSED_BY).count();
        assert_eq!(markers, 4);
    }

    #[test]
    fn non_error_cause_is_inspected() {
        let cause = Value::Object(vec![("code".to_string(), Value::Int(7))]);
        let chunks = compile(ErrorValue::new("failed").with_cause(cause), &[]);
        let after: String = chunks
            .iter()
            .skip_while(|c| c.content != CAUSED_BY)
            .skip(1)
            .map(|c| c.content.as_str())
            .collect();
        assert_eq!(after, "{ code: 7 }");
    }

    #[test]
    fn error_message_is_redacted() {
        let defaults = Defaults::default();
        let redactor = Redactor::new(["hunter\\d"], &defaults.redaction_text).unwrap();
        let compiler = Compiler::new(&defaults, &redactor);
        let error = ErrorValue::new("bad password hunter2").with_stack(["at login(hunter2)"]);
        let chunks = compiler.compile(&error.into(), false, &[]);
        assert_eq!(contents(&chunks), ["Error: bad password [REDACTED]", "at login([REDACTED])"]);
    }

    #[test]
    fn template_arguments_get_variable_styling() {
        let defaults = Defaults::default();
        let message = Value::List(vec!["took ".into(), " ms".into()]);
        let chunks = compile(message, &[Value::Int(12)]);
        assert_eq!(contents(&chunks), ["took ", "12", " ms"]);
        assert!(chunks.iter().all(|c| !c.sub_line));
        assert!(chunks[0].is_special());
        for style in &defaults.variable_styling {
            assert!(chunks[1].styling.contains(style));
        }
        assert_eq!(chunks[1].text_color(), defaults.variable_styling.iter().rev().find_map(|s| match s {
            Style::TextColor(c) => Some(*c),
            _ => None,
        }));
    }

    #[test]
    fn template_switches_to_sublines_and_stays() {
        let message = Value::List(vec!["a ".into(), " b ".into(), " c".into()]);
        let chunks = compile(message, &["x\ny".into(), Value::Int(1)]);
        assert_eq!(contents(&chunks), ["a ", "x", "y", " b ", "1", " c"]);
        assert_eq!(
            chunks.iter().map(|c| c.sub_line).collect::<Vec<_>>(),
            [false, false, true, true, true, true]
        );
        // after the switch, segments and arguments continue the current line
        assert!(chunks[2].breaks_line);
        assert!(!chunks[3].breaks_line && !chunks[4].breaks_line && !chunks[5].breaks_line);
    }

    #[test]
    fn template_segment_newlines_open_sublines() {
        let message = Value::List(vec!["head\nbody ".into(), "".into()]);
        let chunks = compile(message, &[Value::Int(5)]);
        assert_eq!(contents(&chunks), ["head", "body ", "5"]);
        assert!(!chunks[0].sub_line);
        assert!(chunks[1].sub_line && chunks[1].breaks_line);
        assert!(chunks[2].sub_line && !chunks[2].breaks_line);
    }

    #[test]
    fn forced_compilation_starts_a_line() {
        let defaults = Defaults::default();
        let redactor = Redactor::disabled();
        let compiler = Compiler::new(&defaults, &redactor);
        let chunks = compiler.compile(&Value::from("x y"), true, &[]);
        assert!(chunks.iter().all(|c| c.sub_line));
        assert!(chunks[0].breaks_line);
        assert!(!chunks[1].breaks_line);
    }

    #[test]
    fn list_without_arguments_is_serialized() {
        let chunks = compile(Value::from(vec![1, 2]), &[]);
        let text: String = contents(&chunks).concat();
        assert_eq!(text, "[ 1, 2 ]");
    }
}
