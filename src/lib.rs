//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# tintlog

tintlog is a colorful, structured logging front-end for terminal programs and services.

# The problem

Most log output is a wall of same-colored text.  The lines you care about (the error, its
stack, the thing that caused it, the value that was wrong) look exactly like the lines you
don't.  And secrets end up in logs, because nobody remembers to scrub them at every call site.

tintlog takes a different approach:

* Every message is *compiled* into styled chunks before anything is printed.  Numbers, booleans,
  quoted strings and `null`s are colored where they appear.  Errors print their stack frames
  and walk their cause chain, one `# Caused by:` block per cause.
* Redaction is configured once, on the logger, as a list of patterns.  Every string that reaches
  the output passes through it, including formatted arguments, stack frames and causes.
* Output goes to any number of *sinks*: the terminal, log files on disk (plain or HTML), or memory.

# The API

```
use tintlog::{ErrorValue, Logger, LoggerOptions, Message, template};

let logger = Logger::new(LoggerOptions::default().prefix("api").redact("password=\\S+")).unwrap();

logger.info("server listening");
logger.warn(Message::new("slow response from %s: %d ms").arg("db").arg(812));

let user = "alice";
let elapsed = 42;
logger.info(template!("login for {user} took {elapsed} ms"));

let cause = ErrorValue::new("connection reset by peer");
logger.error(ErrorValue::new("query failed").with_cause(cause));
```

Levels are `info`, `warn`, `error`, `fatal` and `debug`, with `log` (the configured default level),
`alert` (warn) and `severe` (error) as aliases.  A `fatal` message is rendered, every sink is
flushed, cleanup tasks run, and the process exits, unless the logger was built with
`disable_fatal_crash`.

# Sinks

| Sink                  | Output                                                       |
|-----------------------|--------------------------------------------------------------|
| [`TerminalRenderer`]  | stdout / stderr, truecolor, wrapped to the terminal width    |
| [`FileRenderer`]      | `latest.log` plus optional per-level logs, plain or HTML     |
| [`InMemorySink`]      | plain text in memory, for tests and capture                  |

Loggers register a terminal renderer by default.  Other sinks are added with
[`Logger::register_sink`]; implement [`Sink`] for your own.

# Shutdown

A [`Lifecycle`] coordinates the end of the program.  File renderers built with
[`FileRenderer::with_lifecycle`] register a cleanup task that drains their queue, and loggers built
with [`Logger::with_lifecycle`] stop logging once the lifecycle exits.  Call
[`Lifecycle::notify_exit`] when your program is about to terminate.

# Configuration

[`LoggerOptions`], [`FileStorageSettings`] and the presentation [`Defaults`] table all deserialize
with serde, and every field has a default.
*/

mod chunk;
mod color;
pub mod colorize;
mod compile;
mod defaults;
mod error;
mod file;
pub mod inspect;
mod level;
mod lifecycle;
mod logger;
mod memory;
mod message;
mod prefix;
mod redact;
mod sink;
mod style;
mod terminal;
mod value;

pub use chunk::{Chunk, Style, group_lines};
pub use color::Color;
pub use compile::{CAUSED_BY, Compiler};
pub use defaults::{Defaults, LevelColors, PrimitiveColors};
pub use error::{Error, Result};
pub use file::{FileRenderer, FileStorageSettings};
pub use level::Level;
pub use lifecycle::{ExitReason, FATAL_EXIT_CODE, Lifecycle};
pub use logger::{Logger, LoggerOptions};
pub use memory::InMemorySink;
pub use message::{CONTINUATION_MARKER, LogMessage, Run, SubLine};
pub use prefix::{ColorFn, ColorSpec, Prefix, ResolvedColor};
pub use redact::Redactor;
pub use sink::Sink;
pub use style::{LevelStyling, Presentation, TextStyle};
pub use terminal::{FALLBACK_WIDTH, TerminalRenderer};
pub use value::{CIRCULAR_REPRESENTATION, ErrorValue, Message, Value};

pub use tintlog_proc::template;

extern crate self as tintlog;
