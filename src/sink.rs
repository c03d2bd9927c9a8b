// SPDX-License-Identifier: MIT OR Apache-2.0

//! The output side of the pipeline.
//!
//! A [`Sink`] consumes compiled [`LogMessage`]s.  The crate ships three:
//! [`TerminalRenderer`](crate::TerminalRenderer), [`FileRenderer`](crate::FileRenderer)
//! and [`InMemorySink`](crate::InMemorySink).  A logger holds any number of them as
//! `Arc<dyn Sink>` and hands every message to each one in registration order.

use crate::message::LogMessage;
use std::fmt::Debug;

pub trait Sink: Debug + Send + Sync {
    /**
    Consumes one message.

    Called synchronously from the logging thread.  Sinks that need to do slow work
    queue it and return.
    */
    fn render(&self, message: &LogMessage);

    /**
    The application is about to exit.  Flush whatever is buffered.
    */
    fn prepare_to_die(&self);
}

/*
Boilerplate notes.

# Sink

Clone is up to each sink; file sinks own a worker thread and must not be duplicated.
PartialEq/Eq/Hash: we compare sinks by identity (`Arc::ptr_eq`) when unregistering, never by data.
Default makes no sense, a file sink needs a folder.
Display, From/Into, AsRef/Deref: no.
Send/Sync are required, sinks are shared between every thread that logs.
*/
