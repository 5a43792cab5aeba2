//! Deferred backend error reporting.
//!
//! Backend calls happen deep inside layer code that should not decide what a
//! failure means. Errors are collected into an [`ErrorSink`] as they are
//! observed and surfaced once per frame by the runtime.

mod sink;

pub use sink::{BackendError, ErrorKind, ErrorQuery, ErrorRecord, ErrorSink};
