//! Logging utilities.
//!
//! Standard output carries the rendered image, so every log line goes to
//! standard error and the default level is quiet.

mod init;

pub use init::{init_logging, LoggingConfig};
