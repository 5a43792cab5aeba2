use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Cooperative stop flag.
///
/// Set from a signal handler (or anywhere else), polled by the runtime once
/// per frame. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    /// A flag nothing sets except explicit [`cancel`](Self::cancel) calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// A flag set on SIGINT, SIGTERM or SIGHUP.
    ///
    /// The handler only stores to the flag. Only one handler can be installed
    /// per process; a second call fails.
    pub fn from_signals() -> Result<Self> {
        let cancel = Self::new();
        let flag = Arc::clone(&cancel.flag);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("failed to install signal handler")?;
        Ok(cancel)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
