use std::fmt;
use std::io::Write;

/// Category of a backend error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    OutOfMemory,
    Validation,
    Internal,
    /// Reading the rendered raster back from the device failed.
    Readback,
}

impl ErrorKind {
    /// Stable numeric code, printed alongside the description.
    pub const fn code(self) -> u32 {
        match self {
            ErrorKind::OutOfMemory => 1,
            ErrorKind::Validation => 2,
            ErrorKind::Internal => 3,
            ErrorKind::Readback => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::Validation => "validation error",
            ErrorKind::Internal => "internal error",
            ErrorKind::Readback => "readback error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pending error as reported by the backend.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BackendError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Source of pending backend errors.
///
/// `take_pending` returns every error reported since the previous call, in
/// the order the backend produced them, and clears them.
pub trait ErrorQuery {
    fn take_pending(&self) -> Vec<BackendError>;
}

/// An error attributed to the operation after which it was observed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ErrorRecord {
    operation: String,
    kind: ErrorKind,
    description: String,
}

impl ErrorRecord {
    pub fn new(operation: impl Into<String>, error: BackendError) -> Self {
        Self {
            operation: operation.into(),
            kind: error.kind,
            description: single_line(&error.message),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}): {}",
            self.operation,
            self.kind,
            self.kind.code(),
            self.description
        )
    }
}

/// Backend messages can span several lines; records print on exactly one.
fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arrival-ordered queue of error records.
///
/// Not synchronized: the runtime owns it and lends it to layers for the
/// duration of a frame.
#[derive(Debug, Default)]
pub struct ErrorSink {
    records: Vec<ErrorRecord>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulls every pending error out of `source`, attributing each to
    /// `operation`. Returns the number of records added.
    pub fn record<Q>(&mut self, operation: &str, source: &Q) -> usize
    where
        Q: ErrorQuery + ?Sized,
    {
        let pending = source.take_pending();
        let n = pending.len();
        self.records
            .extend(pending.into_iter().map(|e| ErrorRecord::new(operation, e)));
        n
    }

    /// Appends one error directly, for failures the runtime observes itself.
    pub fn push(&mut self, operation: &str, error: BackendError) {
        self.records.push(ErrorRecord::new(operation, error));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Writes each queued record to `out`, one per line in arrival order,
    /// then clears the queue. Returns how many records were queued.
    ///
    /// The queue is cleared even if writing fails.
    pub fn drain_to<W>(&mut self, out: &mut W) -> usize
    where
        W: Write + ?Sized,
    {
        let n = self.records.len();
        for record in self.records.drain(..) {
            if let Err(e) = writeln!(out, "{record}") {
                log::warn!("failed to write error record: {e}");
            }
        }
        if n > 0 {
            log::debug!("drained {n} backend error record(s)");
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io;

    use super::*;

    /// Hands out queued batches one `take_pending` call at a time.
    #[derive(Default)]
    struct ScriptedErrors {
        batches: RefCell<Vec<Vec<BackendError>>>,
    }

    impl ScriptedErrors {
        fn with(batches: Vec<Vec<BackendError>>) -> Self {
            let mut batches = batches;
            batches.reverse();
            Self {
                batches: RefCell::new(batches),
            }
        }
    }

    impl ErrorQuery for ScriptedErrors {
        fn take_pending(&self) -> Vec<BackendError> {
            self.batches.borrow_mut().pop().unwrap_or_default()
        }
    }

    fn err(kind: ErrorKind, msg: &str) -> BackendError {
        BackendError::new(kind, msg)
    }

    // ── record ────────────────────────────────────────────────────────────

    #[test]
    fn record_with_nothing_pending_adds_nothing() {
        let mut sink = ErrorSink::new();
        assert_eq!(sink.record("noop", &ScriptedErrors::default()), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn record_keeps_backend_order() {
        let source = ScriptedErrors::with(vec![vec![
            err(ErrorKind::Validation, "first"),
            err(ErrorKind::OutOfMemory, "second"),
        ]]);
        let mut sink = ErrorSink::new();
        assert_eq!(sink.record("draw", &source), 2);

        let ops: Vec<_> = sink.records().iter().map(|r| r.description()).collect();
        assert_eq!(ops, ["first", "second"]);
        assert_eq!(sink.records()[1].kind(), ErrorKind::OutOfMemory);
    }

    #[test]
    fn multi_line_messages_collapse() {
        let record = ErrorRecord::new(
            "submit",
            err(ErrorKind::Validation, "Validation Error\n\nCaused by:\n    bad buffer\n"),
        );
        assert_eq!(record.description(), "Validation Error Caused by: bad buffer");
    }

    // ── drain ─────────────────────────────────────────────────────────────

    #[test]
    fn drain_prints_all_records_in_order_then_empties() {
        let source = ScriptedErrors::with(vec![
            vec![err(ErrorKind::Validation, "a"), err(ErrorKind::Validation, "b")],
            vec![err(ErrorKind::Internal, "c"), err(ErrorKind::OutOfMemory, "d")],
        ]);
        let mut sink = ErrorSink::new();
        sink.record("upload", &source);
        sink.record("draw", &source);

        let mut out = Vec::new();
        assert_eq!(sink.drain_to(&mut out), 4);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "upload: validation error (2): a",
                "upload: validation error (2): b",
                "draw: internal error (3): c",
                "draw: out of memory (1): d",
            ]
        );
        assert!(sink.is_empty());

        let mut again = Vec::new();
        assert_eq!(sink.drain_to(&mut again), 0);
        assert!(again.is_empty());
    }

    #[test]
    fn drain_clears_even_when_writer_fails() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = ErrorSink::new();
        sink.push("readback", err(ErrorKind::Readback, "map failed"));
        assert_eq!(sink.drain_to(&mut Broken), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn record_after_drain_within_frame_starts_fresh() {
        let source = ScriptedErrors::with(vec![
            vec![err(ErrorKind::Validation, "x")],
            vec![err(ErrorKind::Validation, "y")],
        ]);
        let mut sink = ErrorSink::new();
        sink.record("one", &source);
        sink.drain_to(&mut Vec::new());
        sink.record("two", &source);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].operation(), "two");
    }
}
