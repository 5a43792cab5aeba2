use crate::device::Gpu;
use crate::diagnostics::{BackendError, ErrorQuery, ErrorSink};
use crate::time::FrameTime;

/// Per-frame context passed to [`Layer`](super::Layer) callbacks.
///
/// Lends the backend and the runtime's error sink. Layers call
/// [`check`](Self::check) after backend work; they never decide whether an
/// error is fatal.
pub struct LayerCtx<'a, B: ?Sized = Gpu> {
    backend: &'a B,
    errors: &'a mut ErrorSink,
    time: FrameTime,
    stop_requested: bool,
}

impl<'a, B: ?Sized> LayerCtx<'a, B> {
    pub(crate) fn new(backend: &'a B, errors: &'a mut ErrorSink, time: FrameTime) -> Self {
        Self {
            backend,
            errors,
            time,
            stop_requested: false,
        }
    }

    /// The rendering backend. The reference outlives `self`, so it can be held
    /// across calls to [`check`](Self::check).
    #[inline]
    pub fn backend(&self) -> &'a B {
        self.backend
    }

    /// Timing of the current frame.
    #[inline]
    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Reports an error the layer detected itself.
    pub fn report(&mut self, operation: &str, error: BackendError) {
        self.errors.push(operation, error);
    }

    /// Asks the runtime to stop normally after the current frame.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

impl<'a, B> LayerCtx<'a, B>
where
    B: ErrorQuery + ?Sized,
{
    /// Collects errors the backend reported since the last check, attributing
    /// them to `operation`. Returns how many were collected.
    pub fn check(&mut self, operation: &str) -> usize {
        self.errors.record(operation, self.backend)
    }
}
