use std::sync::{Arc, Mutex, MutexGuard};

use crate::diagnostics::{BackendError, ErrorKind, ErrorQuery};

/// Errors reported by the wgpu device that nobody has collected yet.
///
/// wgpu delivers uncaptured errors through a callback that may fire on any
/// thread, so the queue is shared behind a mutex. Reading it through
/// [`ErrorQuery`] empties it.
#[derive(Debug, Clone, Default)]
pub struct PendingErrors {
    queue: Arc<Mutex<Vec<BackendError>>>,
}

impl PendingErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes the device's uncaptured errors into this queue.
    pub fn attach(&self, device: &wgpu::Device) {
        let queue = self.clone();
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| {
            queue.push(to_backend_error(&err));
        }));
    }

    pub fn push(&self, error: BackendError) {
        self.lock().push(error);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BackendError>> {
        // A panic while holding the lock cannot leave a Vec half-written.
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ErrorQuery for PendingErrors {
    fn take_pending(&self) -> Vec<BackendError> {
        std::mem::take(&mut *self.lock())
    }
}

pub(crate) fn to_backend_error(err: &wgpu::Error) -> BackendError {
    let kind = match err {
        wgpu::Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
        wgpu::Error::Validation { .. } => ErrorKind::Validation,
        _ => ErrorKind::Internal,
    };
    BackendError::new(kind, err.to_string())
}
