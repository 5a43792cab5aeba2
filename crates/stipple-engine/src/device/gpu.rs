use std::sync::mpsc;

use anyhow::{Context, Result};

use crate::coords::PixelDims;
use crate::diagnostics::{BackendError, ErrorKind, ErrorQuery};
use crate::frame::BYTES_PER_PIXEL;
use crate::render::{RenderCtx, RenderTarget};
use crate::runtime::RenderBackend;

use super::error::PendingErrors;
use super::target::{self, OffscreenTarget, TARGET_FORMAT};

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// Adapter selection preference.
    pub power_preference: wgpu::PowerPreference,

    /// Accept only a software (fallback) adapter.
    ///
    /// Useful on machines with no usable GPU.
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Headless wgpu context rendering into an offscreen texture.
///
/// - creates and stores Instance/Adapter/Device/Queue
/// - owns the offscreen color target and its readback buffer
/// - collects uncaptured device errors for the runtime's error sink
pub struct Gpu {
    // Fields drop in declaration order; keep them in reverse acquisition order.
    target: OffscreenTarget,
    errors: PendingErrors,
    queue: wgpu::Queue,
    device: wgpu::Device,
    adapter: wgpu::Adapter,
    // Only held so it is released last.
    _instance: wgpu::Instance,
}

impl Gpu {
    /// Creates a headless GPU context with a render target of `dims`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu. On failure every
    /// object acquired so far is released before the error is returned.
    pub async fn new(init: GpuInit, dims: PixelDims) -> Result<Self> {
        anyhow::ensure!(!dims.is_empty(), "render target has zero size");

        let GpuInit {
            backends,
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("stipple device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let errors = PendingErrors::new();
        errors.attach(&device);

        let target = OffscreenTarget::new(&device, dims);

        Ok(Self {
            target,
            errors,
            queue,
            device,
            adapter,
            _instance: instance,
        })
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Renderer-facing context for the current target.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, TARGET_FORMAT, self.target.dims())
    }

    /// Records `draw` into a fresh encoder targeting the offscreen view and
    /// submits it.
    pub fn encode<F>(&self, label: &str, draw: F)
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let rctx = self.render_ctx();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });

        // RenderTarget borrows the encoder; dropped before finish().
        {
            let mut target = RenderTarget::new(&mut encoder, self.target.view());
            draw(&rctx, &mut target);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl ErrorQuery for Gpu {
    fn take_pending(&self) -> Vec<BackendError> {
        self.errors.take_pending()
    }
}

impl RenderBackend for Gpu {
    fn dims(&self) -> PixelDims {
        self.target.dims()
    }

    fn resize(&mut self, dims: PixelDims) {
        if dims == self.target.dims() {
            return;
        }
        log::debug!("reallocating render target at {}x{}", dims.width, dims.height);
        self.target = OffscreenTarget::new(&self.device, dims);
    }

    fn clear(&mut self) {
        self.encode("stipple clear", |_, target| {
            let _pass = crate::render::begin_pass(
                target,
                "stipple clear",
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            );
        });
    }

    fn finish_and_read(&mut self, raster: &mut [u8]) -> std::result::Result<(), BackendError> {
        let dims = self.target.dims();
        let expected = dims.area() * BYTES_PER_PIXEL;
        if raster.len() != expected {
            return Err(BackendError::new(
                ErrorKind::Readback,
                format!("destination holds {} bytes, target needs {expected}", raster.len()),
            ));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("stipple readback"),
            });
        self.target.encode_readback(&mut encoder);
        self.queue.submit(std::iter::once(encoder.finish()));

        let staging = self.target.staging();
        let slice = staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            // The receiver only goes away if readback already failed.
            let _ = tx.send(res);
        });

        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| BackendError::new(ErrorKind::Readback, format!("device poll failed: {e}")))?;

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(BackendError::new(
                    ErrorKind::Readback,
                    format!("buffer map failed: {e}"),
                ));
            }
            Err(_) => {
                return Err(BackendError::new(
                    ErrorKind::Readback,
                    "buffer map callback never ran",
                ));
            }
        }

        {
            let mapped = slice.get_mapped_range();
            target::rgba_rows_to_rgb(&mapped, self.target.padded_bytes_per_row(), dims, raster);
        }
        staging.unmap();

        Ok(())
    }
}
