use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};

use crate::coords::PixelDims;
use crate::core::{Layer, LayerCtx};
use crate::device::{Gpu, GpuInit};
use crate::diagnostics::ErrorSink;
use crate::frame::Frame;
use crate::terminal::{self, StdoutTerminal, TerminalProbe, MIN_DIMS};
use crate::time::{FrameClock, FramePacer, FrameTime, DEFAULT_TARGET_FPS};

use super::{Cancellation, RenderBackend};

/// Render loop configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Frame rate cap; `0` renders as fast as possible.
    pub target_fps: u32,

    /// Smallest raster size, whatever the terminal reports.
    pub min_dims: PixelDims,

    /// Stop normally after this many frames.
    pub max_frames: Option<u64>,

    /// Append a `WxH FPS: n` status line to every frame.
    pub show_fps: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            min_dims: MIN_DIMS,
            max_frames: None,
            show_fps: false,
        }
    }
}

/// Lifecycle of a [`Runtime`]. Transitions only go forward.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RunState {
    Created,
    Running,
    Stopped,
}

/// Why the render loop ended.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopExit {
    /// Frame limit reached or a layer requested a stop.
    Stopped,
    /// The backend reported errors; they were printed to the diagnostic stream.
    BackendError { records: usize },
    /// The cancellation flag was set.
    Interrupted,
}

impl LoopExit {
    pub fn is_success(self) -> bool {
        self == LoopExit::Stopped
    }

    /// Process exit status: 0 for a normal stop, 1 otherwise.
    pub fn exit_code(self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Drives layers against a backend and streams each frame to the terminal.
///
/// Per frame:
/// 1. negotiate the raster size with the terminal, reallocating on change
/// 2. clear the target, run every layer's `update`, then every `render`
/// 3. read the target back, convert to glyphs, write one text block
/// 4. drain the error sink, check cancellation, sleep off the frame budget
pub struct Runtime<B: RenderBackend = Gpu> {
    // Layers own backend resources and must drop before the backend.
    layers: Vec<Box<dyn Layer<B>>>,
    backend: B,

    frame: Frame,
    text: String,
    errors: ErrorSink,

    probe: Box<dyn TerminalProbe>,
    out: Box<dyn Write>,
    diag: Box<dyn Write>,
    cancel: Cancellation,

    config: RuntimeConfig,
    clock: FrameClock,
    pacer: FramePacer,
    state: RunState,
}

impl Runtime<Gpu> {
    /// Creates a runtime over a headless wgpu device sized to the terminal.
    ///
    /// Fails if the device cannot be acquired or reports errors while the
    /// render target is created; nothing acquired so far outlives the error.
    pub fn new(config: RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let fallback = config.min_dims.round_up_to_cells();
        let dims = terminal::negotiate(&StdoutTerminal, fallback, config.min_dims);
        let gpu = pollster::block_on(Gpu::new(gpu_init, dims))
            .context("GPU initialization failed")?;

        let adapter = gpu.adapter_info();
        let rt = Self::from_backend(gpu, config, io::stderr())?;
        log::info!(
            "runtime created at {}x{} on {} ({:?})",
            dims.width,
            dims.height,
            adapter.name,
            adapter.backend
        );
        Ok(rt)
    }
}

impl<B: RenderBackend> Runtime<B> {
    /// Creates a runtime over an existing backend.
    ///
    /// Defaults: terminal size from stdout, frames to stdout, diagnostics to
    /// stderr, and a cancellation flag that nothing sets.
    pub fn with_backend(backend: B, config: RuntimeConfig) -> Self {
        let dims = backend.dims();
        Self {
            layers: Vec::new(),
            backend,
            frame: Frame::new(dims),
            text: String::new(),
            errors: ErrorSink::new(),
            probe: Box::new(StdoutTerminal),
            out: Box::new(io::stdout()),
            diag: Box::new(io::stderr()),
            cancel: Cancellation::new(),
            pacer: FramePacer::from_fps(config.target_fps),
            config,
            clock: FrameClock::new(),
            state: RunState::Created,
        }
    }

    /// Creates a runtime over a freshly initialized backend.
    ///
    /// Errors the backend reported while it was set up are printed to `diag`
    /// and fail construction; the backend is dropped and no runtime is
    /// returned. On success `diag` becomes the runtime's diagnostic stream.
    pub fn from_backend(
        backend: B,
        config: RuntimeConfig,
        mut diag: impl Write + 'static,
    ) -> Result<Self> {
        let mut errors = ErrorSink::new();
        if errors.record("initialize", &backend) > 0 {
            let records = errors.drain_to(&mut diag);
            anyhow::bail!("backend reported {records} error(s) during initialization");
        }
        Ok(Self::with_backend(backend, config).with_diagnostics(diag))
    }

    pub fn with_probe(mut self, probe: impl TerminalProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn with_diagnostics(mut self, diag: impl Write + 'static) -> Self {
        self.diag = Box::new(diag);
        self
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Registers a layer. Layers run in registration order.
    pub fn push<L>(&mut self, layer: L) -> &mut Self
    where
        L: Layer<B> + 'static,
    {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Current raster size.
    pub fn dims(&self) -> PixelDims {
        self.frame.dims()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.clock.frames()
    }

    /// Runs the loop until it stops. Can only be called once.
    ///
    /// `Ok` carries the reason the loop ended; `Err` means writing a frame
    /// failed or the runtime already ran.
    pub fn run(&mut self) -> Result<LoopExit> {
        anyhow::ensure!(self.state == RunState::Created, "runtime already ran");
        self.state = RunState::Running;

        let result = self.run_loop();
        self.state = RunState::Stopped;

        match &result {
            Ok(exit) => log::info!(
                "render loop ended ({exit:?}) after {} frames, {:.1} fps average",
                self.clock.frames(),
                self.clock.average_fps()
            ),
            Err(e) => log::error!("render loop failed: {e:#}"),
        }
        result
    }

    fn run_loop(&mut self) -> Result<LoopExit> {
        self.errors.record("startup", &self.backend);
        let records = self.errors.drain_to(&mut self.diag);
        if records > 0 {
            return Ok(LoopExit::BackendError { records });
        }

        self.clock.reset();
        loop {
            let frame_start = Instant::now();
            let time = self.clock.tick();

            let stop_requested = self.step(time)?;

            let records = self.errors.drain_to(&mut self.diag);
            if records > 0 {
                return Ok(LoopExit::BackendError { records });
            }

            if self.cancel.is_cancelled() {
                log::info!("cancellation requested");
                return Ok(LoopExit::Interrupted);
            }

            let limit_reached = self
                .config
                .max_frames
                .is_some_and(|max| self.clock.frames() >= max);
            if stop_requested || limit_reached {
                return Ok(LoopExit::Stopped);
            }

            self.pacer.wait(frame_start);
        }
    }

    /// Renders and emits one frame. Returns whether a layer asked to stop.
    fn step(&mut self, time: FrameTime) -> Result<bool> {
        self.sync_dims();
        self.frame.reset();

        self.backend.clear();
        self.errors.record("clear", &self.backend);

        let dims = self.frame.dims();
        let stop_requested = {
            let mut ctx = LayerCtx::new(&self.backend, &mut self.errors, time);
            for layer in self.layers.iter_mut() {
                layer.update(&mut ctx, time.elapsed, dims);
            }
            for layer in self.layers.iter_mut() {
                layer.render(&mut ctx);
            }
            ctx.stop_requested()
        };

        if let Err(e) = self.backend.finish_and_read(self.frame.raster_mut()) {
            self.errors.push("readback", e);
        }
        self.errors.record("readback", &self.backend);

        self.frame.convert();
        self.frame.serialize(&mut self.text);
        if self.config.show_fps {
            self.push_status_line();
        }

        self.out
            .write_all(self.text.as_bytes())
            .and_then(|()| self.out.flush())
            .context("failed to write frame to output")?;

        Ok(stop_requested)
    }

    /// Appends `WxH FPS: n` with the running average over completed frames.
    fn push_status_line(&mut self) {
        let dims = self.frame.dims();
        self.text.push_str(&format!(
            "{}x{} FPS: {:.2}\n",
            dims.width,
            dims.height,
            self.clock.average_fps()
        ));
    }

    /// Follows the terminal size; a change reallocates target and frame.
    fn sync_dims(&mut self) {
        let current = self.frame.dims();
        let desired = terminal::negotiate(self.probe.as_ref(), current, self.config.min_dims);
        if desired == current {
            return;
        }

        log::debug!(
            "terminal resized: {}x{} -> {}x{}",
            current.width,
            current.height,
            desired.width,
            desired.height
        );
        self.backend.resize(desired);
        self.errors.record("resize", &self.backend);
        self.frame = Frame::new(desired);
    }
}

impl<B: RenderBackend> Drop for Runtime<B> {
    fn drop(&mut self) {
        // Tear layers down first so errors from releasing their resources
        // are still reported.
        self.layers.clear();
        self.errors.record("shutdown", &self.backend);
        self.errors.drain_to(&mut self.diag);
    }
}
