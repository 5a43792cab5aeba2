mod layers;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use stipple_engine::device::GpuInit;
use stipple_engine::logging::{init_logging, LoggingConfig};
use stipple_engine::runtime::{Cancellation, LoopExit, Runtime, RuntimeConfig};
use stipple_engine::time::DEFAULT_TARGET_FPS;

use layers::{ColorWheel, Flame, Palette};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Scene {
    /// Spinning color wheel
    Colorwheel,
    /// Fire effect
    Flame,
    /// Fire with the color wheel drawn over it
    Both,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum FlameColor {
    Blue,
    Red,
}

impl From<FlameColor> for Palette {
    fn from(color: FlameColor) -> Self {
        match color {
            FlameColor::Blue => Palette::Blue,
            FlameColor::Red => Palette::Red,
        }
    }
}

/// Renders GPU scenes into the terminal as colored Braille
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scene to render
    #[arg(short, long, value_enum, default_value = "colorwheel")]
    scene: Scene,

    /// Flame palette
    #[arg(long, value_enum, default_value = "red")]
    flame: FlameColor,

    /// Frame rate cap (0 = uncapped)
    #[arg(long, default_value_t = DEFAULT_TARGET_FPS)]
    fps: u32,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Hide the per-frame size/FPS status line
    #[arg(long)]
    no_fps: bool,

    /// Use the software (fallback) adapter
    #[arg(long)]
    software: bool,

    /// Log filter, env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            target_fps: self.fps,
            max_frames: self.frames,
            show_fps: !self.no_fps,
            ..Default::default()
        }
    }

    fn gpu_init(&self) -> GpuInit {
        GpuInit {
            force_fallback_adapter: self.software,
            ..Default::default()
        }
    }
}

fn run(args: &Args) -> Result<LoopExit> {
    let cancel = Cancellation::from_signals()?;

    let mut runtime =
        Runtime::new(args.runtime_config(), args.gpu_init())?.with_cancellation(cancel);

    match args.scene {
        Scene::Colorwheel => {
            runtime.push(ColorWheel::new());
        }
        Scene::Flame => {
            runtime.push(Flame::new(args.flame.into()));
        }
        Scene::Both => {
            runtime
                .push(Flame::new(args.flame.into()))
                .push(ColorWheel::new());
        }
    }

    runtime.run()
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..Default::default()
    });

    match run(&args) {
        Ok(exit) => {
            if !exit.is_success() {
                log::warn!("stopped: {exit:?}");
            }
            ExitCode::from(exit.exit_code())
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_render_colorwheel_at_120hz_forever() {
        let args = Args::parse_from(["stipple-demo"]);
        assert_eq!(args.scene, Scene::Colorwheel);
        let config = args.runtime_config();
        assert_eq!(config.target_fps, 120);
        assert_eq!(config.max_frames, None);
        assert!(config.show_fps);
        assert!(!args.gpu_init().force_fallback_adapter);
    }

    #[test]
    fn flags_reach_runtime_config() {
        let args = Args::parse_from([
            "stipple-demo",
            "--scene",
            "both",
            "--flame",
            "blue",
            "--fps",
            "30",
            "--frames",
            "10",
            "--software",
            "--no-fps",
        ]);
        assert_eq!(args.scene, Scene::Both);
        assert_eq!(Palette::from(args.flame), Palette::Blue);
        let config = args.runtime_config();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.max_frames, Some(10));
        assert!(!config.show_fps);
        assert!(args.gpu_init().force_fallback_adapter);
    }

    #[test]
    fn args_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
