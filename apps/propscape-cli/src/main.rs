use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use propscape_audio::AudioSink;
use propscape_common::EntityDescriptor;
use propscape_input::PointerState;
use propscape_interaction::PageSurface;
use propscape_render::{DebugTextRenderer, HeadlessScene, RenderView, Renderer};
use propscape_runtime::{SceneConfig, SceneRuntime};
use propscape_tools::RegistryInspector;
use tracing_subscriber::EnvFilter;

const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "propscape-cli", about = "Headless driver for propscape scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default scene parameters
    Info,
    /// Run a scene headless at 60 frames per second
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Scene file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Click at this NDC position, e.g. `--click-at 0,0`
        #[arg(long, value_delimiter = ',', num_args = 2, allow_negative_numbers = true)]
        click_at: Option<Vec<f32>>,
        /// Frame on which the click happens
        #[arg(long, default_value = "2")]
        click_frame: u64,
        /// Print the scene at the end
        #[arg(long)]
        dump: bool,
    },
    /// Drop one box onto the floor and report where it comes to rest
    Drop {
        /// Start height of the box center
        #[arg(long, default_value = "10")]
        height: f32,
        /// Simulated seconds
        #[arg(short, long, default_value = "3")]
        seconds: f64,
    },
    /// Build a scene and list its entities after the first frame
    Inspect {
        /// Scene file (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Audio backend that only logs.
#[derive(Default)]
struct LogSink {
    plays: usize,
}

impl AudioSink for LogSink {
    fn play_from_start(&mut self, clip: &str, gain: f32) {
        self.plays += 1;
        tracing::info!(clip, gain, "play");
    }

    fn set_gain(&mut self, clip: &str, gain: f32) {
        tracing::debug!(clip, gain, "set gain");
    }
}

/// Page surface that logs what a browser would do.
#[derive(Default)]
struct LogSurface;

impl PageSurface for LogSurface {
    fn open_link(&mut self, url: &str) {
        tracing::info!(url, "open link");
    }

    fn show_panel(&mut self, name: &str) {
        tracing::info!(name, "show panel");
    }

    fn hide_panel(&mut self, name: &str) {
        tracing::info!(name, "hide panel");
    }
}

type HeadlessRuntime = SceneRuntime<HeadlessScene, LogSink, LogSurface>;

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn build(config: SceneConfig) -> anyhow::Result<HeadlessRuntime> {
    SceneRuntime::new(config, HeadlessScene::new(), LogSink::default(), LogSurface)
        .context("building scene runtime")
}

fn render_view(rt: &HeadlessRuntime) -> RenderView {
    let camera = rt.camera();
    RenderView {
        eye: camera.position,
        target: camera.target,
        fov_degrees: camera.fov_degrees,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            let config = SceneConfig::default();
            println!("propscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "physics: gravity={:.1} friction={} restitution={}",
                config.physics.gravity.y, config.physics.friction, config.physics.restitution
            );
            println!(
                "stepper: fixed_dt={:.4} max_substeps={} max_delta={}",
                config.stepper.fixed_dt, config.stepper.max_substeps, config.stepper.max_delta
            );
            println!(
                "spawner: period={}s window={}s batch={} stagger={}s",
                config.spawner.period,
                config.spawner.window,
                config.spawner.batch_size,
                config.spawner.stagger
            );
            println!("audio: threshold={} clip={}", config.audio.threshold, config.audio.clip);
        }
        Commands::Run {
            frames,
            config,
            click_at,
            click_frame,
            dump,
        } => {
            let mut rt = build(load_config(config.as_ref())?)?;
            let click = click_at.map(|xy| Vec2::new(xy[0], xy[1]));
            let mut spawned = 0;
            let mut sounds = 0;
            for frame in 1..=frames {
                let pointer = match click {
                    Some(ndc) if frame == click_frame => PointerState::click_at(ndc),
                    Some(ndc) => PointerState::at(ndc),
                    None => PointerState::default(),
                };
                let report = rt.tick(frame as f64 * FRAME_DT, &pointer);
                spawned += report.spawned.len();
                sounds += report.sounds;
                if frame % 60 == 0 {
                    tracing::info!(
                        second = frame / 60,
                        entities = rt.registry().len(),
                        state = ?report.state,
                        "progress"
                    );
                }
            }
            println!(
                "Ran {frames} frames: spawned={spawned} sounds={sounds} plays={}",
                rt.sink().plays
            );
            println!("{}", RegistryInspector::summary(rt.registry()));
            println!("Interaction: {:?}", rt.controller().state());
            if dump {
                let view = render_view(&rt);
                print!("{}", DebugTextRenderer::new().render(rt.registry().scene(), &view));
            }
        }
        Commands::Drop { height, seconds } => {
            let mut config = SceneConfig::default();
            config.spawner.enabled = false;
            let mut rt = build(config)?;
            let crate_box = EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::new(0.0, height, 0.0));
            let id = rt.spawn(&crate_box)?;

            let frames = (seconds / FRAME_DT).round() as u64;
            for frame in 1..=frames {
                rt.tick(frame as f64 * FRAME_DT, &PointerState::default());
                if frame % 30 == 0 {
                    if let Some(info) = RegistryInspector::inspect_entity(rt.registry(), id) {
                        println!("t={:.2}s y={:.3}", frame as f64 * FRAME_DT, info.position[1]);
                    }
                }
            }
            let info = RegistryInspector::inspect_entity(rt.registry(), id)
                .context("dropped box disappeared")?;
            println!(
                "Rest: y={:.3} (expected 0.500) sounds={}",
                info.position[1],
                rt.sink().plays
            );
        }
        Commands::Inspect { config } => {
            let mut rt = build(load_config(config.as_ref())?)?;
            rt.tick(0.0, &PointerState::default());
            println!("{}", RegistryInspector::summary(rt.registry()));
            for id in RegistryInspector::list_entities(rt.registry()) {
                if let Some(info) = RegistryInspector::inspect_entity(rt.registry(), id) {
                    println!("  {info}");
                }
            }
            let waiting = rt.props().waiting();
            if waiting > 0 {
                println!("{waiting} props waiting for assets");
            }
            for name in rt.props().dropped() {
                println!("  dropped prop: {name}");
            }
        }
    }

    Ok(())
}
