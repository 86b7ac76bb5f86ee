use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use orrery_config::Config;
use orrery_kernel::OrbitSystem;
use orrery_render::{DebugTextRenderer, FrameDriver, FrameHost, RenderView, SceneStyle};
use orrery_tools::OrbitInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orrery-cli", about = "Headless runner for the Earth/Moon orrery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the frame loop headless and print the orbit state
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Print every N-th frame (0 prints only the final summary)
        #[arg(short, long, default_value = "60")]
        every: u64,
        /// Milliseconds to wait between frames
        #[arg(long, default_value = "0")]
        frame_ms: u64,
        /// Override the orbit radius
        #[arg(long)]
        radius: Option<f64>,
        /// Emit the final summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

/// Headless host: paces frames with a sleep and prints every N-th one.
struct ConsoleHost {
    remaining: u64,
    every: u64,
    interval: Option<Duration>,
}

impl FrameHost for ConsoleHost {
    type Frame = String;

    fn present(&mut self, tick: u64, frame: String) {
        if self.every > 0 && tick % self.every == 0 {
            print!("{frame}");
        }
    }

    fn wait_for_next_frame(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return false;
        }
        if let Some(interval) = self.interval {
            std::thread::sleep(interval);
        }
        true
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load_or_default(cli.config.as_deref())?;

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            println!("orrery-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", orrery_render::crate_info());
            println!("tools: {}", orrery_tools::crate_info());
            println!(
                "scene: {} orbited by {} at radius {}",
                config.primary.name, config.satellite.name, config.orbit.radius
            );
        }
        Commands::Simulate {
            ticks,
            every,
            frame_ms,
            radius,
            json,
        } => {
            if let Some(r) = radius {
                config.orbit.radius = r;
                config.validate()?;
            }
            if ticks == 0 {
                anyhow::bail!("--ticks must be at least 1");
            }

            let system = OrbitSystem::new(
                config.primary_body(),
                config.satellite_body(),
                config.orbit_relation(),
            );
            let mut driver = FrameDriver::new(system, RenderView::from_config(&config.camera));
            let renderer = DebugTextRenderer::with_style(&SceneStyle::from_config(&config));
            let mut host = ConsoleHost {
                remaining: ticks,
                every,
                interval: (frame_ms > 0).then(|| Duration::from_millis(frame_ms)),
            };

            tracing::info!(ticks, every, "simulation starting");
            let frames = driver.run(&renderer, &mut host);
            tracing::info!(frames, "simulation finished");

            let summary = OrbitInspector::summary(driver.system());
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}
