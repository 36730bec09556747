//! jutsu_app — interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jutsu_app::app::{run, RunOptions};
use jutsu_app::config::AppConfig;
use jutsu_app::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "jutsu_app")]
#[command(about = "Hold a hand sign to cast a jutsu: chakra pool, cooldowns and overlays")]
struct Args {
    /// TOML file with engine balance and audio settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a hand-pose timeline instead of reading the keyboard
    #[arg(long)]
    script: Option<PathBuf>,

    /// Run without a window on a fixed-step clock
    #[arg(long)]
    headless: bool,

    /// Stop after this many frames (headless default: ten seconds' worth)
    #[arg(long)]
    frames: Option<u64>,

    /// Target frame rate
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Disable MIDI sound cues
    #[arg(long)]
    no_audio: bool,

    /// Log filter directive, e.g. `debug` or `chakra_core=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic");
    }));

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Jutsu Recognition — Hand Signs & Chakra Pool         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match (&args.script, args.headless) {
        (Some(path), _) => println!("  Hand: scripted ({})", path.display()),
        (None, true)    => println!("  Hand: none (headless without --script)"),
        (None, false)   => println!("  Hand: keyboard  (1-5 fingers, Tab hand in view)"),
    }
    println!();

    if let Err(e) = start(args) {
        tracing::error!(error = %e, "jutsu_app failed");
        std::process::exit(1);
    }
}

fn start(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => {
            let cfg = AppConfig::load(path)?;
            tracing::info!(path = %path.display(), "loaded configuration");
            cfg
        }
        None => AppConfig::default(),
    };

    let summary = run(RunOptions {
        config,
        script:   args.script,
        headless: args.headless,
        frames:   args.frames,
        fps:      args.fps.max(1),
        audio:    !args.no_audio,
    })?;

    if args.headless {
        println!("  {} frames, {} activations", summary.frames, summary.activations);
    }
    Ok(())
}
