use anyhow::Context;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use overmark::Config;
use overmark::daemon::Daemon;
use overmark::replay;

#[derive(Parser, Debug)]
#[command(name = "overmark")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("OVERMARK_GIT_HASH"), ")"),
    about = "Screen overlay annotation tool with a floating, auto-hiding toolbar"
)]
struct Cli {
    /// Run as daemon (background, toggle with the configured hotkey / SIGUSR1)
    #[arg(long, short = 'd', action = ArgAction::SetTrue, conflicts_with = "replay")]
    daemon: bool,

    /// Replay a JSON script of drawing steps
    #[arg(long, value_name = "SCRIPT", requires = "output")]
    replay: Option<PathBuf>,

    /// PNG file the replayed overlay is rendered to
    #[arg(long, short = 'o', value_name = "PNG", requires = "replay")]
    output: Option<PathBuf>,

    /// Read configuration from FILE instead of ~/.config/overmark/config.toml
    #[arg(long, value_name = "FILE")]
    config_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    if cli.daemon {
        log::info!("Starting in daemon mode");
        let mut daemon = Daemon::new(&config);
        daemon.run()?;
    } else if let (Some(script), Some(output)) = (&cli.replay, &cli.output) {
        let count = replay::run_to_png(&config, script, output)?;
        println!(
            "Rendered {} annotation(s) to {}",
            count,
            output.display()
        );
    } else {
        // No flags: show usage
        println!("overmark: Screen overlay annotation tool");
        println!();
        println!("Usage:");
        println!("  overmark --daemon                       Run as background daemon");
        println!("  overmark --replay SCRIPT --output PNG   Render a scripted session");
        println!("  overmark --help                         Show help");
        println!();
        println!("Daemon mode:");
        println!("  1. Run: overmark --daemon");
        println!("  2. Bind your toggle hotkey (default Super+Shift+D) in the compositor:");
        println!("     bind = SUPER SHIFT, D, exec, pkill -SIGUSR1 overmark");
        println!("  3. Each SIGUSR1 toggles drawing mode; SIGTERM or Ctrl+C stops the daemon");
    }

    Ok(())
}
