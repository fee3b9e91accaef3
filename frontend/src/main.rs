use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ramwatch_core::core::title::{Players, Title};
use ramwatch_core::trace::RamTrace;
use ramwatch_titles::registry;
use tracing_subscriber::EnvFilter;

mod config;
mod replay;
mod rom_path;

use config::HarnessConfig;
use replay::ReplayOptions;

#[derive(Parser)]
#[command(name = "ramwatch", version, about = "Reward and terminal signals from Atari 2600 RAM")]
struct Cli {
    /// Config file (default: <config_dir>/ramwatch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported titles
    List,
    /// Show modes, difficulties and actions for a title name or cartridge
    Info { title: String },
    /// Step a title over a recorded RAM trace
    Replay {
        /// Title name, or a cartridge image (.bin/.a26 or .zip)
        title: String,
        /// RAM trace: 128 bytes per frame, optionally gzipped
        trace: PathBuf,
        #[arg(long)]
        mode: Option<u32>,
        /// 1, 2 or 4
        #[arg(long)]
        players: Option<usize>,
        /// Frame cap per episode; 0 disables it
        #[arg(long)]
        max_frames: Option<u32>,
        /// One JSON object per frame, then one per episode
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(HarnessConfig::config_path);
    let config = HarnessConfig::load(&config_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    match cli.command {
        Command::List => list(),
        Command::Info { title } => info(&title),
        Command::Replay {
            title,
            trace,
            mode,
            players,
            max_frames,
            json,
        } => {
            let mut config = config;
            if let Some(players) = players {
                config.players = players;
            }
            if let Some(mode) = mode {
                config.mode = Some(mode);
            }
            if let Some(max_frames) = max_frames {
                config.max_frames_per_episode = max_frames;
            }
            config.json |= json;
            replay_trace(&title, &trace, &config)
        }
    }
}

fn list() -> Result<()> {
    for entry in registry::all() {
        println!("{:<12} {}", entry.name, entry.md5);
    }
    Ok(())
}

/// Resolve a title by registry name, falling back to identifying a
/// cartridge image by its MD5.
fn resolve_title(arg: &str) -> Result<Box<dyn Title>> {
    if let Some(entry) = registry::find(arg) {
        return Ok((entry.create)());
    }

    let path = Path::new(arg);
    if !path.exists() {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        bail!("unknown title {arg:?} (available: {})", names.join(", "));
    }

    let rom = rom_path::load_cartridge(path)
        .with_context(|| format!("failed to load cartridge {}", path.display()))?;
    match registry::identify(&rom) {
        Some(entry) => Ok((entry.create)()),
        None => bail!(
            "unsupported cartridge {} (md5 {})",
            path.display(),
            registry::rom_md5(&rom)
        ),
    }
}

fn info(arg: &str) -> Result<()> {
    let title = resolve_title(arg)?;
    println!("title:        {}", title.name());
    println!("md5:          {}", title.md5());
    for players in [Players::One, Players::Two, Players::Four] {
        let modes = title.modes(players);
        if !modes.is_empty() {
            println!("{:<13} {modes:?}", format!("{players}:"));
        }
    }
    println!("difficulties: {:?}", title.available_difficulties());
    println!("lives:        {}", title.lives());
    let actions: Vec<_> = title.minimal_action_set().iter().map(|a| a.name()).collect();
    println!("actions:      {}", actions.join(" "));
    Ok(())
}

fn replay_trace(arg: &str, trace_path: &Path, config: &HarnessConfig) -> Result<()> {
    let mut title = resolve_title(arg)?;
    let mut trace = RamTrace::load(trace_path)
        .with_context(|| format!("failed to load trace {}", trace_path.display()))?;

    let options = ReplayOptions {
        mode: config.mode,
        players: config.players()?,
        settings: config.episode_settings(),
    };

    let json = config.json;
    let summaries = replay::run(title.as_mut(), &mut trace, &options, |record| {
        if json {
            match serde_json::to_string(record) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("failed to encode frame: {e}"),
            }
        }
    })?;

    for summary in &summaries {
        if json {
            println!("{}", serde_json::to_string(summary)?);
        } else {
            println!(
                "episode {:>3}  frames {:>6}  rewards {:?}  {:?}",
                summary.episode, summary.frames, summary.totals, summary.end
            );
        }
    }
    Ok(())
}
