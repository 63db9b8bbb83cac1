use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use milestones::cli::{Cli, Command};
use milestones::config::Config;
use milestones::tracker::MilestoneRules;
use milestones::{DevCommand, SimulationOptions, UpdateNotice, run_simulation};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>, to_stderr: bool) -> Result<()> {
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    if to_stderr {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        let log_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("milestones")
            .join("logs");
        fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
        let log_file = fs::File::create(log_dir.join("milestones.log")).context("Failed to create log file")?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
    }

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

async fn cmd_simulate(
    config: Config,
    ticks: u32,
    tick_ms: Option<u64>,
    display_ticks: u32,
    burst: usize,
    logout_at: Option<u32>,
) -> Result<()> {
    let options = SimulationOptions {
        ticks,
        tick: Duration::from_millis(tick_ms.unwrap_or(config.tick_ms).max(1)),
        display_ticks,
        burst,
        logout_at,
    };
    let report = run_simulation(config, options).await?;

    for message in &report.chat {
        println!("{} {}", "chat:".yellow(), message);
    }
    for (i, title) in report.shown.iter().enumerate() {
        println!("{:>3} {}", (i + 1).to_string().dimmed(), title.cyan());
    }
    println!("Ticks: {}", report.ticks);
    println!("  Opened: {}", report.stats.total_opened);
    println!("  Closed: {}", report.stats.total_closed);
    println!("  Abandoned: {}", report.stats.total_abandoned);
    println!("  Dropped: {}", report.stats.total_dropped);
    println!("  Peak queue depth: {}", report.stats.peak_queue_depth);
    println!("  Still pending: {}", report.pending);
    if report.recoveries > 0 {
        println!("  {} {}", "Recoveries:".red(), report.recoveries);
    }
    Ok(())
}

fn cmd_level(config: &Config, level: String, skill: Option<String>) -> Result<()> {
    let args: Vec<String> = std::iter::once(level).chain(skill).collect();
    let rules = MilestoneRules::from_config(config);
    let request = DevCommand::parse("level", &args)?.request(&rules)?;

    println!("{} {}", "✓".green(), request.title().bold());
    println!("  {}", request.body());
    match request.color() {
        Some(color) => println!("  color: {}", color),
        None => println!("  color: {}", "default".dimmed()),
    }
    Ok(())
}

fn cmd_announce(config: &Config, clear: bool) -> Result<()> {
    let notice = UpdateNotice::new(config.state_path());
    if clear {
        notice.clear()?;
        println!("{} Cleared update notice state: {}", "✓".green(), notice.path().display());
        return Ok(());
    }
    match notice.last_message()? {
        Some(message) => println!("Last shown: {}", message),
        None => println!("No update notice shown yet"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref(), cli.log_stderr)
        .context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Simulate {
            ticks,
            tick_ms,
            display_ticks,
            burst,
            logout_at,
        } => cmd_simulate(config, ticks, tick_ms, display_ticks, burst, logout_at).await,
        Command::Level { level, skill } => cmd_level(&config, level, skill),
        Command::Config => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
        Command::Announce { clear } => cmd_announce(&config, clear),
    }
}
