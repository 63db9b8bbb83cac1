//! CLI argument parsing for milestones

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ml",
    author,
    version,
    about = "Skill level milestone notifications",
    after_help = "Logs are written to: ~/.local/share/milestones/logs/milestones.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Drive a simulated session and report what was shown
    Simulate {
        /// Number of host ticks to run
        #[arg(short, long, default_value = "60")]
        ticks: u32,

        /// Tick period in milliseconds (default: from config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: Option<u64>,

        /// Ticks a notification stays on screen before collapsing
        #[arg(short, long, default_value = "5")]
        display_ticks: u32,

        /// Extra notifications pushed at once from a background task
        #[arg(short, long, default_value = "0")]
        burst: usize,

        /// Log out and back in at this tick
        #[arg(long)]
        logout_at: Option<u32>,
    },

    /// Evaluate the developer `level` command without a session
    Level {
        /// Level to announce
        #[arg(required = true)]
        level: String,

        /// Skill name (default: Agility)
        skill: Option<String>,
    },

    /// Print the resolved configuration as YAML
    Config,

    /// Show or reset the update announcement state
    Announce {
        /// Forget the stored announcement so it shows again
        #[arg(long)]
        clear: bool,
    },
}
