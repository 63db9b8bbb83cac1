//! milestones - skill level milestone notifications
//!
//! Watches skill levels, picks out the configured milestones and shows them
//! through the `notifysched` scheduler.

pub mod announce;
pub mod cli;
pub mod command;
pub mod config;
pub mod experience;
pub mod host;
pub mod plugin;
pub mod skill;
pub mod template;
pub mod tracker;

pub use announce::{UPDATE_MESSAGE, UpdateNotice};
pub use command::{CommandError, DevCommand};
pub use config::{Config, LevelsConfig};
pub use host::{SimulatedSurface, SimulationOptions, SimulationReport, run_simulation};
pub use plugin::MilestonePlugin;
pub use skill::{Skill, SkillToggles};
pub use tracker::{LevelTracker, MilestoneRules, StatChange};
