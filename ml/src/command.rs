//! Developer chat commands

use thiserror::Error;

use notifysched::NotificationRequest;

use crate::experience::MAX_VIRTUAL_LEVEL;
use crate::skill::Skill;
use crate::tracker::MilestoneRules;

/// Errors from parsing or running a developer command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Developer mode is disabled")]
    DeveloperModeDisabled,

    #[error("Command ignored inside an excluded region")]
    ExcludedRegion,

    #[error("Missing level argument")]
    MissingLevel,

    #[error("Invalid level: {0}")]
    InvalidLevel(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Level {0} is not a milestone")]
    NotMilestone(u32),
}

impl CommandError {
    /// Errors the user caused by typing something wrong, as opposed to the
    /// command not applying right now
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CommandError::MissingLevel | CommandError::InvalidLevel(_) | CommandError::UnknownSkill(_)
        )
    }
}

/// A parsed developer command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevCommand {
    /// `level <n> [skill]`: show the milestone for `n` as if it was just reached
    Level { level: u32, skill: Skill },
}

impl DevCommand {
    pub fn parse(command: &str, args: &[String]) -> Result<Self, CommandError> {
        match command {
            "level" => {
                let raw = args.first().ok_or(CommandError::MissingLevel)?;
                let level = raw
                    .parse::<u32>()
                    .ok()
                    .filter(|l| (1..=MAX_VIRTUAL_LEVEL).contains(l))
                    .ok_or_else(|| CommandError::InvalidLevel(raw.clone()))?;
                let skill = match args.get(1) {
                    Some(name) => name.parse::<Skill>().map_err(|_| CommandError::UnknownSkill(name.clone()))?,
                    None => Skill::Agility,
                };
                Ok(DevCommand::Level { level, skill })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Build the notification this command asks for
    pub fn request(&self, rules: &MilestoneRules) -> Result<NotificationRequest, CommandError> {
        match *self {
            DevCommand::Level { level, skill } => {
                if !rules.is_milestone(skill, level) {
                    return Err(CommandError::NotMilestone(level));
                }
                Ok(rules.request_for(skill, level))
            }
        }
    }
}
