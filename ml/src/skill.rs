//! Skills and per-skill notification toggles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Attack,
    Defence,
    Strength,
    Hitpoints,
    Ranged,
    Prayer,
    Magic,
    Cooking,
    Woodcutting,
    Fletching,
    Fishing,
    Firemaking,
    Crafting,
    Smithing,
    Mining,
    Herblore,
    Agility,
    Thieving,
    Slayer,
    Farming,
    Runecraft,
    Hunter,
    Construction,
    Sailing,
}

impl Skill {
    pub const ALL: [Skill; 24] = [
        Skill::Attack,
        Skill::Defence,
        Skill::Strength,
        Skill::Hitpoints,
        Skill::Ranged,
        Skill::Prayer,
        Skill::Magic,
        Skill::Cooking,
        Skill::Woodcutting,
        Skill::Fletching,
        Skill::Fishing,
        Skill::Firemaking,
        Skill::Crafting,
        Skill::Smithing,
        Skill::Mining,
        Skill::Herblore,
        Skill::Agility,
        Skill::Thieving,
        Skill::Slayer,
        Skill::Farming,
        Skill::Runecraft,
        Skill::Hunter,
        Skill::Construction,
        Skill::Sailing,
    ];

    /// Display name as shown in game
    pub fn name(self) -> &'static str {
        match self {
            Skill::Attack => "Attack",
            Skill::Defence => "Defence",
            Skill::Strength => "Strength",
            Skill::Hitpoints => "Hitpoints",
            Skill::Ranged => "Ranged",
            Skill::Prayer => "Prayer",
            Skill::Magic => "Magic",
            Skill::Cooking => "Cooking",
            Skill::Woodcutting => "Woodcutting",
            Skill::Fletching => "Fletching",
            Skill::Fishing => "Fishing",
            Skill::Firemaking => "Firemaking",
            Skill::Crafting => "Crafting",
            Skill::Smithing => "Smithing",
            Skill::Mining => "Mining",
            Skill::Herblore => "Herblore",
            Skill::Agility => "Agility",
            Skill::Thieving => "Thieving",
            Skill::Slayer => "Slayer",
            Skill::Farming => "Farming",
            Skill::Runecraft => "Runecraft",
            Skill::Hunter => "Hunter",
            Skill::Construction => "Construction",
            Skill::Sailing => "Sailing",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Skill::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown skill: {}", s))
    }
}

fn default_true() -> bool {
    true
}

/// Which skills produce level notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillToggles {
    #[serde(default = "default_true")]
    pub attack: bool,
    #[serde(default = "default_true")]
    pub defence: bool,
    #[serde(default = "default_true")]
    pub strength: bool,
    #[serde(default = "default_true")]
    pub hitpoints: bool,
    #[serde(default = "default_true")]
    pub ranged: bool,
    #[serde(default = "default_true")]
    pub prayer: bool,
    #[serde(default = "default_true")]
    pub magic: bool,
    #[serde(default = "default_true")]
    pub cooking: bool,
    #[serde(default = "default_true")]
    pub woodcutting: bool,
    #[serde(default = "default_true")]
    pub fletching: bool,
    #[serde(default = "default_true")]
    pub fishing: bool,
    #[serde(default = "default_true")]
    pub firemaking: bool,
    #[serde(default = "default_true")]
    pub crafting: bool,
    #[serde(default = "default_true")]
    pub smithing: bool,
    #[serde(default = "default_true")]
    pub mining: bool,
    #[serde(default = "default_true")]
    pub herblore: bool,
    #[serde(default = "default_true")]
    pub agility: bool,
    #[serde(default = "default_true")]
    pub thieving: bool,
    #[serde(default = "default_true")]
    pub slayer: bool,
    #[serde(default = "default_true")]
    pub farming: bool,
    #[serde(default = "default_true")]
    pub runecraft: bool,
    #[serde(default = "default_true")]
    pub hunter: bool,
    #[serde(default = "default_true")]
    pub construction: bool,
    #[serde(default = "default_true")]
    pub sailing: bool,
}

impl SkillToggles {
    pub fn is_enabled(&self, skill: Skill) -> bool {
        match skill {
            Skill::Attack => self.attack,
            Skill::Defence => self.defence,
            Skill::Strength => self.strength,
            Skill::Hitpoints => self.hitpoints,
            Skill::Ranged => self.ranged,
            Skill::Prayer => self.prayer,
            Skill::Magic => self.magic,
            Skill::Cooking => self.cooking,
            Skill::Woodcutting => self.woodcutting,
            Skill::Fletching => self.fletching,
            Skill::Fishing => self.fishing,
            Skill::Firemaking => self.firemaking,
            Skill::Crafting => self.crafting,
            Skill::Smithing => self.smithing,
            Skill::Mining => self.mining,
            Skill::Herblore => self.herblore,
            Skill::Agility => self.agility,
            Skill::Thieving => self.thieving,
            Skill::Slayer => self.slayer,
            Skill::Farming => self.farming,
            Skill::Runecraft => self.runecraft,
            Skill::Hunter => self.hunter,
            Skill::Construction => self.construction,
            Skill::Sailing => self.sailing,
        }
    }
}

impl Default for SkillToggles {
    fn default() -> Self {
        Self {
            attack: true,
            defence: true,
            strength: true,
            hitpoints: true,
            ranged: true,
            prayer: true,
            magic: true,
            cooking: true,
            woodcutting: true,
            fletching: true,
            fishing: true,
            firemaking: true,
            crafting: true,
            smithing: true,
            mining: true,
            herblore: true,
            agility: true,
            thieving: true,
            slayer: true,
            farming: true,
            runecraft: true,
            hunter: true,
            construction: true,
            sailing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_from_str() {
        assert_eq!("agility".parse::<Skill>().unwrap(), Skill::Agility);
        assert_eq!("  RuneCraft ".parse::<Skill>().unwrap(), Skill::Runecraft);
        assert!("dungeoneering".parse::<Skill>().is_err());
    }

    #[test]
    fn test_skill_display() {
        assert_eq!(Skill::Hitpoints.to_string(), "Hitpoints");
    }

    #[test]
    fn test_all_skills_enabled_by_default() {
        let toggles = SkillToggles::default();
        assert!(Skill::ALL.iter().all(|s| toggles.is_enabled(*s)));
    }

    #[test]
    fn test_toggle_lookup_is_per_skill() {
        let toggles = SkillToggles {
            slayer: false,
            ..Default::default()
        };
        assert!(!toggles.is_enabled(Skill::Slayer));
        assert!(toggles.is_enabled(Skill::Farming));
    }
}
