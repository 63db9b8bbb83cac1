//! Level tracking and milestone filtering
//!
//! [`MilestoneRules`] decides whether a level is worth a notification and
//! renders the request; [`LevelTracker`] remembers the last level seen for
//! every skill so that only real level-ups reach the rules.

use std::collections::{BTreeSet, HashMap, HashSet};

use notifysched::{NotificationRequest, Rgb};
use tracing::{debug, warn};

use crate::config::Config;
use crate::experience::{self, MAX_REAL_LEVEL};
use crate::skill::{Skill, SkillToggles};
use crate::template;

/// A skill's level or experience changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatChange {
    pub skill: Skill,
    /// Real level as reported by the host, capped at 99
    pub level: u32,
    pub xp: u32,
}

impl StatChange {
    pub fn new(skill: Skill, level: u32, xp: u32) -> Self {
        Self { skill, level, xp }
    }

    /// Level is a real level and experience is within the skill cap
    pub fn is_valid(&self) -> bool {
        experience::is_valid_real_level(self.level) && experience::is_valid_experience(self.xp)
    }
}

/// Milestone filter and request renderer built from [`Config`]
#[derive(Debug, Clone)]
pub struct MilestoneRules {
    title: String,
    text: String,
    color: Option<Rgb>,
    levels: BTreeSet<u32>,
    show_virtual_levels: bool,
    skills: SkillToggles,
    excluded_regions: HashSet<u32>,
}

impl MilestoneRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.levels.title.clone(),
            text: config.levels.text.clone(),
            color: config.levels.color,
            levels: parse_levels(&config.levels.show_on_levels),
            show_virtual_levels: config.levels.show_virtual_levels,
            skills: config.skills.clone(),
            excluded_regions: config.excluded_regions.iter().copied().collect(),
        }
    }

    /// Whether reaching `level` in `skill` deserves a notification
    pub fn is_milestone(&self, skill: Skill, level: u32) -> bool {
        if level > MAX_REAL_LEVEL {
            return self.show_virtual_levels;
        }
        self.skills.is_enabled(skill) && self.levels.contains(&level)
    }

    pub fn request_for(&self, skill: Skill, level: u32) -> NotificationRequest {
        let title = template::render(&self.title, skill, level);
        let body = template::render(&self.text, skill, level);
        match self.color {
            Some(color) => NotificationRequest::with_color(title, body, color),
            None => NotificationRequest::new(title, body),
        }
    }

    /// True when any of the loaded map regions is excluded
    pub fn in_excluded_region(&self, map_regions: &[u32]) -> bool {
        map_regions.iter().any(|r| self.excluded_regions.contains(r))
    }

    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.iter().copied()
    }

    pub fn show_virtual_levels(&self) -> bool {
        self.show_virtual_levels
    }
}

/// Parse a comma separated level list, skipping entries that are not real levels
pub fn parse_levels(list: &str) -> BTreeSet<u32> {
    let mut levels = BTreeSet::new();
    for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.parse::<u32>() {
            Ok(level) if experience::is_valid_real_level(level) => {
                levels.insert(level);
            }
            _ => warn!(entry, "parse_levels: ignoring invalid level"),
        }
    }
    levels
}

/// Remembers the last level per skill and turns level-ups into requests
#[derive(Debug)]
pub struct LevelTracker {
    rules: MilestoneRules,
    levels: HashMap<Skill, u32>,
}

impl LevelTracker {
    pub fn new(rules: MilestoneRules) -> Self {
        Self {
            rules,
            levels: HashMap::new(),
        }
    }

    /// Record a stat change and return the notification it earns, if any
    ///
    /// The first change seen for a skill only establishes its baseline.
    pub fn on_stat_changed(&mut self, change: StatChange, map_regions: &[u32]) -> Option<NotificationRequest> {
        if self.rules.in_excluded_region(map_regions) {
            debug!(skill = %change.skill, "LevelTracker::on_stat_changed: inside excluded region");
            return None;
        }
        if !change.is_valid() {
            warn!(skill = %change.skill, level = change.level, xp = change.xp, "LevelTracker::on_stat_changed: ignoring invalid change");
            return None;
        }

        let level = self.effective_level(change);
        let previous = self.levels.insert(change.skill, level)?;
        if previous >= level {
            return None;
        }

        debug!(skill = %change.skill, previous, level, "LevelTracker::on_stat_changed: level up");
        if !self.rules.is_milestone(change.skill, level) {
            return None;
        }
        Some(self.rules.request_for(change.skill, level))
    }

    pub fn previous_level(&self, skill: Skill) -> Option<u32> {
        self.levels.get(&skill).copied()
    }

    /// Forget every baseline, e.g. after returning to the login screen
    pub fn clear(&mut self) {
        debug!(tracked = self.levels.len(), "LevelTracker::clear: called");
        self.levels.clear();
    }

    pub fn rules(&self) -> &MilestoneRules {
        &self.rules
    }

    fn effective_level(&self, change: StatChange) -> u32 {
        if self.rules.show_virtual_levels {
            experience::level_for_xp(change.xp).max(change.level)
        } else {
            change.level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::{MAX_SKILL_XP, xp_for_level};

    fn tracker_with(config: Config) -> LevelTracker {
        LevelTracker::new(MilestoneRules::from_config(&config))
    }

    fn change(skill: Skill, level: u32) -> StatChange {
        StatChange::new(skill, level, xp_for_level(level))
    }

    #[test]
    fn test_parse_levels() {
        let levels = parse_levels(" 10,20 , 99,,0, 100, abc");
        assert_eq!(levels.into_iter().collect::<Vec<_>>(), vec![10, 20, 99]);
    }

    #[test]
    fn test_first_change_is_baseline_only() {
        let mut tracker = tracker_with(Config::default());
        assert!(tracker.on_stat_changed(change(Skill::Attack, 10), &[]).is_none());
        assert_eq!(tracker.previous_level(Skill::Attack), Some(10));
    }

    #[test]
    fn test_milestone_level_up_notifies() {
        let mut tracker = tracker_with(Config::default());
        tracker.on_stat_changed(change(Skill::Agility, 49), &[]);
        let request = tracker.on_stat_changed(change(Skill::Agility, 50), &[]).unwrap();
        assert_eq!(request.title(), "Level milestone");
        assert_eq!(request.body(), "Gained level 50 in Agility!");
        assert_eq!(request.host_color(), 0xFF981F);
    }

    #[test]
    fn test_non_milestone_and_repeat_are_ignored() {
        let mut tracker = tracker_with(Config::default());
        tracker.on_stat_changed(change(Skill::Mining, 40), &[]);
        assert!(tracker.on_stat_changed(change(Skill::Mining, 41), &[]).is_none());
        // Experience drop without a level change
        assert!(tracker.on_stat_changed(change(Skill::Mining, 41), &[]).is_none());
    }

    #[test]
    fn test_level_decrease_is_ignored() {
        let mut tracker = tracker_with(Config::default());
        tracker.on_stat_changed(change(Skill::Prayer, 52), &[]);
        assert!(tracker.on_stat_changed(change(Skill::Prayer, 50), &[]).is_none());
        assert_eq!(tracker.previous_level(Skill::Prayer), Some(50));
    }

    #[test]
    fn test_disabled_skill_is_ignored() {
        let mut config = Config::default();
        config.skills.slayer = false;
        let mut tracker = tracker_with(config);
        tracker.on_stat_changed(change(Skill::Slayer, 59), &[]);
        assert!(tracker.on_stat_changed(change(Skill::Slayer, 60), &[]).is_none());
    }

    #[test]
    fn test_virtual_level_ignores_list_and_toggles() {
        let mut config = Config::default();
        config.skills.cooking = false;
        let mut tracker = tracker_with(config);
        tracker.on_stat_changed(StatChange::new(Skill::Cooking, 99, xp_for_level(100) - 1), &[]);
        let request = tracker
            .on_stat_changed(StatChange::new(Skill::Cooking, 99, xp_for_level(101)), &[])
            .unwrap();
        assert_eq!(request.body(), "Gained level 101 in Cooking!");
    }

    #[test]
    fn test_virtual_levels_disabled() {
        let mut config = Config::default();
        config.levels.show_virtual_levels = false;
        let mut tracker = tracker_with(config);
        tracker.on_stat_changed(StatChange::new(Skill::Cooking, 99, xp_for_level(99)), &[]);
        assert!(
            tracker
                .on_stat_changed(StatChange::new(Skill::Cooking, 99, xp_for_level(105)), &[])
                .is_none()
        );
    }

    #[test]
    fn test_excluded_region_is_ignored_and_not_tracked() {
        let mut tracker = tracker_with(Config::default());
        tracker.on_stat_changed(change(Skill::Attack, 1), &[]);
        assert!(tracker.on_stat_changed(change(Skill::Attack, 99), &[12850, 13660]).is_none());
        assert_eq!(tracker.previous_level(Skill::Attack), Some(1));
    }

    #[test]
    fn test_null_color_and_custom_templates() {
        let mut config = Config::default();
        config.levels.color = None;
        config.levels.title = "$skill <$level>".to_string();
        let rules = MilestoneRules::from_config(&config);
        let request = rules.request_for(Skill::Hunter, 70);
        assert_eq!(request.title(), "Hunter <lt>70<gt>");
        assert_eq!(request.host_color(), -1);
    }

    #[test]
    fn test_invalid_change_is_ignored_and_not_tracked() {
        let mut tracker = tracker_with(Config::default());
        tracker.on_stat_changed(change(Skill::Fishing, 89), &[]);
        assert!(
            tracker
                .on_stat_changed(StatChange::new(Skill::Fishing, 90, MAX_SKILL_XP + 1), &[])
                .is_none()
        );
        assert!(tracker.on_stat_changed(StatChange::new(Skill::Fishing, 0, 0), &[]).is_none());
        assert!(
            tracker
                .on_stat_changed(StatChange::new(Skill::Fishing, 100, xp_for_level(100)), &[])
                .is_none()
        );
        assert_eq!(tracker.previous_level(Skill::Fishing), Some(89));

        assert!(tracker.on_stat_changed(change(Skill::Fishing, 90), &[]).is_some());
    }

    #[test]
    fn test_level_one_with_no_experience_is_valid() {
        assert!(change(Skill::Mining, 1).is_valid());
        assert!(StatChange::new(Skill::Mining, 99, MAX_SKILL_XP).is_valid());
    }

    #[test]
    fn test_clear_forgets_baselines() {
        let mut tracker = tracker_with(Config::default());
        tracker.on_stat_changed(change(Skill::Magic, 9), &[]);
        tracker.clear();
        assert!(tracker.on_stat_changed(change(Skill::Magic, 10), &[]).is_none());
    }
}
