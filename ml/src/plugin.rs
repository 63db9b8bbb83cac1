//! Milestone plugin
//!
//! Glues the level tracker, the developer command and the update notice to a
//! [`Lifecycle`]. The host forwards its events to the `on_*` handlers.

use eyre::Result;
use tracing::{debug, info, warn};

use notifysched::{DisplaySurface, Lifecycle, Notifier, ResetReport, SessionState, TickOutcome};

use crate::announce::UpdateNotice;
use crate::command::{CommandError, DevCommand};
use crate::config::Config;
use crate::tracker::{LevelTracker, MilestoneRules, StatChange};

pub struct MilestonePlugin<S: DisplaySurface> {
    config: Config,
    tracker: LevelTracker,
    notice: UpdateNotice,
    lifecycle: Lifecycle<S>,
    map_regions: Vec<u32>,
}

impl<S: DisplaySurface> MilestonePlugin<S> {
    pub fn new(surface: S, config: Config) -> Self {
        let tracker = LevelTracker::new(MilestoneRules::from_config(&config));
        let notice = UpdateNotice::new(config.state_path());
        let lifecycle = Lifecycle::new(surface, config.scheduler.clone());
        Self {
            config,
            tracker,
            notice,
            lifecycle,
            map_regions: Vec::new(),
        }
    }

    pub fn start_up(&mut self) -> bool {
        info!("Milestone plugin starting");
        self.lifecycle.start()
    }

    pub fn shut_down(&mut self) -> ResetReport {
        info!("Milestone plugin stopping");
        self.tracker.clear();
        self.lifecycle.stop()
    }

    pub fn on_tick(&mut self) -> Option<TickOutcome> {
        self.lifecycle.on_tick()
    }

    /// Regions currently loaded around the player
    pub fn set_map_regions(&mut self, regions: Vec<u32>) {
        self.map_regions = regions;
    }

    /// Returns true when the change produced a notification
    pub fn on_stat_changed(&mut self, change: StatChange) -> bool {
        match self.tracker.on_stat_changed(change, &self.map_regions) {
            Some(request) => {
                info!(skill = %change.skill, body = request.body(), "Milestone reached");
                self.lifecycle.enqueue(request);
                true
            }
            None => false,
        }
    }

    /// Session boundary; returns a chat message to print, if any
    pub fn on_session_state(&mut self, state: SessionState) -> Result<Option<String>> {
        if let Some(report) = self.lifecycle.on_session_state(state) {
            debug!(?report, %state, "MilestonePlugin::on_session_state: reset");
        }

        match state {
            SessionState::LoginScreen => {
                self.tracker.clear();
                Ok(None)
            }
            SessionState::LoggedIn => self.notice.check_on_login(),
            _ => Ok(None),
        }
    }

    /// Handle a chat command; commands other than the developer ones are
    /// reported as [`CommandError::Unknown`]
    pub fn on_command(&mut self, command: &str, args: &[String]) -> Result<(), CommandError> {
        let parsed = DevCommand::parse(command, args);
        if matches!(parsed, Err(CommandError::Unknown(_))) {
            return parsed.map(|_| ());
        }
        if !self.config.developer_mode {
            return Err(CommandError::DeveloperModeDisabled);
        }
        if self.tracker.rules().in_excluded_region(&self.map_regions) {
            return Err(CommandError::ExcludedRegion);
        }

        let request = parsed?.request(self.tracker.rules()).inspect_err(|e| {
            warn!(error = %e, "MilestonePlugin::on_command: rejected");
        })?;
        self.lifecycle.enqueue(request);
        Ok(())
    }

    /// Handle for producers outside the tick context
    pub fn notifier(&self) -> Notifier {
        self.lifecycle.notifier()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tracker(&self) -> &LevelTracker {
        &self.tracker
    }

    pub fn notice(&self) -> &UpdateNotice {
        &self.notice
    }

    pub fn lifecycle(&self) -> &Lifecycle<S> {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle<S> {
        &mut self.lifecycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::xp_for_level;
    use crate::skill::Skill;
    use notifysched::surface::mock::ScriptedSurface;
    use tempfile::TempDir;

    fn plugin(dir: &TempDir, developer_mode: bool) -> MilestonePlugin<ScriptedSurface> {
        let config = Config {
            developer_mode,
            state_path: Some(dir.path().join("state.yml")),
            ..Default::default()
        };
        MilestonePlugin::new(ScriptedSurface::new(), config)
    }

    fn change(skill: Skill, level: u32) -> StatChange {
        StatChange::new(skill, level, xp_for_level(level))
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_level_up_opens_immediately_when_started() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, false);
        plugin.start_up();
        plugin.on_session_state(SessionState::LoggedIn).unwrap();

        assert!(!plugin.on_stat_changed(change(Skill::Woodcutting, 59)));
        assert!(plugin.on_stat_changed(change(Skill::Woodcutting, 60)));
        let surface = plugin.lifecycle().scheduler().surface();
        assert_eq!(surface.opened_titles(), vec!["Level milestone".to_string()]);
    }

    #[test]
    fn test_announcement_once_per_message() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, false);
        plugin.start_up();
        assert!(plugin.on_session_state(SessionState::LoggedIn).unwrap().is_some());
        plugin.on_session_state(SessionState::LoginScreen).unwrap();
        assert!(plugin.on_session_state(SessionState::LoggedIn).unwrap().is_none());
    }

    #[test]
    fn test_login_screen_clears_tracker_and_scheduler() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, false);
        plugin.start_up();
        plugin.on_session_state(SessionState::LoggedIn).unwrap();
        plugin.on_stat_changed(change(Skill::Attack, 9));
        plugin.on_stat_changed(change(Skill::Attack, 10));
        assert!(plugin.lifecycle().scheduler().is_busy());

        plugin.on_session_state(SessionState::LoginScreen).unwrap();
        assert!(!plugin.lifecycle().scheduler().is_busy());
        assert_eq!(plugin.tracker().previous_level(Skill::Attack), None);
        assert_eq!(plugin.lifecycle().scheduler().surface().close_count(), 1);
    }

    #[test]
    fn test_command_requires_developer_mode() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, false);
        plugin.start_up();
        assert_eq!(
            plugin.on_command("level", &args(&["50"])),
            Err(CommandError::DeveloperModeDisabled)
        );
        assert_eq!(
            plugin.on_command("stats", &[]),
            Err(CommandError::Unknown("stats".to_string()))
        );
    }

    #[test]
    fn test_command_enqueues_milestone() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, true);
        plugin.start_up();
        plugin.on_session_state(SessionState::LoggedIn).unwrap();
        plugin.on_command("level", &args(&["99", "slayer"])).unwrap();
        let surface = plugin.lifecycle().scheduler().surface();
        assert_eq!(surface.open_count(), 1);
        assert_eq!(
            plugin.on_command("level", &args(&["55"])),
            Err(CommandError::NotMilestone(55))
        );
    }

    #[test]
    fn test_command_ignored_in_excluded_region() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, true);
        plugin.start_up();
        plugin.set_map_regions(vec![13914]);
        assert_eq!(
            plugin.on_command("level", &args(&["50"])),
            Err(CommandError::ExcludedRegion)
        );
    }

    #[test]
    fn test_shut_down_abandons_and_stops_ticks() {
        let dir = TempDir::new().unwrap();
        let mut plugin = plugin(&dir, true);
        plugin.start_up();
        plugin.on_session_state(SessionState::LoggedIn).unwrap();
        plugin.on_command("level", &args(&["10"])).unwrap();
        plugin.on_command("level", &args(&["20"])).unwrap();

        let report = plugin.shut_down();
        assert!(report.abandoned);
        assert_eq!(report.discarded, 1);
        assert_eq!(plugin.on_tick(), None);
    }
}
