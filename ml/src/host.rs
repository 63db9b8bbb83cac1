//! Simulated host
//!
//! [`SimulatedSurface`] stands in for the game's notification widget, and
//! [`run_simulation`] drives a [`MilestonePlugin`] from a tokio interval while
//! other tasks produce level-ups and bulk notifications concurrently.

use std::time::Duration;

use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use notifysched::{DisplaySurface, NotificationRequest, SchedulerStats, SessionState, SurfaceError, TickOutcome};

use crate::config::Config;
use crate::experience::xp_for_level;
use crate::plugin::MilestonePlugin;
use crate::skill::Skill;
use crate::tracker::StatChange;

/// Handle to a presentation on the simulated surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimHandle(u64);

/// Something that happened on the simulated surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Opened { title: String, body: String, color: i32 },
    Closed { title: String, remaining: u32 },
}

#[derive(Debug)]
struct Presentation {
    handle: SimHandle,
    title: String,
    remaining: u32,
}

/// A widget whose width collapses after a fixed number of host ticks
#[derive(Debug)]
pub struct SimulatedSurface {
    display_ticks: u32,
    next_handle: u64,
    open: Option<Presentation>,
    events: Vec<SurfaceEvent>,
}

impl SimulatedSurface {
    pub fn new(display_ticks: u32) -> Self {
        Self {
            display_ticks,
            next_handle: 0,
            open: None,
            events: Vec::new(),
        }
    }

    /// One host tick of animation
    pub fn advance(&mut self) {
        if let Some(p) = self.open.as_mut() {
            p.remaining = p.remaining.saturating_sub(1);
        }
    }

    /// Current width in ticks left; zero once collapsed or when nothing is open
    pub fn width(&self) -> u32 {
        self.open.as_ref().map(|p| p.remaining).unwrap_or(0)
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn shown_titles(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Opened { title, .. } => Some(title.clone()),
                SurfaceEvent::Closed { .. } => None,
            })
            .collect()
    }

    fn check(&self, handle: &SimHandle) -> Result<&Presentation, SurfaceError> {
        self.open
            .as_ref()
            .filter(|p| p.handle == *handle)
            .ok_or(SurfaceError::HandleGone)
    }
}

impl DisplaySurface for SimulatedSurface {
    type Handle = SimHandle;

    fn open(&mut self, request: &NotificationRequest) -> Result<SimHandle, SurfaceError> {
        if self.open.is_some() {
            return Err(SurfaceError::AlreadyOpen);
        }
        let handle = SimHandle(self.next_handle);
        self.next_handle += 1;
        info!(title = request.title(), body = request.body(), "Notification shown");
        self.open = Some(Presentation {
            handle,
            title: request.title().to_string(),
            remaining: self.display_ticks,
        });
        self.events.push(SurfaceEvent::Opened {
            title: request.title().to_string(),
            body: request.body().to_string(),
            color: request.host_color(),
        });
        Ok(handle)
    }

    fn is_still_showing(&self, handle: &SimHandle) -> Result<bool, SurfaceError> {
        Ok(self.check(handle)?.remaining > 0)
    }

    fn close(&mut self, handle: SimHandle) -> Result<(), SurfaceError> {
        self.check(&handle)?;
        if let Some(p) = self.open.take() {
            debug!(title = %p.title, remaining = p.remaining, "SimulatedSurface::close: called");
            self.events.push(SurfaceEvent::Closed {
                title: p.title,
                remaining: p.remaining,
            });
        }
        Ok(())
    }
}

/// Parameters for [`run_simulation`]
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub ticks: u32,
    pub tick: Duration,
    pub display_ticks: u32,
    /// Notifications pushed at once by a background task
    pub burst: usize,
    /// Tick at which the player logs out and straight back in
    pub logout_at: Option<u32>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            ticks: 60,
            tick: Duration::from_millis(600),
            display_ticks: 5,
            burst: 0,
            logout_at: None,
        }
    }
}

/// What a simulated session did
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub ticks: u32,
    pub shown: Vec<String>,
    pub chat: Vec<String>,
    pub stats: SchedulerStats,
    pub pending: usize,
    pub recoveries: u32,
}

/// Level-ups played by the simulated player: a baseline followed by steady
/// progress in a few skills
pub fn scripted_level_ups() -> Vec<StatChange> {
    let mut changes = Vec::new();
    for (skill, from, to) in [(Skill::Agility, 48, 52), (Skill::Slayer, 97, 99), (Skill::Fishing, 19, 21)] {
        for level in from..=to {
            changes.push(StatChange::new(skill, level, xp_for_level(level)));
        }
    }
    // Past 99 the reported level stays capped while experience keeps growing
    for virtual_level in [99, 100] {
        changes.push(StatChange::new(Skill::Cooking, 99, xp_for_level(virtual_level)));
    }
    changes
}

/// Run a session of `options.ticks` host ticks
pub async fn run_simulation(config: Config, options: SimulationOptions) -> Result<SimulationReport> {
    info!(
        ticks = options.ticks,
        tick_ms = options.tick.as_millis() as u64,
        burst = options.burst,
        "Simulation started"
    );

    let mut plugin = MilestonePlugin::new(SimulatedSurface::new(options.display_ticks), config);
    let mut chat = Vec::new();
    plugin.start_up();
    if let Some(message) = plugin.on_session_state(SessionState::LoggedIn)? {
        chat.push(message);
    }

    let (stat_tx, mut stat_rx) = mpsc::unbounded_channel();
    let stat_period = options.tick / 2;
    let stats_task = tokio::spawn(async move {
        for change in scripted_level_ups() {
            if stat_tx.send(change).is_err() {
                break;
            }
            tokio::time::sleep(stat_period).await;
        }
    });

    let notifier = plugin.notifier();
    let burst = options.burst;
    let burst_task = tokio::spawn(async move {
        for i in 0..burst {
            notifier.enqueue(format!("Bulk notification {}", i + 1), format!("Item {} of {}", i + 1, burst), None);
        }
    });

    let mut interval = tokio::time::interval(options.tick);
    let mut recoveries = 0;
    for tick in 0..options.ticks {
        interval.tick().await;

        while let Ok(change) = stat_rx.try_recv() {
            plugin.on_stat_changed(change);
        }

        if options.logout_at == Some(tick) {
            info!(tick, "Simulated logout");
            plugin.on_session_state(SessionState::LoginScreen)?;
            if let Some(message) = plugin.on_session_state(SessionState::LoggedIn)? {
                chat.push(message);
            }
        }

        plugin.lifecycle_mut().scheduler_mut().surface_mut().advance();
        if plugin.on_tick() == Some(TickOutcome::Recovered) {
            recoveries += 1;
        }
    }

    stats_task.await.context("Stat producer task failed")?;
    burst_task.await.context("Burst producer task failed")?;

    let pending = plugin.lifecycle().scheduler().pending();
    let stats = plugin.lifecycle().scheduler().stats().clone();
    let shown = plugin.lifecycle().scheduler().surface().shown_titles();
    plugin.shut_down();

    info!(shown = shown.len(), pending, "Simulation finished");
    Ok(SimulationReport {
        ticks: options.ticks,
        shown,
        chat,
        stats,
        pending,
        recoveries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_surface_width_collapses() {
        let mut surface = SimulatedSurface::new(2);
        let handle = surface.open(&NotificationRequest::new("t", "b")).unwrap();
        assert!(surface.is_still_showing(&handle).unwrap());
        surface.advance();
        assert!(surface.is_still_showing(&handle).unwrap());
        surface.advance();
        assert!(!surface.is_still_showing(&handle).unwrap());
        assert_eq!(surface.width(), 0);
        surface.close(handle).unwrap();
        assert!(matches!(
            surface.is_still_showing(&handle),
            Err(SurfaceError::HandleGone)
        ));
    }

    #[test]
    fn test_surface_refuses_second_open() {
        let mut surface = SimulatedSurface::new(3);
        surface.open(&NotificationRequest::new("a", "")).unwrap();
        assert!(matches!(
            surface.open(&NotificationRequest::new("b", "")),
            Err(SurfaceError::AlreadyOpen)
        ));
    }

    #[test]
    fn test_scripted_level_ups_start_with_baselines() {
        let changes = scripted_level_ups();
        assert_eq!(changes[0], StatChange::new(Skill::Agility, 48, xp_for_level(48)));
        assert_eq!(changes.len(), 5 + 3 + 3 + 2);
    }

    fn config(dir: &TempDir) -> Config {
        Config {
            state_path: Some(dir.path().join("state.yml")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_simulation_shows_milestones_and_burst() {
        let dir = TempDir::new().unwrap();
        let options = SimulationOptions {
            ticks: 120,
            tick: Duration::from_millis(1),
            display_ticks: 2,
            burst: 4,
            logout_at: None,
        };
        let report = run_simulation(config(&dir), options).await.unwrap();

        assert_eq!(report.chat.len(), 1);
        assert_eq!(report.recoveries, 0);
        assert_eq!(report.pending, 0);
        // Agility 50, Slayer 99, Fishing 20 and virtual Cooking 100
        let milestones = report.shown.iter().filter(|t| *t == "Level milestone").count();
        assert_eq!(milestones, 4);
        let bulk = report.shown.iter().filter(|t| t.starts_with("Bulk")).count();
        assert_eq!(bulk, 4);
        assert_eq!(report.stats.total_opened, 8);
        assert_eq!(report.stats.total_closed, 8);
    }

    #[tokio::test]
    async fn test_logout_abandons_in_flight() {
        let dir = TempDir::new().unwrap();
        let options = SimulationOptions {
            ticks: 10,
            tick: Duration::from_millis(1),
            display_ticks: 100,
            burst: 3,
            logout_at: Some(5),
        };
        let report = run_simulation(config(&dir), options).await.unwrap();
        assert!(report.stats.total_resets >= 1);
        assert!(report.stats.total_abandoned >= 1);
    }
}
