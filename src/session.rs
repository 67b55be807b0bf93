use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{TrackerError, TrackerResult};
use crate::location_filter::{FixFilter, FixOutcome};
use crate::rewards::{EventLog, RewardEngine};
use crate::sensors::{LocationFix, MotionSample};
use crate::stats::{CardCounts, SessionStats};
use crate::step_detector::StepDetector;

/// Session state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No sensor processing; the engine is fully dormant
    Idle,
    /// Accepting sensor events and evaluating rewards
    Active,
}

/// Finalized record of one non-trivial session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub started_at: String,
    pub ended_at: String,
    pub distance_meters: f64,
    pub top_speed_kmh: f64,
    pub steps: u32,
    pub cards: CardCounts,
}

/// Owns the session lifecycle and every stateful piece of the engine.
///
/// The controller is the sole writer of the active flag; while `Idle` the
/// sensor entry points are no-ops. All processing happens on the caller's
/// thread in arrival order, so no locking is needed here.
pub struct SessionController {
    cfg: EngineConfig,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    stats: SessionStats,
    filter: FixFilter,
    steps: StepDetector,
    rewards: RewardEngine,
    events: EventLog,
}

impl SessionController {
    pub fn new(cfg: EngineConfig) -> Self {
        let events = EventLog::new(cfg.event_log_cap);
        Self {
            cfg,
            state: SessionState::Idle,
            started_at: None,
            stats: SessionStats::new(),
            filter: FixFilter::new(),
            steps: StepDetector::new(),
            rewards: RewardEngine::new(),
            events,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Stats snapshot for the current (or just-finished) session
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reward log entries, newest first
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.iter()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Begin a session (Idle → Active), resetting every piece of engine
    /// state from any previous session
    pub fn start(&mut self) -> TrackerResult<()> {
        if self.state == SessionState::Active {
            return Err(TrackerError::AlreadyRunning);
        }

        self.stats.reset();
        self.filter.reset();
        self.steps.reset();
        self.rewards.reset();
        self.events.clear();
        self.started_at = Some(Utc::now());
        self.state = SessionState::Active;
        log::info!("session started");
        Ok(())
    }

    /// End the session (Active → Idle).
    ///
    /// Returns a finalized `Match` unless the session was trivial (no steps
    /// and at most `min_match_distance_m` covered), which is discarded.
    pub fn stop(&mut self) -> TrackerResult<Option<Match>> {
        if self.state == SessionState::Idle {
            return Err(TrackerError::NotRunning);
        }
        self.state = SessionState::Idle;

        if self.stats.steps == 0 && self.stats.distance_meters <= self.cfg.min_match_distance_m {
            log::info!("session discarded: trivial");
            return Ok(None);
        }

        let started_at = self.started_at.unwrap_or_else(Utc::now);
        let record = Match {
            id: format!("match_{}", started_at.timestamp_millis()),
            started_at: started_at.to_rfc3339(),
            ended_at: Utc::now().to_rfc3339(),
            distance_meters: self.stats.distance_meters,
            top_speed_kmh: self.stats.top_speed_kmh,
            steps: self.stats.steps,
            cards: self.stats.cards,
        };
        log::info!(
            "session finished: {} steps, {:.0} m, {} cards",
            record.steps,
            record.distance_meters,
            record.cards.total()
        );
        Ok(Some(record))
    }

    /// Feed one location fix; no-op while idle
    pub fn on_location(&mut self, fix: LocationFix) {
        if self.state != SessionState::Active {
            return;
        }

        let timestamp_ms = fix.timestamp_ms;
        if let FixOutcome::Accepted {
            distance_m,
            speed_kmh,
        } = self.filter.process(fix, &self.cfg)
        {
            self.stats.add_distance(distance_m);
            self.stats.set_current_speed(speed_kmh);
            self.rewards.record_distance(distance_m);
            self.tick_rewards(timestamp_ms);
        }
    }

    /// Feed one motion sample; no-op while idle
    pub fn on_motion(&mut self, sample: MotionSample) {
        if self.state != SessionState::Active {
            return;
        }

        let timestamp_ms = sample.timestamp_ms;
        if self.steps.process(&sample, &self.cfg) {
            self.stats.add_step();
            self.tick_rewards(timestamp_ms);
        }
    }

    fn tick_rewards(&mut self, now_ms: i64) {
        for event in self.rewards.tick(&mut self.stats, now_ms, &self.cfg) {
            self.events.push(event.to_string());
        }
    }
}
