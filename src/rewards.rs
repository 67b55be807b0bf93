use std::collections::VecDeque;
use std::fmt;

use crate::config::EngineConfig;
use crate::stats::{CardKind, SessionStats};

/// A card grant produced by one reward tick
#[derive(Debug, Clone, PartialEq)]
pub enum RewardEvent {
    CommonCard { total_steps: u32 },
    SemiRareCard { speed_kmh: f64 },
    RareCards { count: u32, bonus_distance_m: f64 },
}

impl fmt::Display for RewardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardEvent::CommonCard { total_steps } => {
                write!(f, "+1 common card ({} steps)", total_steps)
            }
            RewardEvent::SemiRareCard { speed_kmh } => {
                write!(f, "+1 semi-rare card ({:.1} km/h)", speed_kmh)
            }
            RewardEvent::RareCards {
                count,
                bonus_distance_m,
            } => {
                write!(
                    f,
                    "+{} rare card(s) (+{:.1} km)",
                    count,
                    bonus_distance_m / 1000.0
                )
            }
        }
    }
}

/// Milestone evaluator run once per accumulator update.
///
/// Carries the cooldown timestamp and the rare-card distance remainder;
/// both reset with the session. Card counts only ever go up.
#[derive(Debug, Default)]
pub struct RewardEngine {
    last_speed_reward_at_ms: i64,
    distance_since_rare_m: f64,
}

impl RewardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_speed_reward_at_ms = 0;
        self.distance_since_rare_m = 0.0;
    }

    /// Credit accepted distance toward the next rare card
    pub fn record_distance(&mut self, meters: f64) {
        self.distance_since_rare_m += meters;
    }

    /// Remainder carried toward the next rare card; always in
    /// `[0, rare_card_distance_m)` immediately after a tick
    pub fn distance_toward_rare(&self) -> f64 {
        self.distance_since_rare_m
    }

    /// Evaluate the three reward rules against the current stats.
    ///
    /// Any subset may fire in one tick. The caller applies the returned
    /// events to its log/UI; card counts are updated here.
    pub fn tick(
        &mut self,
        stats: &mut SessionStats,
        now_ms: i64,
        cfg: &EngineConfig,
    ) -> Vec<RewardEvent> {
        let mut events = Vec::new();

        // Common: jump straight to the expected count so a tick that skips
        // several thresholds still settles in one event
        let expected_common = stats.steps / cfg.common_card_step_threshold;
        if expected_common > stats.cards.common {
            stats.add_cards(CardKind::Common, expected_common - stats.cards.common);
            events.push(RewardEvent::CommonCard {
                total_steps: stats.steps,
            });
        }

        // Semi-rare: rate-limited, not edge-triggered; keeps firing while
        // the speed stays high and the cooldown keeps elapsing
        if stats.current_speed_kmh > cfg.semi_rare_speed_threshold_kmh
            && now_ms - self.last_speed_reward_at_ms > cfg.semi_rare_cooldown_ms
        {
            stats.add_cards(CardKind::SemiRare, 1);
            self.last_speed_reward_at_ms = now_ms;
            events.push(RewardEvent::SemiRareCard {
                speed_kmh: stats.current_speed_kmh,
            });
        }

        // Rare: whole thresholds convert to cards, remainder carries forward
        let expected_rare = (self.distance_since_rare_m / cfg.rare_card_distance_m) as u32;
        if expected_rare > 0 {
            let bonus_distance_m = expected_rare as f64 * cfg.rare_card_distance_m;
            stats.add_cards(CardKind::Rare, expected_rare);
            self.distance_since_rare_m -= bonus_distance_m;
            events.push(RewardEvent::RareCards {
                count: expected_rare,
                bonus_distance_m,
            });
        }

        for event in &events {
            log::info!("reward: {}", event);
        }
        events
    }
}

/// Capped, most-recent-first reward/event log
#[derive(Debug)]
pub struct EventLog {
    entries: VecDeque<String>,
    cap: usize,
}

impl EventLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Prepend an entry, dropping the oldest once the cap is exceeded
    pub fn push(&mut self, message: String) {
        self.entries.push_front(message);
        self.entries.truncate(self.cap);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
