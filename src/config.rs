use serde::{Deserialize, Serialize};

/// Tunable thresholds for the fix filter, step detector and reward rules.
///
/// Everything numeric the engine compares against lives here so a host can
/// load overrides from JSON instead of patching the algorithm bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reject fixes whose reported accuracy radius is worse than this (meters).
    pub max_accuracy_m: f64,
    /// Minimum time between the anchor fix and the next accepted fix (seconds).
    pub min_fix_interval_s: f64,
    /// Minimum distance between the anchor fix and the next accepted fix (meters).
    pub min_fix_distance_m: f64,
    /// Fix pairs implying a speed at or above this are GPS jumps (km/h).
    pub max_realistic_speed_kmh: f64,
    /// Minimum acceleration magnitude to count as a footfall (m/s²).
    pub step_magnitude_threshold: f64,
    /// Refractory floor between steps (prevents double-counting one footfall).
    pub min_step_interval_ms: i64,
    /// Cadence ceiling between steps (spikes further apart re-prime, not count).
    pub max_step_interval_ms: i64,
    /// Steps per common card.
    pub common_card_step_threshold: u32,
    /// Current speed must exceed this for a semi-rare card (km/h).
    pub semi_rare_speed_threshold_kmh: f64,
    /// Rate limit between semi-rare cards (milliseconds).
    pub semi_rare_cooldown_ms: i64,
    /// Accumulated distance per rare card (meters).
    pub rare_card_distance_m: f64,
    /// Maximum retained reward log entries.
    pub event_log_cap: usize,
    /// Sessions ending with no steps and at most this distance are discarded.
    pub min_match_distance_m: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_accuracy_m: 35.0,
            min_fix_interval_s: 1.0,
            min_fix_distance_m: 1.0,
            max_realistic_speed_kmh: 40.0,
            step_magnitude_threshold: 12.0,
            min_step_interval_ms: 250,  // max ~4 steps/sec (running)
            max_step_interval_ms: 2000, // min ~0.5 steps/sec (slow shuffle)
            common_card_step_threshold: 100,
            semi_rare_speed_threshold_kmh: 15.0,
            semi_rare_cooldown_ms: 10_000,
            rare_card_distance_m: 1000.0,
            event_log_cap: 20,
            min_match_distance_m: 5.0,
        }
    }
}
