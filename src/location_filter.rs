use crate::config::EngineConfig;
use crate::sensors::LocationFix;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// Outcome of feeding one fix through the filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixOutcome {
    /// Fix failed a quality or plausibility check; no contribution
    Rejected,
    /// First usable fix of the session, stored as the anchor
    Anchored,
    /// Fix pair produced a validated distance/speed increment
    Accepted { distance_m: f64, speed_kmh: f64 },
}

/// Rejects low-quality or physically implausible fixes and converts the
/// survivors into distance/speed increments against a single retained anchor.
#[derive(Debug, Default)]
pub struct FixFilter {
    anchor: Option<LocationFix>,
}

impl FixFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the anchor; the next fix bootstraps again
    pub fn reset(&mut self) {
        self.anchor = None;
    }

    pub fn anchor(&self) -> Option<&LocationFix> {
        self.anchor.as_ref()
    }

    /// Apply the rejection rules in order and update the anchor.
    ///
    /// The anchor survives accuracy and debounce rejections (the older point
    /// is kept until a sufficiently separated fix arrives) but is replaced on
    /// a speed-ceiling rejection, matching the accepted path.
    pub fn process(&mut self, fix: LocationFix, cfg: &EngineConfig) -> FixOutcome {
        if fix.accuracy_m > cfg.max_accuracy_m {
            log::debug!("fix rejected: accuracy {:.1} m", fix.accuracy_m);
            return FixOutcome::Rejected;
        }

        let (distance_m, dt_s) = match &self.anchor {
            Some(anchor) => (
                haversine_distance(anchor.latitude, anchor.longitude, fix.latitude, fix.longitude),
                (fix.timestamp_ms - anchor.timestamp_ms) as f64 / 1000.0,
            ),
            None => {
                self.anchor = Some(fix);
                return FixOutcome::Anchored;
            }
        };

        // Stationary jitter, and defensively any out-of-order fix (dt <= 0)
        if dt_s < cfg.min_fix_interval_s || distance_m < cfg.min_fix_distance_m {
            return FixOutcome::Rejected;
        }

        let speed_kmh = distance_m / dt_s * 3.6;
        self.anchor = Some(fix);

        if speed_kmh >= cfg.max_realistic_speed_kmh {
            log::debug!("fix rejected: implausible speed {:.1} km/h", speed_kmh);
            return FixOutcome::Rejected;
        }

        FixOutcome::Accepted {
            distance_m,
            speed_kmh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // One degree of latitude is ~111.2 km; 1e-4 degrees ≈ 11.1 m
    const LAT_STEP: f64 = 1.0e-4;

    fn fix(lat: f64, accuracy_m: f64, timestamp_ms: i64) -> LocationFix {
        LocationFix::new(lat, -46.6333, accuracy_m, timestamp_ms)
    }

    #[test]
    fn test_haversine_known_distance() {
        // São Paulo to Rio de Janeiro, ~360 km
        let d = haversine_distance(-23.5505, -46.6333, -22.9068, -43.1729);
        assert!(d > 350_000.0 && d < 370_000.0);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let d = haversine_distance(10.0, 20.0, 10.0, 20.0);
        assert_relative_eq!(d, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_low_accuracy_rejected_without_anchor_update() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        assert_eq!(filter.process(fix(0.0, 5.0, 0), &cfg), FixOutcome::Anchored);
        assert_eq!(
            filter.process(fix(LAT_STEP, 35.1, 2_000), &cfg),
            FixOutcome::Rejected
        );
        // Anchor still the bootstrap fix
        assert_eq!(filter.anchor().unwrap().timestamp_ms, 0);
    }

    #[test]
    fn test_bootstrap_then_accept() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        assert_eq!(filter.process(fix(0.0, 5.0, 0), &cfg), FixOutcome::Anchored);
        match filter.process(fix(LAT_STEP, 5.0, 10_000), &cfg) {
            FixOutcome::Accepted {
                distance_m,
                speed_kmh,
            } => {
                assert_relative_eq!(distance_m, 11.12, epsilon = 0.05);
                // ~11.1 m over 10 s = ~4 km/h
                assert_relative_eq!(speed_kmh, 4.0, epsilon = 0.1);
            }
            other => panic!("expected accept, got {:?}", other),
        }
        assert_eq!(filter.anchor().unwrap().timestamp_ms, 10_000);
    }

    #[test]
    fn test_short_interval_debounced_and_anchor_kept() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        filter.process(fix(0.0, 5.0, 0), &cfg);
        // 0.9 s later, regardless of distance
        assert_eq!(
            filter.process(fix(10.0 * LAT_STEP, 5.0, 900), &cfg),
            FixOutcome::Rejected
        );
        assert_eq!(filter.anchor().unwrap().timestamp_ms, 0);
    }

    #[test]
    fn test_short_distance_debounced_and_anchor_kept() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        filter.process(fix(0.0, 5.0, 0), &cfg);
        // 0.5 m in 5 s: stationary jitter
        assert_eq!(
            filter.process(fix(LAT_STEP / 20.0, 5.0, 5_000), &cfg),
            FixOutcome::Rejected
        );
        assert_eq!(filter.anchor().unwrap().timestamp_ms, 0);
    }

    #[test]
    fn test_out_of_order_fix_rejected() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        filter.process(fix(0.0, 5.0, 10_000), &cfg);
        assert_eq!(
            filter.process(fix(LAT_STEP, 5.0, 5_000), &cfg),
            FixOutcome::Rejected
        );
        assert_eq!(filter.anchor().unwrap().timestamp_ms, 10_000);
    }

    #[test]
    fn test_gps_jump_rejected_but_anchor_replaced() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        filter.process(fix(0.0, 5.0, 0), &cfg);
        // ~1.1 km in 2 s ≈ 2000 km/h
        assert_eq!(
            filter.process(fix(100.0 * LAT_STEP, 5.0, 2_000), &cfg),
            FixOutcome::Rejected
        );
        // Unlike the debounce rules, the jump replaces the anchor
        assert_eq!(filter.anchor().unwrap().timestamp_ms, 2_000);
    }

    #[test]
    fn test_accepted_distance_accumulates_per_pair() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();
        let mut total = 0.0;

        filter.process(fix(0.0, 5.0, 0), &cfg);
        for i in 1..=5 {
            if let FixOutcome::Accepted { distance_m, .. } =
                filter.process(fix(i as f64 * LAT_STEP, 5.0, i * 10_000), &cfg)
            {
                total += distance_m;
            }
        }
        assert_relative_eq!(total, 5.0 * 11.12, epsilon = 0.3);
    }

    #[test]
    fn test_reset_drops_anchor() {
        let cfg = EngineConfig::default();
        let mut filter = FixFilter::new();

        filter.process(fix(0.0, 5.0, 0), &cfg);
        filter.reset();
        assert!(filter.anchor().is_none());
        assert_eq!(
            filter.process(fix(LAT_STEP, 5.0, 10_000), &cfg),
            FixOutcome::Anchored
        );
    }
}
