use crate::config::EngineConfig;
use crate::sensors::MotionSample;

/// Threshold-and-refractory-period step debouncer.
///
/// A spike above the magnitude threshold counts as a step only when it lands
/// strictly between the min and max intervals since the previous step. The
/// detector starts unarmed: the first qualifying spike primes the timing
/// reference without counting, and a spike arriving after a longer-than-max
/// gap re-primes the same way, so a lone jolt after stillness never counts
/// and two spikes in walking cadence are needed to (re)start the count.
#[derive(Debug, Default)]
pub struct StepDetector {
    last_step_at_ms: i64,
    armed: bool,
}

impl StepDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all timing state; the next spike primes rather than counts
    pub fn reset(&mut self) {
        self.last_step_at_ms = 0;
        self.armed = false;
    }

    /// Returns true when this sample counts as a step
    pub fn process(&mut self, sample: &MotionSample, cfg: &EngineConfig) -> bool {
        // Incomplete samples are ignored outright
        let magnitude = match sample.magnitude() {
            Some(m) => m,
            None => return false,
        };

        if magnitude <= cfg.step_magnitude_threshold {
            return false;
        }

        let now_ms = sample.timestamp_ms;
        if !self.armed {
            self.armed = true;
            self.last_step_at_ms = now_ms;
            return false;
        }

        let interval_ms = now_ms - self.last_step_at_ms;
        if interval_ms <= cfg.min_step_interval_ms {
            // Refractory: double-trigger on a single footfall
            return false;
        }
        if interval_ms >= cfg.max_step_interval_ms {
            // Stale: out of walking cadence, re-prime without counting
            self.last_step_at_ms = now_ms;
            return false;
        }

        self.last_step_at_ms = now_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(timestamp_ms: i64) -> MotionSample {
        MotionSample::new(8.0, 8.0, 8.5, timestamp_ms)
    }

    fn idle(timestamp_ms: i64) -> MotionSample {
        MotionSample::new(0.3, 0.2, 0.8, timestamp_ms)
    }

    #[test]
    fn test_below_threshold_ignored() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        assert!(!detector.process(&idle(0), &cfg));
        assert!(!detector.process(&idle(500), &cfg));
    }

    #[test]
    fn test_missing_axis_ignored() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        let sample = MotionSample {
            x: Some(20.0),
            y: Some(20.0),
            z: None,
            timestamp_ms: 0,
        };
        assert!(!detector.process(&sample, &cfg));
        // No state change: a later spike still only primes
        assert!(!detector.process(&spike(500), &cfg));
    }

    #[test]
    fn test_first_spike_primes_second_counts() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        assert!(!detector.process(&spike(1_000), &cfg));
        assert!(detector.process(&spike(1_500), &cfg));
    }

    #[test]
    fn test_refractory_rejects_double_trigger() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        detector.process(&spike(1_000), &cfg);
        assert!(detector.process(&spike(1_500), &cfg));
        // 100 ms later: same footfall ringing
        assert!(!detector.process(&spike(1_600), &cfg));
        // Cadence resumes relative to the counted step
        assert!(detector.process(&spike(2_000), &cfg));
    }

    #[test]
    fn test_lone_jolt_after_stillness_does_not_count() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        detector.process(&spike(1_000), &cfg);
        assert!(detector.process(&spike(1_500), &cfg));
        // 10 s of stillness, then a jolt: re-primes only
        assert!(!detector.process(&spike(11_500), &cfg));
        // But walking resumes on the next in-cadence spike
        assert!(detector.process(&spike(12_000), &cfg));
    }

    #[test]
    fn test_walking_cadence_counts_every_spike() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        detector.process(&spike(0), &cfg);
        let mut steps = 0;
        for i in 1..=10 {
            if detector.process(&spike(i * 500), &cfg) {
                steps += 1;
            }
        }
        assert_eq!(steps, 10);
    }

    #[test]
    fn test_reset_disarms() {
        let cfg = EngineConfig::default();
        let mut detector = StepDetector::new();

        detector.process(&spike(1_000), &cfg);
        assert!(detector.process(&spike(1_500), &cfg));

        detector.reset();
        // Primes again instead of counting
        assert!(!detector.process(&spike(2_000), &cfg));
        assert!(detector.process(&spike(2_500), &cfg));
    }
}
