use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;
use tokio::time::{interval, Duration};

/// Single reported location fix with an accuracy radius
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: f64,
    pub timestamp_ms: i64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64, accuracy_m: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m,
            timestamp_ms,
        }
    }
}

/// Accelerometer sample; any axis may be unavailable on a given reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub timestamp_ms: i64,
}

impl MotionSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp_ms: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            timestamp_ms,
        }
    }

    /// Acceleration magnitude, or None when any axis is missing
    pub fn magnitude(&self) -> Option<f64> {
        let (x, y, z) = (self.x?, self.y?, self.z?);
        Some((x * x + y * y + z * z).sqrt())
    }
}

/// Current wall clock in epoch milliseconds
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Simulated location source: a steady walk heading north at ~1.5 m/s,
/// 1 Hz fixes with wobbling accuracy and the occasional garbage fix.
pub async fn location_loop(tx: Sender<LocationFix>) {
    let mut interval = interval(Duration::from_secs(1));
    let mut fix_count = 0u64;

    loop {
        interval.tick().await;

        let fix = simulated_fix(fix_count);
        match tx.try_send(fix) {
            Ok(_) => {
                fix_count += 1;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                log::info!("[location] channel closed after {} fixes", fix_count);
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Channel full, drop this fix
            }
        }
    }
}

/// Simulated motion source: ~50 Hz samples with a footfall spike every 500 ms.
pub async fn motion_loop(tx: Sender<MotionSample>) {
    let mut interval = interval(Duration::from_millis(20));
    let mut sample_count = 0u64;

    loop {
        interval.tick().await;

        let sample = simulated_motion(sample_count);
        match tx.try_send(sample) {
            Ok(_) => {
                sample_count += 1;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {
                log::info!("[motion] channel closed after {} samples", sample_count);
                break;
            }
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                // Channel full, drop this sample
            }
        }
    }
}

fn simulated_fix(seq: u64) -> LocationFix {
    // ~1.35e-5 degrees latitude per tick ≈ 1.5 m northward each second
    let latitude = -23.5505 + seq as f64 * 1.35e-5;
    let longitude = -46.6333;

    // Every 30th fix reports a poor accuracy radius so the filter has
    // real rejections to do
    let accuracy_m = if seq % 30 == 29 {
        60.0
    } else {
        6.0 + (seq as f64 * 0.7).sin() * 3.0
    };

    LocationFix::new(latitude, longitude, accuracy_m, current_timestamp_ms())
}

fn simulated_motion(seq: u64) -> MotionSample {
    // Spike every 25th sample (2 Hz footfall cadence at 50 Hz sampling)
    let (x, y, z) = if seq % 25 == 0 {
        (8.0, 8.0, 8.5)
    } else {
        let t = seq as f64 * 0.02;
        ((t * 4.0).sin() * 0.6, (t * 3.0).cos() * 0.4, 0.8)
    };

    MotionSample::new(x, y, z, current_timestamp_ms())
}
