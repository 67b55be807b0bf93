pub mod config;
pub mod error;
pub mod history;
pub mod location_filter;
pub mod rewards;
pub mod sensors;
pub mod session;
pub mod stats;
pub mod step_detector;

pub use config::EngineConfig;
pub use error::{TrackerError, TrackerResult};
pub use history::MatchHistory;
pub use location_filter::{haversine_distance, FixFilter, FixOutcome};
pub use rewards::{EventLog, RewardEngine, RewardEvent};
pub use sensors::{LocationFix, MotionSample};
pub use session::{Match, SessionController, SessionState};
pub use stats::{CardCounts, CardKind, SessionStats};
pub use step_detector::StepDetector;
