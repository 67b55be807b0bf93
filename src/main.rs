use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use match_tracker_rs::{
    sensors, EngineConfig, LocationFix, MatchHistory, MotionSample, SessionController,
};

#[derive(Parser, Debug)]
#[command(name = "match_tracker")]
#[command(about = "Activity session tracker - simulated sensors feeding the reward engine", long_about = None)]
struct Args {
    /// Duration in seconds (0 = continuous)
    #[arg(value_name = "SECONDS", default_value = "30")]
    duration: u64,

    /// Match history file
    #[arg(long, default_value = "match_history.json")]
    history: PathBuf,

    /// Disable the location source (steps-only session)
    #[arg(long)]
    no_location: bool,

    /// Disable the motion source (distance-only session)
    #[arg(long)]
    no_motion: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("[{}] Match Tracker Starting", ts_now());
    println!("  Duration: {} seconds (0=continuous)", args.duration);
    println!("  History: {}", args.history.display());
    println!("  Location: {}", if args.no_location { "off" } else { "on" });
    println!("  Motion: {}", if args.no_motion { "off" } else { "on" });

    let mut controller = SessionController::new(EngineConfig::default());
    controller.start()?;

    // Bounded channels; sensor tasks drop samples when the consumer lags
    let (location_tx, mut location_rx) = mpsc::channel::<LocationFix>(100);
    let (motion_tx, mut motion_rx) = mpsc::channel::<MotionSample>(500);

    let mut handles = Vec::new();
    if !args.no_location {
        handles.push(tokio::spawn(sensors::location_loop(location_tx)));
    }
    if !args.no_motion {
        handles.push(tokio::spawn(sensors::motion_loop(motion_tx)));
    }

    let start = Utc::now();
    let mut last_status_update = Utc::now();

    println!("[{}] Session active...", ts_now());

    loop {
        if args.duration > 0 {
            let elapsed = Utc::now().signed_duration_since(start);
            if elapsed.num_seconds() as u64 >= args.duration {
                println!("[{}] Duration reached, stopping...", ts_now());
                break;
            }
        }

        // Drain whatever the sensors delivered, in arrival order
        while let Ok(fix) = location_rx.try_recv() {
            controller.on_location(fix);
        }
        while let Ok(sample) = motion_rx.try_recv() {
            controller.on_motion(sample);
        }

        let now = Utc::now();
        if now.signed_duration_since(last_status_update).num_seconds() >= 2 {
            let stats = controller.stats();
            println!(
                "[{}] steps {} | {:.0} m | {:.1} km/h (top {:.1}) | cards C:{} SR:{} R:{}",
                ts_now(),
                stats.steps,
                stats.distance_meters,
                stats.current_speed_kmh,
                stats.top_speed_kmh,
                stats.cards.common,
                stats.cards.semi_rare,
                stats.cards.rare,
            );
            last_status_update = now;
        }

        sleep(Duration::from_millis(10)).await;
    }

    // Stop delivery before finalizing so no late sample lands after stop()
    for handle in &handles {
        handle.abort();
    }
    drop(location_rx);
    drop(motion_rx);

    let record = controller.stop()?;

    println!("\n=== Final Stats ===");
    let stats = controller.stats();
    println!("Steps: {}", stats.steps);
    println!("Distance: {:.1} m", stats.distance_meters);
    println!("Top speed: {:.1} km/h", stats.top_speed_kmh);
    println!(
        "Cards: {} common, {} semi-rare, {} rare",
        stats.cards.common, stats.cards.semi_rare, stats.cards.rare
    );
    for line in controller.events() {
        println!("  > {}", line);
    }

    match record {
        Some(record) => {
            let mut history = MatchHistory::load(&args.history)?;
            history.push(record);
            history.save(&args.history)?;
            println!(
                "[{}] Saved match to {} ({} total)",
                ts_now(),
                args.history.display(),
                history.len()
            );
        }
        None => {
            println!("[{}] Trivial session, nothing recorded", ts_now());
        }
    }

    Ok(())
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
