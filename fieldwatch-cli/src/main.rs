//! Fieldwatch CLI - live tracking service runner
//!
//! Loads a roster of supervisors and subordinates, then reads position
//! reports from stdin (one `entity_id latitude longitude` triple per
//! line), raising geofence and staleness alerts to the log. Every
//! accepted update is also echoed to observers subscribed to the
//! broadcast feed.

mod roster;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fieldwatch::logging::{default_log_dir, default_log_file, init_logging};
use fieldwatch::notify::LogNotifier;
use fieldwatch::service::{TrackerConfig, TrackerService};

#[derive(Parser)]
#[command(name = "fieldwatch")]
#[command(version = fieldwatch::VERSION)]
#[command(about = "Track field personnel and alert on geofence breaches", long_about = None)]
struct Args {
    /// Roster file declaring supervisors and subordinates
    #[arg(long)]
    roster: PathBuf,

    /// Staleness sweep interval and threshold, in seconds
    #[arg(long, default_value = "60")]
    sweep_interval_secs: u64,

    /// Cool-down between breach alerts for the same pair, in seconds
    #[arg(long, default_value = "60")]
    breach_cooldown_secs: u64,

    /// Cool-down between staleness alerts for the same entity, in seconds
    #[arg(long, default_value = "60")]
    stale_cooldown_secs: u64,

    /// Directory for log files
    #[arg(long, default_value = default_log_dir())]
    log_dir: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = match init_logging(&args.log_dir, default_log_file()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let directory = match roster::load_roster(&args.roster) {
        Ok(directory) => Arc::new(directory),
        Err(e) => {
            eprintln!("Failed to load roster {}: {}", args.roster.display(), e);
            process::exit(1);
        }
    };
    info!(
        roster = %args.roster.display(),
        supervisors = directory.supervisor_count(),
        "Roster loaded"
    );

    let config = TrackerConfig::default()
        .with_sweep_interval(Duration::from_secs(args.sweep_interval_secs))
        .with_breach_cooldown(Duration::from_secs(args.breach_cooldown_secs))
        .with_stale_alert_cooldown(Duration::from_secs(args.stale_cooldown_secs));

    let service = TrackerService::build(directory, Arc::new(LogNotifier::new()), config);
    let tracker = service.tracker;

    let shutdown = CancellationToken::new();
    let staleness_task = tokio::spawn(service.staleness.run(shutdown.clone()));
    let dispatch_task = tokio::spawn(service.dispatch_worker.run(shutdown.clone()));

    // Observer task: logs the broadcast feed the way a connected client
    // would see it.
    let mut feed = tracker.subscribe();
    let observer_shutdown = shutdown.clone();
    let observer_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = observer_shutdown.cancelled() => break,
                update = feed.recv() => match update {
                    Ok(update) => debug!(
                        entity = %update.entity_id,
                        latitude = update.latitude,
                        longitude = update.longitude,
                        "Broadcast update"
                    ),
                    Err(_) => break,
                },
            }
        }
    });

    info!("Reading position reports from stdin (entity_id latitude longitude)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_report_line(&tracker, &line),
                Ok(None) => {
                    info!("Input stream closed, shutting down");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input, shutting down");
                    break;
                }
            },
        }
    }

    shutdown.cancel();
    let _ = staleness_task.await;
    let _ = dispatch_task.await;
    let _ = observer_task.await;
}

/// Parse one `entity_id latitude longitude` line and record it.
///
/// Malformed lines are logged and skipped; the update pipeline never
/// stops on bad input.
fn handle_report_line(tracker: &fieldwatch::service::LiveTracker, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[entity_id, lat, lon] = fields.as_slice() else {
        warn!(line, "Malformed position report, expected 'entity_id lat lon'");
        return;
    };
    let (Ok(latitude), Ok(longitude)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        warn!(line, "Malformed coordinates in position report");
        return;
    };

    tracker.record_position(entity_id, latitude, longitude);
}
