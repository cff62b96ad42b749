//! Replay command - run the tracker over a recorded track file.
//!
//! Prints the status line after every update and notifications to stderr,
//! then a short summary once the recording ends or Ctrl-C is pressed.

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use speedtrail::tracker::{
    load_track, spawn_track_logger, ReplaySource, TrackSummary, TrackView, Tracker,
    TrackerHandle, DEFAULT_LOG_INTERVAL,
};

use crate::error::CliError;
use crate::notifier::ConsoleNotifier;
use crate::runner::CliRunner;

/// Arguments for the replay command.
pub struct ReplayArgs {
    pub track: PathBuf,
    pub speed_factor: f64,
    pub debug: bool,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("replay");
    let config = runner.config();

    let samples = load_track(&args.track)?;
    info!(
        track = %args.track.display(),
        samples = samples.len(),
        speed_factor = args.speed_factor,
        "Track loaded"
    );
    println!(
        "Replaying {} samples from {} (x{})",
        samples.len(),
        args.track.display(),
        args.speed_factor
    );

    let source = Arc::new(ReplaySource::new(samples).with_speed_factor(args.speed_factor));
    let notifier = Arc::new(ConsoleNotifier::from_settings(&config.notifications));
    let mut tracker = Tracker::with_config(source, notifier, config.tracker_config());
    let updates = tracker.updates();

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let summary = runtime.block_on(async move {
        let handle = tracker.start();

        if args.debug {
            spawn_track_logger(
                handle.subscribe(),
                handle.cancellation_token(),
                DEFAULT_LOG_INTERVAL,
            );
        }

        let interrupted = async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, stopping replay");
            } else {
                // No signal handler, run to the end of the track
                std::future::pending::<()>().await;
            }
        };

        follow_updates(handle, updates, &mut io::stdout(), interrupted).await
    });

    print_summary(&summary);
    Ok(())
}

/// Print one status line per update until the track ends or `interrupted`
/// resolves.
async fn follow_updates<W: Write>(
    handle: TrackerHandle,
    mut updates: mpsc::Receiver<TrackView>,
    out: &mut W,
    interrupted: impl Future<Output = ()>,
) -> TrackSummary {
    tokio::pin!(interrupted);

    if let Err(e) = print_view(out, &handle.view()) {
        tracing::warn!(error = %e, "Failed to print status");
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(view) => {
                    if let Err(e) = print_view(out, &view) {
                        tracing::warn!(error = %e, "Failed to print status");
                    }
                }
                None => break,
            },
            _ = &mut interrupted => return handle.shutdown().await,
        }
    }

    handle.join().await
}

fn print_view<W: Write>(out: &mut W, view: &TrackView) -> io::Result<()> {
    let marker = if view.speed_exceeded { " [OVER LIMIT]" } else { "" };
    writeln!(out, "{}{}", view.status_line(), marker)
}

fn print_summary(summary: &TrackSummary) {
    println!();
    println!("Replay complete");
    println!("  Samples: {}", summary.samples);
    println!("  Errors:  {}", summary.errors);
    println!("  Alerts:  {}", summary.alerts);
}
