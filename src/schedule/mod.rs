//! Polling mode: decide when to run a reconciliation cycle.
//!
//! The scheduler itself does no IO; [`run_polling`] drives it with the wall clock.

mod quiet;

pub use quiet::QuietPeriod;

use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

use crate::config::PollConfig;
use crate::sync::Reconciler;

/// What the polling loop should do now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Run,
    /// Inside the quiet period; sleep this long before checking again.
    Pause(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    interval: Duration,
    quiet: Option<QuietPeriod>,
}

impl Scheduler {
    pub fn new(interval: Duration, quiet: Option<QuietPeriod>) -> Self {
        Self { interval, quiet }
    }

    pub fn from_config(cfg: &PollConfig) -> Self {
        let quiet = cfg
            .quiet_start
            .zip(cfg.quiet_end)
            .and_then(|(start, end)| QuietPeriod::new(start, end));
        Self::new(cfg.interval(), quiet)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn quiet_period(&self) -> Option<QuietPeriod> {
        self.quiet
    }

    pub fn next_step(&self, now: DateTime<Utc>) -> Step {
        let time = now.time();
        match self.quiet {
            Some(quiet) if quiet.contains(time) => Step::Pause(quiet.remaining(time)),
            _ => Step::Run,
        }
    }
}

/// Runs cycles until `shutdown` resolves: one cycle, then `interval` of sleep,
/// except inside the quiet period where the loop sleeps until it ends.
///
/// Cycle errors are logged and never stop the loop. A cycle still running when
/// `shutdown` resolves is abandoned.
pub async fn run_polling<F>(reconciler: &Reconciler, scheduler: &Scheduler, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    info!(
        interval_secs = scheduler.interval().as_secs(),
        quiet_period = ?scheduler.quiet_period(),
        "Polling started"
    );

    loop {
        let wait = match scheduler.next_step(Utc::now()) {
            Step::Run => {
                tokio::select! {
                    result = reconciler.reconcile() => {
                        if let Err(e) = result {
                            error!(error = %e, "Reconciliation cycle failed");
                        }
                    }
                    () = &mut shutdown => {
                        info!("Shutdown requested; abandoning current cycle");
                        return;
                    }
                }
                info!(
                    next_in_secs = scheduler.interval().as_secs(),
                    "Cycle done; checking again later"
                );
                scheduler.interval()
            }
            Step::Pause(remaining) => {
                info!(resume_in_secs = remaining.as_secs(), "Quiet period; polling paused");
                remaining
            }
        };

        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            () = &mut shutdown => {
                info!("Shutdown requested; polling stopped");
                return;
            }
        }
    }
}
