//! Background reconciliation loop
//!
//! Reconciles once at startup and then on a fixed interval. Every run is
//! spawned on its own task, so an on-demand run can overlap a scheduled one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::reconcile::Reconciler;

/// Commands sent to the sync task
#[derive(Debug)]
pub enum SyncCommand {
    /// Run a reconciliation now, outside the schedule
    SyncNow,
    /// Stop scheduling runs
    Shutdown,
}

/// Handle for controlling the background sync task
pub struct SyncHandle {
    command_tx: mpsc::Sender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Ask the loop for an immediate run
    pub async fn sync_now(&self) {
        let _ = self.command_tx.send(SyncCommand::SyncNow).await;
    }

    /// Stop the loop and wait for it to exit
    ///
    /// Runs already in flight are not cancelled.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(SyncCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Spawn the periodic reconciliation task
pub fn spawn_sync_loop(reconciler: Reconciler, interval: Duration) -> SyncHandle {
    let (command_tx, command_rx) = mpsc::channel(16);
    let task = tokio::spawn(sync_loop_task(reconciler, interval, command_rx));

    SyncHandle { command_tx, task }
}

async fn sync_loop_task(
    reconciler: Reconciler,
    interval: Duration,
    mut command_rx: mpsc::Receiver<SyncCommand>,
) {
    // First tick fires immediately: that is the startup run
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                debug!("Scheduled sync");
                spawn_run(&reconciler);
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(SyncCommand::SyncNow) => spawn_run(&reconciler),
                    Some(SyncCommand::Shutdown) | None => break,
                }
            }
        }
    }

    debug!("Sync loop stopped");
}

fn spawn_run(reconciler: &Reconciler) {
    let reconciler = reconciler.clone();
    tokio::spawn(async move {
        if let Err(e) = reconciler.reconcile().await {
            warn!("Sync failed: {}", e);
        }
    });
}
