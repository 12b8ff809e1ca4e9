//! Background timer that keeps the error list fresh.
//!
//! Sends [`Action::RefreshErrors`] once per interval until cancelled. The
//! app answers by re-fetching the current page with the current filters,
//! whichever screen is visible.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;

/// Spawn the refresh timer. The first tick is one full `interval` after
/// spawning, the startup load having already fetched the list.
pub fn spawn_refresh_timer(
    interval: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // `interval` completes its first tick immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    debug!("refresh tick");
                    if action_tx.send(Action::RefreshErrors).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("refresh timer stopped");
    })
}
