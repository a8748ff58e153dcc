//! Notification bridge: feeds externally declared winners into a bracket.
//!
//! The bridge never captures bracket state. It locks the shared sink when an event
//! arrives, so each event is resolved against the latest snapshot.

mod push;

pub use push::{parse_frame, PushListener, WINNER_EVENTS};

use crate::engine::Engine;
use crate::logic::RoundOutcome;
use crate::models::TournamentError;
use crate::persistence::{MatchRegistry, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::task::JoinHandle;

/// A winner declared outside this process.
///
/// Accepts a bare name, `{"winnerName": ..}` or `{"winner": ..}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWinner", rename_all = "camelCase")]
pub struct WinnerEvent {
    pub winner_name: String,
}

impl WinnerEvent {
    pub fn new(winner_name: impl Into<String>) -> Self {
        Self {
            winner_name: winner_name.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWinner {
    Name(String),
    Record {
        #[serde(rename = "winnerName", alias = "winner")]
        name: String,
    },
}

impl From<RawWinner> for WinnerEvent {
    fn from(raw: RawWinner) -> Self {
        match raw {
            RawWinner::Name(name) | RawWinner::Record { name } => WinnerEvent::new(name),
        }
    }
}

/// Anything that delivers winner events, one at a time. `None` means the source is gone.
pub trait WinnerSource: Send + 'static {
    fn next_winner(&mut self) -> impl Future<Output = Option<WinnerEvent>> + Send;
}

impl WinnerSource for broadcast::Receiver<WinnerEvent> {
    async fn next_winner(&mut self) -> Option<WinnerEvent> {
        loop {
            match self.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Winner feed lagged, {} event(s) dropped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl WinnerSource for mpsc::UnboundedReceiver<WinnerEvent> {
    async fn next_winner(&mut self) -> Option<WinnerEvent> {
        self.recv().await
    }
}

/// Something a declared winner can be applied to.
pub trait WinnerSink: Send + 'static {
    fn declare_winner(
        &mut self,
        winner: &str,
    ) -> impl Future<Output = Result<RoundOutcome, TournamentError>> + Send;
}

impl<S: SnapshotStore, M: MatchRegistry> WinnerSink for Engine<S, M> {
    async fn declare_winner(&mut self, winner: &str) -> Result<RoundOutcome, TournamentError> {
        Engine::declare_winner(self, winner)
    }
}

/// What the bridge did with one event.
#[derive(Clone, Debug)]
pub struct BridgeReport {
    pub winner: String,
    pub result: Result<RoundOutcome, TournamentError>,
}

/// Running subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct BridgeHandle {
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Unsubscribe now.
    pub fn close(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Subscribe `sink` to `source`. Each event is applied under the sink's lock; events
/// naming no open match are logged and otherwise ignored.
pub fn spawn_bridge<W, K>(
    mut source: W,
    sink: Arc<Mutex<K>>,
    reports: Option<mpsc::UnboundedSender<BridgeReport>>,
) -> BridgeHandle
where
    W: WinnerSource,
    K: WinnerSink,
{
    let task = tokio::spawn(async move {
        while let Some(event) = source.next_winner().await {
            let winner = event.winner_name;
            let result = {
                let mut target = sink.lock().await;
                target.declare_winner(&winner).await
            };
            match &result {
                Ok(outcome) => {
                    if let Some(notice) = outcome.notice() {
                        log::info!("{}", notice);
                    }
                }
                Err(e) => log::debug!("Ignoring winner event: {}", e),
            }
            if let Some(tx) = &reports {
                let _ = tx.send(BridgeReport { winner, result });
            }
        }
        log::debug!("Winner feed closed, bridge stopping");
    });
    BridgeHandle { task }
}
