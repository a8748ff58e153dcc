//! Bracket engine: state store plus an injected persistence strategy.
//!
//! Every transition is applied in memory first and then queued for a per-engine
//! writer task, which talks to the strategy in submission order. Transitions never
//! wait on the strategy. Failures are logged and never retried or rolled back, so
//! the in-memory bracket may run ahead of the stored snapshot.

use crate::logic::{RoundOutcome, TournamentStore};
use crate::models::{LiveMatch, Tournament, TournamentError, TournamentId};
use crate::persistence::{MatchRegistry, PersistenceError, SnapshotStore};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// One queued persistence call.
enum Write {
    Register(LiveMatch),
    Save(Tournament),
    Clear,
    Flush(oneshot::Sender<()>),
}

pub struct Engine<S, M> {
    id: TournamentId,
    store: TournamentStore,
    snapshots: Arc<S>,
    writes: mpsc::UnboundedSender<Write>,
    /// Matches are owned by the writer task.
    _matches: PhantomData<M>,
}

impl<S: SnapshotStore, M: MatchRegistry> Engine<S, M> {
    /// Engine with an empty, not yet started tournament.
    ///
    /// Spawns the writer task, so it must be called inside a Tokio runtime. The task
    /// drains what is still queued after the engine is dropped, then stops.
    pub fn new(id: impl Into<TournamentId>, snapshots: S, matches: M) -> Self {
        let id = id.into();
        let snapshots = Arc::new(snapshots);
        let writes = spawn_writer(id.clone(), snapshots.clone(), matches);
        Self {
            id,
            store: TournamentStore::new(),
            snapshots,
            writes,
            _matches: PhantomData,
        }
    }

    /// Load the stored snapshot for `id` and resume it.
    ///
    /// Returns the outcome of the auto-started round 1, if one was generated.
    /// A missing snapshot yields an empty engine.
    pub async fn open(
        id: impl Into<TournamentId>,
        snapshots: S,
        matches: M,
    ) -> Result<(Self, Option<RoundOutcome>), PersistenceError> {
        let mut engine = Self::new(id, snapshots, matches);
        let outcome = engine.reload().await?;
        Ok((engine, outcome))
    }

    /// Resume an already fetched snapshot.
    pub fn with_snapshot(
        id: impl Into<TournamentId>,
        snapshots: S,
        matches: M,
        snapshot: Tournament,
    ) -> (Self, Option<RoundOutcome>) {
        let mut engine = Self::new(id, snapshots, matches);
        let outcome = engine.resume(snapshot);
        (engine, outcome)
    }

    /// Re-fetch the stored snapshot. Safe to call repeatedly: round 1 is auto-generated
    /// at most once per engine.
    pub async fn reload(&mut self) -> Result<Option<RoundOutcome>, PersistenceError> {
        let Some(snapshot) = self.snapshots.load(&self.id).await? else {
            log::info!("No stored snapshot for tournament {}", self.id);
            return Ok(None);
        };
        Ok(self.resume(snapshot))
    }

    fn resume(&mut self, snapshot: Tournament) -> Option<RoundOutcome> {
        let outcome = self.store.resume(snapshot);
        if let Some(outcome) = &outcome {
            log::info!("Auto-started round 1 of {:?}", self.store.tournament().game_name);
            self.publish(outcome);
        }
        outcome
    }

    /// Start a fresh bracket from operator-entered names.
    pub fn start(
        &mut self,
        game_name: impl Into<String>,
        names: &[String],
    ) -> Result<RoundOutcome, TournamentError> {
        let outcome = self.store.start(game_name, names)?;
        log::info!(
            "Started {:?} with {} team(s)",
            self.store.tournament().game_name,
            self.store.tournament().teams.len()
        );
        self.publish(&outcome);
        Ok(outcome)
    }

    /// Apply a declared winner. Unknown winners change nothing and persist nothing.
    pub fn declare_winner(&mut self, winner: &str) -> Result<RoundOutcome, TournamentError> {
        let outcome = self.store.declare_winner(winner.trim())?;
        match &outcome {
            RoundOutcome::Pending { result, remaining } => log::info!(
                "{} beat {} ({} match(es) left this round)",
                result.winner,
                result.loser,
                remaining
            ),
            RoundOutcome::RoundOpened { round, matches, .. } => {
                log::info!("Round {} opened with {} match(es)", round, matches.len())
            }
            RoundOutcome::Completed { champion, .. } => {
                log::info!("{} is the champion of {:?}", champion, self.store.tournament().game_name)
            }
        }
        self.publish(&outcome);
        Ok(outcome)
    }

    /// Back to the empty pre-start state; optionally drop the stored snapshot too.
    /// The clear runs after every write queued before it.
    pub fn reset(&mut self, clear_storage: bool) {
        self.store.reset();
        if clear_storage {
            self.queue(Write::Clear);
        }
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.queue(Write::Flush(done));
        let _ = wait.await;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tournament(&self) -> &Tournament {
        self.store.tournament()
    }

    /// Queue the live matches of a newly opened round, then the full snapshot.
    fn publish(&self, outcome: &RoundOutcome) {
        let t = self.store.tournament();
        let opened = outcome.opened_matches();
        if !opened.is_empty() {
            if t.game_name.is_empty() {
                log::error!("Tournament {} has no game name, not registering matches", self.id);
            } else {
                let round = t.round_number();
                for m in opened {
                    self.queue(Write::Register(LiveMatch::new(t.game_name.clone(), round, m)));
                }
            }
        }
        self.queue(Write::Save(t.clone()));
    }

    fn queue(&self, write: Write) {
        if self.writes.send(write).is_err() {
            log::error!("Writer for tournament {} is gone, dropping write", self.id);
        }
    }
}

fn spawn_writer<S: SnapshotStore, M: MatchRegistry>(
    id: TournamentId,
    snapshots: Arc<S>,
    matches: M,
) -> mpsc::UnboundedSender<Write> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(write) = rx.recv().await {
            match write {
                Write::Register(record) => {
                    if let Err(e) = matches.register(&record).await {
                        log::error!(
                            "Error sending match {} vs {} to backend: {}",
                            record.team_a,
                            record.team_b,
                            e
                        );
                    }
                }
                Write::Save(snapshot) => {
                    if let Err(e) = snapshots.save(&id, &snapshot).await {
                        log::error!("Error saving tournament {}: {}", id, e);
                    }
                }
                Write::Clear => {
                    if let Err(e) = snapshots.clear(&id).await {
                        log::error!("Error clearing stored tournament {}: {}", id, e);
                    }
                }
                Write::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        log::debug!("Writer for tournament {} stopped", id);
    });
    tx
}
