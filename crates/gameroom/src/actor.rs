use super::*;
use rack_core::*;
use rack_engine::*;
use rack_store::SnapshotStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::time::Instant;

/// Marker type for session identifiers.
pub struct Session;

/// Commands delivered to a room actor's inbox.
///
/// Client frames, admission requests, and liveness signals all funnel
/// through here; processing order is exactly arrival order.
pub enum RoomCommand {
    /// An engine transition on behalf of a player. The optional reply
    /// makes request/response callers (admission) synchronous; sessions
    /// leave it empty and hear about failures via `error` frames.
    Engine {
        player_id: ID<Player>,
        command: Command,
        reply: Option<oneshot::Sender<Result<(), EngineError>>>,
    },
    /// A session attached for this player; starts receiving frames.
    Subscribe {
        session: ID<Session>,
        player_id: ID<Player>,
        sender: UnboundedSender<ServerMessage>,
    },
    /// The session went away; the seat is retained for reconnection.
    Unsubscribe {
        session: ID<Session>,
        player_id: ID<Player>,
    },
    /// Keep-alive refreshing the player's liveness deadline.
    Heartbeat { player_id: ID<Player> },
}

/// Single-threaded owner of one room's state.
///
/// The actor applies engine transitions serially, persists the snapshot
/// before acknowledging, and fans the result out: snapshots through a
/// watch channel (last-write-wins per subscriber), events through
/// per-session queues (never coalesced).
pub struct RoomActor {
    room: Room,
    store: Arc<dyn SnapshotStore>,
    inbox: UnboundedReceiver<RoomCommand>,
    snapshots: watch::Sender<Room>,
    subscribers: HashMap<ID<Session>, (ID<Player>, UnboundedSender<ServerMessage>)>,
    liveness: HashMap<ID<Player>, Instant>,
    empty_since: Option<Instant>,
    config: LivenessConfig,
}

impl RoomActor {
    /// Spawns the actor task. The returned receiver resolves with the
    /// room id when the actor retires (end of game or idle teardown),
    /// letting the registry clean up after it.
    pub fn spawn(
        room: Room,
        store: Arc<dyn SnapshotStore>,
    ) -> (RoomHandle, oneshot::Receiver<ID<Room>>) {
        Self::spawn_with(room, store, LivenessConfig::default())
    }
    pub fn spawn_with(
        room: Room,
        store: Arc<dyn SnapshotStore>,
        config: LivenessConfig,
    ) -> (RoomHandle, oneshot::Receiver<ID<Room>>) {
        let (tx, rx) = unbounded_channel();
        let (watch_tx, watch_rx) = watch::channel(room.clone());
        let (done_tx, done_rx) = oneshot::channel();
        let handle = RoomHandle {
            id: room.id.clone(),
            commands: tx,
            snapshots: watch_rx,
        };
        let actor = Self {
            room,
            store,
            inbox: rx,
            snapshots: watch_tx,
            subscribers: HashMap::new(),
            liveness: HashMap::new(),
            empty_since: Some(Instant::now()),
            config,
        };
        tokio::spawn(actor.run(done_tx));
        (handle, done_rx)
    }

    async fn run(mut self, done: oneshot::Sender<ID<Room>>) {
        log::debug!("[room {}] actor started", self.room.id);
        let mut sweeper = tokio::time::interval(self.config.sweep);
        sweeper.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            let stop = tokio::select! {
                command = self.inbox.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => true,
                },
                _ = sweeper.tick() => self.sweep().await,
            };
            if stop {
                break;
            }
        }
        log::debug!("[room {}] actor retired", self.room.id);
        let _ = done.send(self.room.id.clone());
    }

    async fn handle(&mut self, command: RoomCommand) -> bool {
        match command {
            RoomCommand::Engine {
                player_id,
                command,
                reply,
            } => self.transition(player_id, command, reply).await,
            RoomCommand::Subscribe {
                session,
                player_id,
                sender,
            } => {
                self.subscribe(session, player_id, sender).await;
                false
            }
            RoomCommand::Unsubscribe { session, player_id } => {
                self.unsubscribe(session, player_id).await;
                false
            }
            RoomCommand::Heartbeat { player_id } => {
                self.heartbeat(player_id).await;
                false
            }
        }
    }

    /// Applies one engine transition: persist first, then commit and
    /// broadcast. A failed store write leaves the in-memory snapshot at
    /// the pre-command state and surfaces a retryable internal error.
    async fn transition(
        &mut self,
        player_id: ID<Player>,
        command: Command,
        reply: Option<oneshot::Sender<Result<(), EngineError>>>,
    ) -> bool {
        let result = self.room.apply(&player_id, command);
        let outcome = match result {
            Ok((next, events)) => {
                let finished = next.status == RoomStatus::Finished;
                if !finished {
                    if let Err(e) = self.persist(&next).await {
                        log::error!("[room {}] snapshot write failed: {}", self.room.id, e);
                        let error = EngineError::Internal("snapshot write failed".to_string());
                        self.report(&player_id, &error);
                        if let Some(reply) = reply {
                            let _ = reply.send(Err(error));
                        }
                        return false;
                    }
                }
                self.room = next;
                self.broadcast(events);
                if let Some(reply) = reply {
                    let _ = reply.send(Ok(()));
                }
                if finished {
                    if let Err(e) = self.store.delete(self.room.id.as_str()).await {
                        log::warn!("[room {}] cleanup delete failed: {}", self.room.id, e);
                    }
                    log::info!("[room {}] game over, retiring", self.room.id);
                    return true;
                }
                false
            }
            Err(error) => {
                log::debug!("[room {}] rejected {}: {}", self.room.id, player_id, error);
                self.report(&player_id, &error);
                if let Some(reply) = reply {
                    let _ = reply.send(Err(error));
                }
                false
            }
        };
        outcome
    }

    async fn subscribe(
        &mut self,
        session: ID<Session>,
        player_id: ID<Player>,
        sender: UnboundedSender<ServerMessage>,
    ) {
        log::debug!("[room {}] session {} attached to {}", self.room.id, session, player_id);
        let _ = sender.send(ServerMessage::room_state(self.room.clone()));
        self.subscribers.insert(session, (player_id.clone(), sender));
        self.liveness.insert(player_id.clone(), Instant::now());
        self.empty_since = None;
        if self.room.set_connected(&player_id, true) {
            self.commit_presence().await;
        }
    }

    async fn unsubscribe(&mut self, session: ID<Session>, player_id: ID<Player>) {
        log::debug!("[room {}] session {} detached", self.room.id, session);
        self.subscribers.remove(&session);
        let still_here = self.subscribers.values().any(|(p, _)| *p == player_id);
        if !still_here && self.room.set_connected(&player_id, false) {
            self.commit_presence().await;
        }
        if self.subscribers.is_empty() {
            self.empty_since = Some(Instant::now());
        }
    }

    async fn heartbeat(&mut self, player_id: ID<Player>) {
        self.liveness.insert(player_id.clone(), Instant::now());
        let attached = self.subscribers.values().any(|(p, _)| *p == player_id);
        if attached && self.room.set_connected(&player_id, true) {
            self.commit_presence().await;
        }
    }

    /// Periodic liveness pass. Silent players show as disconnected (their
    /// turn still blocks); a room empty past its idle deadline retires.
    async fn sweep(&mut self) -> bool {
        let mut changed = false;
        for (player_id, last) in self.liveness.clone() {
            let attached = self.subscribers.values().any(|(p, _)| p == &player_id);
            if attached && self.config.stale(last) && self.room.set_connected(&player_id, false) {
                log::info!("[room {}] {} went silent", self.room.id, player_id);
                changed = true;
            }
        }
        if changed {
            self.commit_presence().await;
        }
        if let Some(empty_since) = self.empty_since {
            if self.config.expired(empty_since) {
                log::info!("[room {}] idle and empty, retiring", self.room.id);
                if let Err(e) = self.store.delete(self.room.id.as_str()).await {
                    log::warn!("[room {}] cleanup delete failed: {}", self.room.id, e);
                }
                return true;
            }
        }
        false
    }

    async fn persist(&self, room: &Room) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec(room)?;
        self.store.save(room.id.as_str(), &bytes).await
    }

    /// Presence flips are best-effort: worth broadcasting, not worth
    /// failing the room over.
    async fn commit_presence(&mut self) {
        if let Err(e) = self.persist(&self.room.clone()).await {
            log::warn!("[room {}] presence write failed: {}", self.room.id, e);
        }
        self.broadcast(Vec::new());
    }

    /// Snapshot to the watch channel first, then events to every session.
    fn broadcast(&self, events: Vec<GameEvent>) {
        self.snapshots.send_replace(self.room.clone());
        for event in events {
            log::debug!("[room {}] event: {}", self.room.id, event);
            for (_, sender) in self.subscribers.values() {
                let _ = sender.send(ServerMessage::event(event.clone()));
            }
        }
    }

    /// Typed error back to the originating player's sessions only.
    fn report(&self, player_id: &ID<Player>, error: &EngineError) {
        for (player, sender) in self.subscribers.values() {
            if player == player_id {
                let _ = sender.send(ServerMessage::error(error));
            }
        }
    }
}
