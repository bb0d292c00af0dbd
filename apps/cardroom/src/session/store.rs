//! Registry of live rooms. Each room is served by its own worker task; the
//! store only routes commands and owns room lifecycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::chat::ChatKind;
use super::history::{HistorySink, TracingHistorySink};
use super::room::{Room, RoomAction, RoomSnapshot};
use super::room_code::{generate_room_code, normalize_room_code, MAX_CODE_ATTEMPTS};
use super::worker::{RoomCommand, RoomWorker};
use crate::config::EngineConfig;
use crate::domain::{Card, GameKind};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};

/// Snapshots buffered per subscriber before it starts lagging.
const UPDATES_CAPACITY: usize = 32;

#[derive(Clone)]
struct RoomHandle {
    tx: mpsc::Sender<RoomCommand>,
    updates: broadcast::Sender<RoomSnapshot>,
    shutdown: CancellationToken,
}

pub struct SessionStore {
    rooms: DashMap<String, RoomHandle>,
    config: Arc<EngineConfig>,
    history: Arc<dyn HistorySink>,
    code_rng: Mutex<ChaCha8Rng>,
    room_seq: AtomicU64,
}

impl SessionStore {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_history(config, Arc::new(TracingHistorySink))
    }

    pub fn with_history(config: EngineConfig, history: Arc<dyn HistorySink>) -> Self {
        let code_rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self {
            rooms: DashMap::new(),
            config: Arc::new(config),
            history,
            code_rng: Mutex::new(code_rng),
            room_seq: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn room_rng(&self) -> ChaCha8Rng {
        let seq = self.room_seq.fetch_add(1, Ordering::Relaxed) + 1;
        match self.config.rng_seed {
            Some(seed) => {
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(seq.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
            }
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Open a room hosted by `host_id` and spawn its worker.
    pub async fn create_room(
        &self,
        kind: GameKind,
        host_id: &str,
        host_name: &str,
    ) -> Result<RoomSnapshot, AppError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_room_code(&mut *self.code_rng.lock());
            let Entry::Vacant(slot) = self.rooms.entry(code.clone()) else {
                continue;
            };

            let room = Room::new(kind, &code, host_id, host_name, &self.config);
            let snapshot = room.clone();
            let (tx, rx) = mpsc::channel(self.config.room_queue_depth);
            let (updates, _) = broadcast::channel(UPDATES_CAPACITY);
            let shutdown = CancellationToken::new();
            let worker = RoomWorker::new(
                room,
                self.room_rng(),
                Arc::clone(&self.config),
                Arc::clone(&self.history),
                rx,
                tx.downgrade(),
                updates.clone(),
                shutdown.clone(),
            );
            tokio::spawn(worker.run());
            slot.insert(RoomHandle {
                tx,
                updates,
                shutdown,
            });

            info!(room_code = %code, game_kind = %kind, player_id = host_id, "Room created");
            return Ok(snapshot);
        }

        warn!(attempts = MAX_CODE_ATTEMPTS, "No free room code");
        Err(DomainError::conflict(
            ConflictKind::RoomCodeExhausted,
            "Could not allocate a unique room code",
        )
        .into())
    }

    fn handle(&self, room_code: &str) -> Result<(String, RoomHandle), AppError> {
        let code = normalize_room_code(room_code);
        let handle = self
            .rooms
            .get(&code)
            .map(|h| h.value().clone())
            .ok_or_else(|| AppError::room_not_found(&code))?;
        Ok((code, handle))
    }

    /// Queue `action` on the room and wait for the committed snapshot.
    pub async fn act(
        &self,
        room_code: &str,
        player_id: &str,
        action: RoomAction,
    ) -> Result<RoomSnapshot, AppError> {
        let (code, handle) = self.handle(room_code)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::Act {
                player_id: player_id.to_string(),
                action,
                reply,
            })
            .await
            .map_err(|_| AppError::room_unavailable(&code))?;
        rx.await.map_err(|_| AppError::room_unavailable(&code))?
    }

    /// Current state; never mutates.
    pub async fn get_room(&self, room_code: &str) -> Result<RoomSnapshot, AppError> {
        let (code, handle) = self.handle(room_code)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(RoomCommand::Snapshot { reply })
            .await
            .map_err(|_| AppError::room_unavailable(&code))?;
        rx.await.map_err(|_| AppError::room_unavailable(&code))
    }

    /// Every committed mutation, including bot turns and vote timeouts.
    pub fn subscribe(&self, room_code: &str) -> Result<broadcast::Receiver<RoomSnapshot>, AppError> {
        let (_, handle) = self.handle(room_code)?;
        Ok(handle.updates.subscribe())
    }

    /// Drop the room and stop its worker along with any pending timers.
    pub fn delete_room(&self, room_code: &str) -> Result<(), AppError> {
        let code = normalize_room_code(room_code);
        let (_, handle) = self
            .rooms
            .remove(&code)
            .ok_or_else(|| AppError::room_not_found(&code))?;
        handle.shutdown.cancel();
        info!(room_code = %code, "Room deleted");
        Ok(())
    }

    pub fn room_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rooms.iter().map(|e| e.key().clone()).collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub async fn join_room(
        &self,
        room_code: &str,
        player_id: &str,
        name: &str,
    ) -> Result<RoomSnapshot, AppError> {
        let action = RoomAction::Join {
            name: name.to_string(),
        };
        self.act(room_code, player_id, action).await
    }

    pub async fn join_as_spectator(
        &self,
        room_code: &str,
        player_id: &str,
        name: &str,
    ) -> Result<RoomSnapshot, AppError> {
        let action = RoomAction::JoinAsSpectator {
            name: name.to_string(),
        };
        self.act(room_code, player_id, action).await
    }

    pub async fn add_bot(&self, room_code: &str, player_id: &str) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::AddBot).await
    }

    pub async fn start_game(&self, room_code: &str, player_id: &str) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::StartGame).await
    }

    pub async fn play_card(
        &self,
        room_code: &str,
        player_id: &str,
        card: Card,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::PlayCard { card }).await
    }

    pub async fn draw_card(
        &self,
        room_code: &str,
        player_id: &str,
        from_discard: bool,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::DrawCard { from_discard })
            .await
    }

    pub async fn discard_card(
        &self,
        room_code: &str,
        player_id: &str,
        card: Card,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::DiscardCard { card }).await
    }

    pub async fn declare_melds(
        &self,
        room_code: &str,
        player_id: &str,
        melds: Vec<Vec<Card>>,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::DeclareMelds { melds })
            .await
    }

    pub async fn knock(&self, room_code: &str, player_id: &str) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::Knock).await
    }

    pub async fn drop_player(&self, room_code: &str, player_id: &str) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::Drop).await
    }

    pub async fn initiate_end_game_vote(
        &self,
        room_code: &str,
        player_id: &str,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::InitiateEndGameVote)
            .await
    }

    pub async fn vote_end_game(
        &self,
        room_code: &str,
        player_id: &str,
        end_game: bool,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::VoteEndGame { end_game })
            .await
    }

    pub async fn start_new_round(
        &self,
        room_code: &str,
        player_id: &str,
    ) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::StartNewRound).await
    }

    pub async fn rematch(&self, room_code: &str, player_id: &str) -> Result<RoomSnapshot, AppError> {
        self.act(room_code, player_id, RoomAction::Rematch).await
    }

    pub async fn send_message(
        &self,
        room_code: &str,
        player_id: &str,
        text: &str,
        kind: ChatKind,
    ) -> Result<RoomSnapshot, AppError> {
        let action = RoomAction::SendMessage {
            text: text.to_string(),
            kind,
        };
        self.act(room_code, player_id, action).await
    }
}
