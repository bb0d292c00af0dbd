//! Finished-game records and the sinks that receive them.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use super::room::GameState;
use crate::domain::{GameKind, PlayerId};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub id: PlayerId,
    pub name: String,
    /// 1-based.
    pub placement: usize,
    pub total_score: u32,
    pub is_bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGame {
    pub room_code: String,
    pub game_kind: GameKind,
    pub players: Vec<PlayerResult>,
    /// Digu rounds played, or 1 for a Bondi game.
    pub rounds: u32,
    pub log: Vec<String>,
    pub duration_secs: i64,
}

impl FinishedGame {
    /// Build the record for a finished game; `None` while still in progress.
    pub fn from_game(game: &GameState, now: OffsetDateTime) -> Option<Self> {
        if !game.is_finished() {
            return None;
        }
        let record = match game {
            GameState::Bondi(s) => {
                let players = s
                    .winner_players()
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| PlayerResult {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        placement: i + 1,
                        total_score: 0,
                        is_bot: p.is_bot,
                    })
                    .collect();
                FinishedGame {
                    room_code: s.room_code.clone(),
                    game_kind: GameKind::Bondi,
                    players,
                    rounds: 1,
                    log: s.log.to_vec(),
                    duration_secs: duration_since(s.started_at, now),
                }
            }
            GameState::Digu(s) => {
                let mut ranked: Vec<_> = s.players.iter().collect();
                // Stable: ties keep seat order.
                ranked.sort_by_key(|p| (p.has_dropped, std::cmp::Reverse(p.total_score)));
                let players = ranked
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| PlayerResult {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        placement: i + 1,
                        total_score: p.total_score,
                        is_bot: p.is_bot,
                    })
                    .collect();
                FinishedGame {
                    room_code: s.room_code.clone(),
                    game_kind: GameKind::Digu,
                    players,
                    rounds: s.rounds_played,
                    log: s.log.to_vec(),
                    duration_secs: duration_since(s.started_at, now),
                }
            }
        };
        Some(record)
    }
}

fn duration_since(started_at: Option<OffsetDateTime>, now: OffsetDateTime) -> i64 {
    started_at
        .map(|t| (now - t).whole_seconds().max(0))
        .unwrap_or(0)
}

/// Receives finished games. Failures are logged by the caller and never
/// touch room state.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record(&self, game: FinishedGame) -> Result<(), AppError>;
}

/// Default sink: one structured log event per finished game.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHistorySink;

#[async_trait]
impl HistorySink for TracingHistorySink {
    async fn record(&self, game: FinishedGame) -> Result<(), AppError> {
        let winner = game.players.first().map(|p| p.name.as_str()).unwrap_or("");
        info!(
            room_code = %game.room_code,
            game_kind = %game.game_kind,
            winner,
            players = game.players.len(),
            rounds = game.rounds,
            duration_secs = game.duration_secs,
            "Game finished"
        );
        Ok(())
    }
}

/// Keeps records in memory; handy for tests and the simulator.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistorySink {
    games: Arc<Mutex<Vec<FinishedGame>>>,
}

impl InMemoryHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> Vec<FinishedGame> {
        self.games.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }
}

#[async_trait]
impl HistorySink for InMemoryHistorySink {
    async fn record(&self, game: FinishedGame) -> Result<(), AppError> {
        self.games.lock().push(game);
        Ok(())
    }
}
