use serde::Serialize;
use time::OffsetDateTime;

use super::{BONDI_LOG_CAPACITY, BONDI_MAX_PLAYERS};
use crate::domain::bounded_log::GameLog;
use crate::domain::invariants::require_full_deck;
use crate::domain::{Card, PlayerId, Suit};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BondiStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondiPlayer {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    /// Out of turn order: finished players and observers.
    pub is_spectator: bool,
    pub is_bot: bool,
}

impl BondiPlayer {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Vec::new(),
            is_spectator: false,
            is_bot: false,
        }
    }

    pub fn bot(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id, name)
        }
    }

    /// Still in turn order with cards left to shed.
    pub fn is_active(&self) -> bool {
        !self.is_spectator && !self.hand.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickPlay {
    pub player_id: PlayerId,
    pub card: Card,
}

/// Entire Bondi room state, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondiGameState {
    pub room_code: String,
    /// Turn order is array order.
    pub players: Vec<BondiPlayer>,
    pub current_player_index: usize,
    /// Plays in the current trick, in play order.
    pub current_trick: Vec<TrickPlay>,
    /// Set exactly when `current_trick` is non-empty.
    pub leading_suit: Option<Suit>,
    pub last_completed_trick: Option<Vec<TrickPlay>>,
    /// Holder of the highest leading-suit card played so far.
    pub leading_player_id: Option<PlayerId>,
    pub status: BondiStatus,
    /// Player ids in finishing order; the loser is appended last.
    pub winners: Vec<PlayerId>,
    pub log: GameLog,
    /// Cards removed from play by completed tricks.
    pub discarded: Vec<Card>,
    #[serde(skip)]
    pub max_players: usize,
    #[serde(with = "time::serde::timestamp::option")]
    pub started_at: Option<OffsetDateTime>,
}

impl BondiGameState {
    pub fn new(room_code: impl Into<String>, host: BondiPlayer) -> Self {
        Self {
            room_code: room_code.into(),
            players: vec![host],
            current_player_index: 0,
            current_trick: Vec::new(),
            leading_suit: None,
            last_completed_trick: None,
            leading_player_id: None,
            status: BondiStatus::Waiting,
            winners: Vec::new(),
            log: GameLog::with_capacity(BONDI_LOG_CAPACITY),
            discarded: Vec::new(),
            max_players: BONDI_MAX_PLAYERS,
            started_at: None,
        }
    }

    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn require_player_index(&self, player_id: &str) -> Result<usize, DomainError> {
        self.player_index(player_id)
            .ok_or_else(|| DomainError::player_not_found(player_id))
    }

    pub fn current_player(&self) -> Option<&BondiPlayer> {
        self.players.get(self.current_player_index)
    }

    /// Seats still in turn order (not spectating, holding cards).
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Seats that take part in tricks: not spectating.
    pub fn seated_count(&self) -> usize {
        self.players.iter().filter(|p| !p.is_spectator).count()
    }

    /// Cards still held or on the table.
    pub fn cards_in_play(&self) -> usize {
        self.players.iter().map(|p| p.hand.len()).sum::<usize>() + self.current_trick.len()
    }

    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    /// Ordered players for placement reporting.
    pub fn winner_players(&self) -> Vec<&BondiPlayer> {
        self.winners
            .iter()
            .filter_map(|id| self.players.iter().find(|p| &p.id == id))
            .collect()
    }

    /// Check card conservation and turn bookkeeping.
    pub fn verify(&self) -> Result<(), DomainError> {
        let cards = self
            .players
            .iter()
            .flat_map(|p| p.hand.iter())
            .chain(self.current_trick.iter().map(|t| &t.card))
            .chain(self.discarded.iter());
        if self.status == BondiStatus::Waiting {
            if cards.count() != 0 {
                return Err(DomainError::invariant(
                    "Invariant violated: cards present before the game started",
                ));
            }
            return Ok(());
        }
        require_full_deck(cards, "bondi")?;

        if self.leading_suit.is_some() == self.current_trick.is_empty() {
            return Err(DomainError::invariant(
                "Invariant violated: leading suit must be set exactly while a trick is open",
            ));
        }
        if self.status == BondiStatus::Playing {
            let current_ok = self
                .current_player()
                .map(BondiPlayer::is_active)
                .unwrap_or(false);
            if !current_ok {
                return Err(DomainError::invariant(format!(
                    "Invariant violated: seat {} cannot act",
                    self.current_player_index
                )));
            }
        }
        Ok(())
    }
}
