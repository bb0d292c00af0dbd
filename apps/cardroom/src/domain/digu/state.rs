use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use super::{DEFAULT_TARGET_SCORE, DIGU_LOG_CAPACITY};
use crate::domain::bounded_log::GameLog;
use crate::domain::dealing::DIGU_HAND_SIZE;
use crate::domain::invariants::require_full_deck;
use crate::domain::{Card, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiguStatus {
    Waiting,
    Playing,
    RoundEnd,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeldKind {
    Set,
    Run,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meld {
    #[serde(rename = "type")]
    pub kind: MeldKind,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiguPlayer {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    /// Declared melds; every card here is also in `hand`.
    pub melds: Vec<Meld>,
    pub round_score: u32,
    pub total_score: u32,
    pub has_knocked: bool,
    pub has_dropped: bool,
    /// Drew at least once this round; a Big Digu must be declared before that.
    pub has_drawn: bool,
    pub is_bot: bool,
}

impl DiguPlayer {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Vec::new(),
            melds: Vec::new(),
            round_score: 0,
            total_score: 0,
            has_knocked: false,
            has_dropped: false,
            has_drawn: false,
            is_bot: false,
        }
    }

    pub fn bot(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id, name)
        }
    }
}

/// Outcome of a knock, kept on the state until the next round is dealt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub winner_id: PlayerId,
    pub scores: BTreeMap<PlayerId, u32>,
    pub deadwood: BTreeMap<PlayerId, u32>,
    pub melds: BTreeMap<PlayerId, Vec<Meld>>,
    pub bonuses: BTreeMap<PlayerId, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiguGameState {
    pub room_code: String,
    pub players: Vec<DiguPlayer>,
    pub current_player_index: usize,
    /// Draw pile; top is the last element.
    pub deck: Vec<Card>,
    /// Top is the last element.
    pub discard_pile: Vec<Card>,
    pub status: DiguStatus,
    pub current_round: u32,
    pub knocked_player_id: Option<PlayerId>,
    pub log: GameLog,
    /// true = end the game.
    pub end_game_votes: BTreeMap<PlayerId, bool>,
    #[serde(with = "time::serde::timestamp::option")]
    pub end_game_vote_deadline: Option<OffsetDateTime>,
    pub target_score: u32,
    pub last_round: Option<RoundResult>,
    pub winner_id: Option<PlayerId>,
    /// Completed rounds, for history.
    pub rounds_played: u32,
    #[serde(with = "time::serde::timestamp::option")]
    pub started_at: Option<OffsetDateTime>,
}

impl DiguGameState {
    pub fn new(room_code: impl Into<String>, host: DiguPlayer) -> Self {
        Self {
            room_code: room_code.into(),
            players: vec![host],
            current_player_index: 0,
            deck: Vec::new(),
            discard_pile: Vec::new(),
            status: DiguStatus::Waiting,
            current_round: 0,
            knocked_player_id: None,
            log: GameLog::with_capacity(DIGU_LOG_CAPACITY),
            end_game_votes: BTreeMap::new(),
            end_game_vote_deadline: None,
            target_score: DEFAULT_TARGET_SCORE,
            last_round: None,
            winner_id: None,
            rounds_played: 0,
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

    /// Like `require_player_index`, but dropped players are refused.
    pub fn require_active_index(&self, player_id: &str) -> Result<usize, DomainError> {
        let idx = self.require_player_index(player_id)?;
        if self.players[idx].has_dropped {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "Player has dropped out",
            ));
        }
        Ok(idx)
    }

    pub fn current_player(&self) -> Option<&DiguPlayer> {
        self.players.get(self.current_player_index)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &DiguPlayer> {
        self.players.iter().filter(|p| !p.has_dropped)
    }

    /// Next non-dropped seat after `from`, wrapping.
    pub fn next_active_index(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| !self.players[i].has_dropped)
    }

    pub fn push_log(&mut self, message: impl Into<String>) {
        self.log.push(message.into());
    }

    /// Card conservation plus meld and turn bookkeeping.
    pub fn verify(&self) -> Result<(), DomainError> {
        let cards = self
            .players
            .iter()
            .flat_map(|p| p.hand.iter())
            .chain(self.deck.iter())
            .chain(self.discard_pile.iter());
        if self.status == DiguStatus::Waiting {
            if cards.count() != 0 {
                return Err(DomainError::invariant(
                    "Invariant violated: cards present before the game started",
                ));
            }
            return Ok(());
        }
        require_full_deck(cards, "digu")?;

        for p in &self.players {
            let stray = p
                .melds
                .iter()
                .flat_map(|m| m.cards.iter())
                .find(|c| !p.hand.contains(c));
            if let Some(card) = stray {
                return Err(DomainError::invariant(format!(
                    "Invariant violated: {} melds {card} without holding it",
                    p.id
                )));
            }
        }

        if self.status == DiguStatus::Playing {
            let Some(current) = self.current_player() else {
                return Err(DomainError::invariant(
                    "Invariant violated: current seat out of range",
                ));
            };
            if current.has_dropped {
                return Err(DomainError::invariant(
                    "Invariant violated: dropped player holds the turn",
                ));
            }
            let held = current.hand.len();
            if held != DIGU_HAND_SIZE && held != DIGU_HAND_SIZE + 1 {
                return Err(DomainError::invariant(format!(
                    "Invariant violated: current player holds {held} cards"
                )));
            }
        }
        Ok(())
    }
}
