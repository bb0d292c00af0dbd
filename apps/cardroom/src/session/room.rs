//! Room-level state and action dispatch shared by both rule sets.

use rand::Rng;
use serde::Serialize;
use time::OffsetDateTime;

use super::chat::{self, new_chat_log, ChatKind, ChatLog, ChatMessage};
use crate::config::EngineConfig;
use crate::domain::bondi::{self, lobby, BondiGameState, BondiPlayer, BondiStatus};
use crate::domain::digu::{self, round, vote, DiguGameState, DiguPlayer, DiguStatus};
use crate::domain::{Card, GameKind, PlayerId};
use crate::errors::domain::{DomainError, ValidationKind};

/// One player action, already parsed into typed payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomAction {
    Join { name: String },
    JoinAsSpectator { name: String },
    AddBot,
    StartGame,
    PlayCard { card: Card },
    DrawCard { from_discard: bool },
    DiscardCard { card: Card },
    DeclareMelds { melds: Vec<Vec<Card>> },
    Knock,
    Drop,
    InitiateEndGameVote,
    VoteEndGame { end_game: bool },
    StartNewRound,
    Rematch,
    SendMessage { text: String, kind: ChatKind },
}

impl RoomAction {
    pub fn name(&self) -> &'static str {
        match self {
            RoomAction::Join { .. } => "join",
            RoomAction::JoinAsSpectator { .. } => "join_as_spectator",
            RoomAction::AddBot => "add_bot",
            RoomAction::StartGame => "start_game",
            RoomAction::PlayCard { .. } => "play_card",
            RoomAction::DrawCard { .. } => "draw_card",
            RoomAction::DiscardCard { .. } => "discard_card",
            RoomAction::DeclareMelds { .. } => "declare_melds",
            RoomAction::Knock => "knock",
            RoomAction::Drop => "drop",
            RoomAction::InitiateEndGameVote => "initiate_end_game_vote",
            RoomAction::VoteEndGame { .. } => "vote_end_game",
            RoomAction::StartNewRound => "start_new_round",
            RoomAction::Rematch => "rematch",
            RoomAction::SendMessage { .. } => "send_message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "gameType", rename_all = "lowercase")]
pub enum GameState {
    Bondi(BondiGameState),
    Digu(DiguGameState),
}

impl GameState {
    pub fn kind(&self) -> GameKind {
        match self {
            GameState::Bondi(_) => GameKind::Bondi,
            GameState::Digu(_) => GameKind::Digu,
        }
    }

    pub fn room_code(&self) -> &str {
        match self {
            GameState::Bondi(s) => &s.room_code,
            GameState::Digu(s) => &s.room_code,
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            GameState::Bondi(s) => s.status == BondiStatus::Finished,
            GameState::Digu(s) => s.status == DiguStatus::Finished,
        }
    }

    pub fn verify(&self) -> Result<(), DomainError> {
        match self {
            GameState::Bondi(s) => s.verify(),
            GameState::Digu(s) => s.verify(),
        }
    }

    /// Bot holding the turn, if the game is waiting on one.
    pub fn bot_to_move(&self) -> Option<PlayerId> {
        match self {
            GameState::Bondi(s) if s.status == BondiStatus::Playing => s
                .current_player()
                .filter(|p| p.is_bot && p.is_active())
                .map(|p| p.id.clone()),
            GameState::Digu(s) if s.status == DiguStatus::Playing => s
                .current_player()
                .filter(|p| p.is_bot && !p.has_dropped)
                .map(|p| p.id.clone()),
            _ => None,
        }
    }

    /// Open ballot deadline (Digu only).
    pub fn vote_deadline(&self) -> Option<OffsetDateTime> {
        match self {
            GameState::Digu(s) if vote::vote_open(s) => s.end_game_vote_deadline,
            _ => None,
        }
    }

    fn player_name(&self, player_id: &str) -> Option<&str> {
        match self {
            GameState::Bondi(s) => s.players.iter().find(|p| p.id == player_id).map(|p| p.name.as_str()),
            GameState::Digu(s) => s.players.iter().find(|p| p.id == player_id).map(|p| p.name.as_str()),
        }
    }
}

/// Everything a room worker owns; also the snapshot handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub game: GameState,
    pub chat: ChatLog,
    #[serde(skip)]
    chat_seq: u64,
}

pub type RoomSnapshot = Room;

impl Room {
    pub fn new(
        kind: GameKind,
        room_code: &str,
        host_id: &str,
        host_name: &str,
        config: &EngineConfig,
    ) -> Self {
        let game = match kind {
            GameKind::Bondi => {
                let mut s = BondiGameState::new(room_code, BondiPlayer::new(host_id, host_name));
                s.max_players = config.bondi_max_players;
                GameState::Bondi(s)
            }
            GameKind::Digu => {
                let mut s = DiguGameState::new(room_code, DiguPlayer::new(host_id, host_name));
                s.target_score = config.digu_target_score;
                GameState::Digu(s)
            }
        };
        Self {
            game,
            chat: new_chat_log(),
            chat_seq: 0,
        }
    }

    pub fn room_code(&self) -> &str {
        self.game.room_code()
    }

    pub fn last_chat(&self) -> Option<&ChatMessage> {
        self.chat.last()
    }
}

/// Inputs an action may consume besides the room itself.
pub struct ActionCtx<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    pub now: OffsetDateTime,
    pub config: &'a EngineConfig,
}

fn wrong_game(action: &RoomAction, kind: GameKind) -> DomainError {
    DomainError::validation(
        ValidationKind::WrongGame,
        format!("{} is not available in {kind}", action.name()),
    )
}

fn require_member(game: &GameState, player_id: &str) -> Result<(), DomainError> {
    game.player_name(player_id)
        .map(|_| ())
        .ok_or_else(|| DomainError::player_not_found(player_id))
}

/// Route one action to the matching engine operation.
pub fn apply_action<R: Rng + ?Sized>(
    room: &mut Room,
    player_id: &str,
    action: RoomAction,
    ctx: &mut ActionCtx<'_, R>,
) -> Result<(), DomainError> {
    if !matches!(
        action,
        RoomAction::Join { .. } | RoomAction::JoinAsSpectator { .. }
    ) {
        require_member(&room.game, player_id)?;
    }

    if let RoomAction::SendMessage { text, kind } = &action {
        let name = room.game.player_name(player_id).unwrap_or_default().to_string();
        room.chat_seq += 1;
        chat::post(
            &mut room.chat,
            room.chat_seq,
            player_id,
            &name,
            text,
            *kind,
            ctx.now,
        )?;
        return Ok(());
    }

    let kind = room.game.kind();
    let outcome = match &mut room.game {
        GameState::Bondi(s) => apply_bondi(s, player_id, action, ctx),
        GameState::Digu(s) => apply_digu(s, player_id, action, ctx),
    };
    outcome.map_err(|err| match err {
        Dispatch::Unsupported(action) => wrong_game(&action, kind),
        Dispatch::Failed(err) => err,
    })
}

enum Dispatch {
    /// Action belongs to the other rule set.
    Unsupported(RoomAction),
    Failed(DomainError),
}

impl From<DomainError> for Dispatch {
    fn from(err: DomainError) -> Self {
        Dispatch::Failed(err)
    }
}

fn apply_bondi<R: Rng + ?Sized>(
    s: &mut BondiGameState,
    player_id: &str,
    action: RoomAction,
    ctx: &mut ActionCtx<'_, R>,
) -> Result<(), Dispatch> {
    match action {
        RoomAction::Join { name } => lobby::join(s, BondiPlayer::new(player_id, name))?,
        RoomAction::JoinAsSpectator { name } => {
            lobby::join_as_spectator(s, BondiPlayer::new(player_id, name))
        }
        RoomAction::AddBot => {
            lobby::add_bot(s)?;
        }
        RoomAction::StartGame => lobby::start(s, &mut *ctx.rng, ctx.now)?,
        RoomAction::PlayCard { card } => {
            bondi::process_turn(s, player_id, card)?;
        }
        RoomAction::Rematch => lobby::rematch(s)?,
        other => return Err(Dispatch::Unsupported(other)),
    }
    Ok(())
}

fn apply_digu<R: Rng + ?Sized>(
    s: &mut DiguGameState,
    player_id: &str,
    action: RoomAction,
    ctx: &mut ActionCtx<'_, R>,
) -> Result<(), Dispatch> {
    match action {
        RoomAction::Join { name } => round::join(s, DiguPlayer::new(player_id, name))?,
        RoomAction::StartGame => round::start_game(s, &mut *ctx.rng, ctx.now)?,
        RoomAction::DrawCard { from_discard } => {
            round::draw_card(s, player_id, from_discard, &mut *ctx.rng)?;
        }
        RoomAction::DiscardCard { card } => round::discard_card(s, player_id, card)?,
        RoomAction::DeclareMelds { melds } => {
            round::declare_melds(s, player_id, melds)?;
        }
        RoomAction::Knock => {
            digu::process_knock(s, player_id)?;
        }
        RoomAction::Drop => {
            digu::handle_drop(s, player_id)?;
        }
        RoomAction::InitiateEndGameVote => {
            vote::initiate_vote(s, ctx.now, ctx.config.vote_window)?;
        }
        RoomAction::VoteEndGame { end_game } => {
            vote::cast_vote(s, player_id, end_game)?;
        }
        RoomAction::StartNewRound => round::start_new_round(s, &mut *ctx.rng)?,
        other => return Err(Dispatch::Unsupported(other)),
    }
    Ok(())
}
