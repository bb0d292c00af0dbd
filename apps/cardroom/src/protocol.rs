//! Wire messages for a transport layer sitting in front of [`SessionStore`].
//!
//! The engine never talks to connections; a transport decodes a
//! [`ClientMsg`], hands it to [`handle_client_msg`], then broadcasts a
//! `State` reply to the room or sends an `Error` reply to the sender only.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, GameKind};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::session::{ChatKind, RoomAction, RoomSnapshot, SessionStore};

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    CreateRoom {
        game: GameKind,
        player_id: String,
        player_name: String,
    },
    JoinRoom {
        room_code: String,
        player_id: String,
        player_name: String,
    },
    JoinAsSpectator {
        room_code: String,
        player_id: String,
        player_name: String,
    },
    AddBot {
        room_code: String,
        player_id: String,
    },
    StartGame {
        room_code: String,
        player_id: String,
    },
    PlayCard {
        room_code: String,
        player_id: String,
        card: Card,
    },
    DrawCard {
        room_code: String,
        player_id: String,
        from_discard: bool,
    },
    DiscardCard {
        room_code: String,
        player_id: String,
        card: Card,
    },
    DeclareMelds {
        room_code: String,
        player_id: String,
        melds: Vec<Vec<Card>>,
    },
    Knock {
        room_code: String,
        player_id: String,
    },
    DropPlayer {
        room_code: String,
        player_id: String,
    },
    InitiateEndGameVote {
        room_code: String,
        player_id: String,
    },
    VoteEndGame {
        room_code: String,
        player_id: String,
        vote: bool,
    },
    StartNewRound {
        room_code: String,
        player_id: String,
    },
    Rematch {
        room_code: String,
        player_id: String,
    },
    SendMessage {
        room_code: String,
        player_id: String,
        message: String,
        #[serde(default = "default_chat_kind")]
        kind: ChatKind,
    },
    GetRoom {
        room_code: String,
    },
    DeleteRoom {
        room_code: String,
    },
}

fn default_chat_kind() -> ChatKind {
    ChatKind::Text
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    State { room: RoomSnapshot },
    RoomDeleted { room_code: String },
    Error { code: ErrorCode, message: String },
}

impl From<AppError> for ServerMsg {
    fn from(err: AppError) -> Self {
        ServerMsg::Error {
            code: err.code(),
            message: err.detail().to_string(),
        }
    }
}

/// Routed form of a player message: who acts where, doing what.
enum Routed {
    Create {
        game: GameKind,
        player_id: String,
        player_name: String,
    },
    Act {
        room_code: String,
        player_id: String,
        action: RoomAction,
    },
    Get {
        room_code: String,
    },
    Delete {
        room_code: String,
    },
}

impl From<ClientMsg> for Routed {
    fn from(msg: ClientMsg) -> Self {
        let act = |room_code, player_id, action| Routed::Act {
            room_code,
            player_id,
            action,
        };
        match msg {
            ClientMsg::CreateRoom {
                game,
                player_id,
                player_name,
            } => Routed::Create {
                game,
                player_id,
                player_name,
            },
            ClientMsg::JoinRoom {
                room_code,
                player_id,
                player_name,
            } => act(room_code, player_id, RoomAction::Join { name: player_name }),
            ClientMsg::JoinAsSpectator {
                room_code,
                player_id,
                player_name,
            } => act(
                room_code,
                player_id,
                RoomAction::JoinAsSpectator { name: player_name },
            ),
            ClientMsg::AddBot {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::AddBot),
            ClientMsg::StartGame {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::StartGame),
            ClientMsg::PlayCard {
                room_code,
                player_id,
                card,
            } => act(room_code, player_id, RoomAction::PlayCard { card }),
            ClientMsg::DrawCard {
                room_code,
                player_id,
                from_discard,
            } => act(room_code, player_id, RoomAction::DrawCard { from_discard }),
            ClientMsg::DiscardCard {
                room_code,
                player_id,
                card,
            } => act(room_code, player_id, RoomAction::DiscardCard { card }),
            ClientMsg::DeclareMelds {
                room_code,
                player_id,
                melds,
            } => act(room_code, player_id, RoomAction::DeclareMelds { melds }),
            ClientMsg::Knock {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::Knock),
            ClientMsg::DropPlayer {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::Drop),
            ClientMsg::InitiateEndGameVote {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::InitiateEndGameVote),
            ClientMsg::VoteEndGame {
                room_code,
                player_id,
                vote,
            } => act(
                room_code,
                player_id,
                RoomAction::VoteEndGame { end_game: vote },
            ),
            ClientMsg::StartNewRound {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::StartNewRound),
            ClientMsg::Rematch {
                room_code,
                player_id,
            } => act(room_code, player_id, RoomAction::Rematch),
            ClientMsg::SendMessage {
                room_code,
                player_id,
                message,
                kind,
            } => act(
                room_code,
                player_id,
                RoomAction::SendMessage {
                    text: message,
                    kind,
                },
            ),
            ClientMsg::GetRoom { room_code } => Routed::Get { room_code },
            ClientMsg::DeleteRoom { room_code } => Routed::Delete { room_code },
        }
    }
}

/// Run one client message against the store and build the reply.
pub async fn handle_client_msg(store: &SessionStore, msg: ClientMsg) -> ServerMsg {
    let result = match Routed::from(msg) {
        Routed::Create {
            game,
            player_id,
            player_name,
        } => store.create_room(game, &player_id, &player_name).await,
        Routed::Act {
            room_code,
            player_id,
            action,
        } => store.act(&room_code, &player_id, action).await,
        Routed::Get { room_code } => store.get_room(&room_code).await,
        Routed::Delete { room_code } => {
            return match store.delete_room(&room_code) {
                Ok(()) => ServerMsg::RoomDeleted { room_code },
                Err(err) => err.into(),
            };
        }
    };
    match result {
        Ok(room) => ServerMsg::State { room },
        Err(err) => err.into(),
    }
}
