//! One task per room. Commands arrive over an mpsc queue and are applied
//! strictly in order; timers re-enter through the same queue.

use std::sync::Arc;

use rand_chacha::ChaCha8Rng;
use time::OffsetDateTime;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::history::{FinishedGame, HistorySink};
use super::room::{apply_action, ActionCtx, GameState, Room, RoomAction, RoomSnapshot};
use crate::ai::{self, AiError};
use crate::config::EngineConfig;
use crate::domain::bondi;
use crate::domain::digu::vote;
use crate::domain::PlayerId;
use crate::error::AppError;

pub(crate) type Reply<T> = oneshot::Sender<Result<T, AppError>>;

#[derive(Debug)]
pub(crate) enum RoomCommand {
    Act {
        player_id: PlayerId,
        action: RoomAction,
        reply: Reply<RoomSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
    Timer(TimerEvent),
}

/// Synthetic actions produced by room timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerEvent {
    /// `seq` must still match the worker's current bot turn.
    BotTurn { seq: u64 },
    /// Fires once the ballot with this deadline has run its course.
    VoteDeadline { deadline: OffsetDateTime },
}

pub(crate) struct RoomWorker {
    room: Room,
    rng: ChaCha8Rng,
    config: Arc<EngineConfig>,
    history: Arc<dyn HistorySink>,
    rx: mpsc::Receiver<RoomCommand>,
    timer_tx: mpsc::WeakSender<RoomCommand>,
    updates: broadcast::Sender<RoomSnapshot>,
    /// Cancelled when the room is deleted; every timer token is a child.
    shutdown: CancellationToken,
    bot_timer: Option<CancellationToken>,
    bot_seq: u64,
    vote_timer: Option<(OffsetDateTime, CancellationToken)>,
}

impl RoomWorker {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        room: Room,
        rng: ChaCha8Rng,
        config: Arc<EngineConfig>,
        history: Arc<dyn HistorySink>,
        rx: mpsc::Receiver<RoomCommand>,
        timer_tx: mpsc::WeakSender<RoomCommand>,
        updates: broadcast::Sender<RoomSnapshot>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            room,
            rng,
            config,
            history,
            rx,
            timer_tx,
            updates,
            shutdown,
            bot_timer: None,
            bot_seq: 0,
            vote_timer: None,
        }
    }

    pub(crate) async fn run(mut self) {
        let room_code = self.room.room_code().to_string();
        debug!(room_code = %room_code, "Room worker started");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
            }
        }
        // Stops any timer still pending.
        self.shutdown.cancel();
        info!(room_code = %room_code, "Room closed");
    }

    fn handle(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Act {
                player_id,
                action,
                reply,
            } => {
                let name = action.name();
                let result = self.act(&player_id, action).map(|()| self.room.clone());
                if let Err(err) = &result {
                    debug!(
                        room_code = %self.room.room_code(),
                        player_id = %player_id,
                        action = name,
                        code = %err.code(),
                        detail = err.detail(),
                        "Action rejected"
                    );
                }
                let _ = reply.send(result);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.room.clone());
            }
            RoomCommand::Timer(event) => self.on_timer(event),
        }
    }

    fn act(&mut self, player_id: &str, action: RoomAction) -> Result<(), AppError> {
        let name = action.name();
        let config = Arc::clone(&self.config);
        self.commit(name, |room, rng, now| {
            let mut ctx = ActionCtx {
                rng,
                now,
                config: &config,
            };
            apply_action(room, player_id, action, &mut ctx).map_err(AppError::from)
        })
    }

    /// Apply `f` to a copy of the room, check invariants, then swap it in.
    fn commit<F>(&mut self, action: &'static str, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Room, &mut ChaCha8Rng, OffsetDateTime) -> Result<(), AppError>,
    {
        let now = OffsetDateTime::now_utc();
        let mut next = self.room.clone();
        f(&mut next, &mut self.rng, now)?;
        if let Err(err) = next.game.verify() {
            error!(
                room_code = %self.room.room_code(),
                action,
                error = %err,
                "Refusing mutation that breaks room invariants"
            );
            return Err(err.into());
        }

        let was_finished = self.room.game.is_finished();
        self.room = next;
        if !was_finished {
            if let Some(record) = FinishedGame::from_game(&self.room.game, now) {
                self.notify_history(record);
            }
        }
        self.sync_vote_timer();
        self.schedule_bot();
        let _ = self.updates.send(self.room.clone());
        Ok(())
    }

    fn notify_history(&self, record: FinishedGame) {
        let sink = Arc::clone(&self.history);
        tokio::spawn(async move {
            let room_code = record.room_code.clone();
            if let Err(err) = sink.record(record).await {
                warn!(room_code = %room_code, error = %err, "Failed to record finished game");
            }
        });
    }

    fn spawn_timer(&self, delay: std::time::Duration, token: CancellationToken, event: TimerEvent) {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(tx) = tx.upgrade() {
                        let _ = tx.send(RoomCommand::Timer(event)).await;
                    }
                }
            }
        });
    }

    fn schedule_bot(&mut self) {
        if let Some(token) = self.bot_timer.take() {
            token.cancel();
        }
        if self.room.game.bot_to_move().is_none() {
            return;
        }
        self.bot_seq += 1;
        let token = self.shutdown.child_token();
        self.spawn_timer(
            self.config.bot_delay_std(),
            token.clone(),
            TimerEvent::BotTurn { seq: self.bot_seq },
        );
        self.bot_timer = Some(token);
    }

    /// Keep exactly one deadline timer for the open ballot, none otherwise.
    fn sync_vote_timer(&mut self) {
        let wanted = self.room.game.vote_deadline();
        let current = self.vote_timer.as_ref().map(|(d, _)| *d);
        if wanted == current {
            return;
        }
        if let Some((_, token)) = self.vote_timer.take() {
            debug!(room_code = %self.room.room_code(), "Vote timer cancelled");
            token.cancel();
        }
        if let Some(deadline) = wanted {
            let token = self.shutdown.child_token();
            let delay = (deadline - OffsetDateTime::now_utc())
                .try_into()
                .unwrap_or(std::time::Duration::ZERO);
            self.spawn_timer(delay, token.clone(), TimerEvent::VoteDeadline { deadline });
            self.vote_timer = Some((deadline, token));
        }
    }

    fn on_timer(&mut self, event: TimerEvent) {
        let room_code = self.room.room_code().to_string();
        let result = match event {
            TimerEvent::BotTurn { seq } => {
                if seq != self.bot_seq {
                    return;
                }
                self.bot_timer = None;
                self.play_bot_turn()
            }
            TimerEvent::VoteDeadline { deadline } => {
                if self.vote_timer.as_ref().map(|(d, _)| *d) != Some(deadline) {
                    return;
                }
                self.vote_timer = None;
                debug!(room_code = %room_code, "Vote deadline reached");
                self.commit("vote_deadline", |room, _, _| {
                    if let GameState::Digu(s) = &mut room.game {
                        vote::on_vote_deadline(s, deadline);
                    }
                    Ok(())
                })
            }
        };
        if let Err(err) = result {
            warn!(room_code = %room_code, ?event, error = %err, "Timer action failed");
        }
    }

    fn play_bot_turn(&mut self) -> Result<(), AppError> {
        let Some(bot_id) = self.room.game.bot_to_move() else {
            return Ok(());
        };
        debug!(room_code = %self.room.room_code(), player_id = %bot_id, "Bot taking turn");
        self.commit("bot_turn", |room, rng, _| {
            bot_move(&mut room.game, &bot_id, rng).map_err(AppError::from)
        })
    }
}

fn bot_move(game: &mut GameState, bot_id: &str, rng: &mut ChaCha8Rng) -> Result<(), AiError> {
    match game {
        GameState::Bondi(s) => {
            let card = ai::choose_card(s, bot_id)?;
            bondi::process_turn(s, bot_id, card)?;
        }
        GameState::Digu(s) => {
            ai::play_turn(s, bot_id, rng)?;
        }
    }
    Ok(())
}
