//! Bot-only games played straight against the pure engines.
//!
//! No room worker, no timers: every seat is a bot and turns run back to
//! back. The 52-card invariant is checked after every turn.

use cardroom::ai;
use cardroom::domain::bondi::{self, lobby, BondiGameState, BondiPlayer, BondiStatus};
use cardroom::domain::digu::{round, DiguGameState, DiguPlayer, DiguStatus};
use cardroom::domain::{bot_name, GameKind};
use cardroom::session::{FinishedGame, GameState};
use cardroom::AppError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

/// Bondi games that keep bouncing cards between hands are cut off here.
const MAX_BONDI_TURNS: u32 = 5_000;
/// Digu games stop after this many rounds even without a winner.
const MAX_DIGU_ROUNDS: u32 = 200;
/// Per-round turn cap; a round this long means nobody will knock.
const MAX_DIGU_TURNS_PER_ROUND: u32 = 2_000;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub game_no: u32,
    pub seed: u64,
    pub turns: u32,
    /// Hit a turn or round cap before finishing.
    pub stalled: bool,
    pub record: Option<FinishedGame>,
}

pub struct Simulator {
    kind: GameKind,
    players: usize,
}

impl Simulator {
    pub fn new(kind: GameKind, players: usize) -> Self {
        Self { kind, players }
    }

    pub fn simulate_game(&self, game_no: u32, seed: u64) -> Result<GameOutcome, AppError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let started = OffsetDateTime::now_utc();
        let (game, turns, stalled) = match self.kind {
            GameKind::Bondi => {
                let (state, turns, stalled) = self.play_bondi(game_no, &mut rng, started)?;
                (GameState::Bondi(state), turns, stalled)
            }
            GameKind::Digu => {
                let (state, turns, stalled) = play_digu(game_no, &mut rng, started)?;
                (GameState::Digu(state), turns, stalled)
            }
        };
        Ok(GameOutcome {
            game_no,
            seed,
            turns,
            stalled,
            record: FinishedGame::from_game(&game, OffsetDateTime::now_utc()),
        })
    }

    fn play_bondi(
        &self,
        game_no: u32,
        rng: &mut ChaCha8Rng,
        now: OffsetDateTime,
    ) -> Result<(BondiGameState, u32, bool), AppError> {
        let mut state = BondiGameState::new(
            format!("SIM{game_no}"),
            BondiPlayer::bot("bot-0", bot_name(0)),
        );
        for _ in 1..self.players {
            lobby::add_bot(&mut state)?;
        }
        lobby::start(&mut state, rng, now)?;

        let mut turns = 0;
        while state.status == BondiStatus::Playing {
            if turns >= MAX_BONDI_TURNS {
                return Ok((state, turns, true));
            }
            let Some(bot_id) = state.current_player().map(|p| p.id.clone()) else {
                return Err(AppError::internal("No player to move"));
            };
            let card = ai::choose_card(&state, &bot_id)?;
            let result = bondi::process_turn(&mut state, &bot_id, card)?;
            state.verify()?;
            turns += 1;
            debug!(game_no, turn = turns, player_id = %bot_id, %card, resolution = ?result.resolution, "Bondi turn");
        }
        Ok((state, turns, false))
    }
}

fn play_digu(
    game_no: u32,
    rng: &mut ChaCha8Rng,
    now: OffsetDateTime,
) -> Result<(DiguGameState, u32, bool), AppError> {
    let mut state = DiguGameState::new(
        format!("SIM{game_no}"),
        DiguPlayer::bot("bot-0", bot_name(0)),
    );
    round::start_game(&mut state, rng, now)?;

    let mut turns = 0;
    let mut round_turns = 0;
    loop {
        match state.status {
            DiguStatus::Finished => return Ok((state, turns, false)),
            DiguStatus::RoundEnd => {
                if state.rounds_played >= MAX_DIGU_ROUNDS {
                    return Ok((state, turns, true));
                }
                round::start_new_round(&mut state, rng)?;
                round_turns = 0;
            }
            DiguStatus::Playing => {
                if round_turns >= MAX_DIGU_TURNS_PER_ROUND {
                    return Ok((state, turns, true));
                }
                let Some(bot_id) = state.current_player().map(|p| p.id.clone()) else {
                    return Err(AppError::internal("No player to move"));
                };
                let turn = ai::play_turn(&mut state, &bot_id, rng)?;
                state.verify()?;
                turns += 1;
                round_turns += 1;
                debug!(
                    game_no,
                    turn = turns,
                    player_id = %bot_id,
                    discarded = %turn.discarded,
                    knocked = turn.knock.is_some(),
                    "Digu turn"
                );
            }
            DiguStatus::Waiting => return Err(AppError::internal("Game never started")),
        }
    }
}
