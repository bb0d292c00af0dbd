//! Engine configuration loaded from `CARDROOM_*` environment variables.

use std::env;
use std::str::FromStr;

use time::Duration;

use crate::domain::bondi::BONDI_MAX_PLAYERS;
use crate::domain::digu::DEFAULT_TARGET_SCORE;
use crate::error::AppError;

pub const VOTE_WINDOW_SECS_VAR: &str = "CARDROOM_VOTE_WINDOW_SECS";
pub const BOT_DELAY_MS_VAR: &str = "CARDROOM_BOT_DELAY_MS";
pub const DIGU_TARGET_SCORE_VAR: &str = "CARDROOM_DIGU_TARGET_SCORE";
pub const BONDI_MAX_PLAYERS_VAR: &str = "CARDROOM_BONDI_MAX_PLAYERS";
pub const ROOM_QUEUE_DEPTH_VAR: &str = "CARDROOM_ROOM_QUEUE_DEPTH";
pub const RNG_SEED_VAR: &str = "CARDROOM_RNG_SEED";

/// Tunables shared by every room in a session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long an end-game ballot stays open.
    pub vote_window: Duration,
    /// Simulated thinking time before a bot acts.
    pub bot_delay: Duration,
    pub digu_target_score: u32,
    pub bondi_max_players: usize,
    /// Capacity of each room's action queue.
    pub room_queue_depth: usize,
    /// Seeds room codes and per-room shuffles when set.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vote_window: Duration::seconds(30),
            bot_delay: Duration::milliseconds(1500),
            digu_target_score: DEFAULT_TARGET_SCORE,
            bondi_max_players: BONDI_MAX_PLAYERS,
            room_queue_depth: 64,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by whatever `CARDROOM_*` variables are set.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(secs) = parse_var::<i64, _>(&lookup, VOTE_WINDOW_SECS_VAR)? {
            if secs <= 0 {
                return Err(AppError::config(format!(
                    "{VOTE_WINDOW_SECS_VAR} must be positive"
                )));
            }
            cfg.vote_window = Duration::seconds(secs);
        }
        if let Some(ms) = parse_var::<i64, _>(&lookup, BOT_DELAY_MS_VAR)? {
            if ms < 0 {
                return Err(AppError::config(format!(
                    "{BOT_DELAY_MS_VAR} must not be negative"
                )));
            }
            cfg.bot_delay = Duration::milliseconds(ms);
        }
        if let Some(target) = parse_var(&lookup, DIGU_TARGET_SCORE_VAR)? {
            cfg.digu_target_score = target;
        }
        if let Some(max) = parse_var::<usize, _>(&lookup, BONDI_MAX_PLAYERS_VAR)? {
            if !(2..=52).contains(&max) {
                return Err(AppError::config(format!(
                    "{BONDI_MAX_PLAYERS_VAR} must be between 2 and 52"
                )));
            }
            cfg.bondi_max_players = max;
        }
        if let Some(depth) = parse_var::<usize, _>(&lookup, ROOM_QUEUE_DEPTH_VAR)? {
            if depth == 0 {
                return Err(AppError::config(format!(
                    "{ROOM_QUEUE_DEPTH_VAR} must be at least 1"
                )));
            }
            cfg.room_queue_depth = depth;
        }
        cfg.rng_seed = parse_var(&lookup, RNG_SEED_VAR)?;
        Ok(cfg)
    }

    /// Bot delay as a std duration for tokio timers.
    pub fn bot_delay_std(&self) -> std::time::Duration {
        self.bot_delay.try_into().unwrap_or_default()
    }

    pub fn vote_window_std(&self) -> std::time::Duration {
        self.vote_window.try_into().unwrap_or_default()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| AppError::config(format!("{key} has invalid value {trimmed:?}")))
}
