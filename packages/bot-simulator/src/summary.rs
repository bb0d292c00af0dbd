//! Aggregate statistics over a batch of simulated games.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::simulator::GameOutcome;

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatStats {
    pub games: u32,
    pub wins: u32,
    pub last_places: u32,
    pub avg_placement: f64,
    pub avg_total_score: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub game: String,
    pub games_requested: u32,
    pub games_finished: u32,
    pub games_stalled: u32,
    pub errors: u32,
    pub avg_turns: f64,
    pub avg_rounds: f64,
    pub elapsed_ms: f64,
    /// Keyed by bot player id.
    pub seats: BTreeMap<String, SeatStats>,
}

pub fn summarize(
    game: &str,
    requested: u32,
    outcomes: &[GameOutcome],
    errors: u32,
    elapsed_ms: f64,
) -> Summary {
    let mut seats: BTreeMap<String, SeatStats> = BTreeMap::new();
    let mut placement_sums: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    let mut finished = 0u32;
    let mut rounds = 0u64;

    for record in outcomes.iter().filter_map(|o| o.record.as_ref()) {
        finished += 1;
        rounds += u64::from(record.rounds);
        let last = record.players.len();
        for p in &record.players {
            let seat = seats.entry(p.id.clone()).or_default();
            seat.games += 1;
            if p.placement == 1 {
                seat.wins += 1;
            }
            if p.placement == last {
                seat.last_places += 1;
            }
            let sums = placement_sums.entry(p.id.clone()).or_default();
            sums.0 += p.placement as u64;
            sums.1 += u64::from(p.total_score);
        }
    }
    for (id, seat) in seats.iter_mut() {
        if let Some(&(placements, scores)) = placement_sums.get(id) {
            let games = f64::from(seat.games.max(1));
            seat.avg_placement = placements as f64 / games;
            seat.avg_total_score = scores as f64 / games;
        }
    }

    let turns: u64 = outcomes.iter().map(|o| u64::from(o.turns)).sum();
    Summary {
        game: game.to_string(),
        games_requested: requested,
        games_finished: finished,
        games_stalled: outcomes.iter().filter(|o| o.stalled).count() as u32,
        errors,
        avg_turns: average(turns, outcomes.len() as u64),
        avg_rounds: average(rounds, u64::from(finished)),
        elapsed_ms,
        seats,
    }
}

fn average(sum: u64, n: u64) -> f64 {
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}
