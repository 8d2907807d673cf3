//! Prediction sets, result sets, scores, lock status and engine errors.

use crate::models::game::Round;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user's picks: game id -> predicted winner id. Keys are a subset of the 15 game ids.
pub type Predictions = BTreeMap<String, String>;

/// Recorded real-world winners, same shape as [`Predictions`].
pub type ResultSet = BTreeMap<String, String>;

/// Errors raised by the prediction engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// The bracket is locked; predictions are immutable.
    Locked,
    /// The prediction deadline has passed.
    DeadlinePassed,
    /// Locking needs a pick for every game.
    IncompletePicks { picked: usize },
    /// Game id is not one of the bracket's games.
    UnknownGame(String),
    /// Player id is not on the roster.
    UnknownPlayer(String),
    /// Player cannot win this game given the results so far.
    IneligibleWinner { game_id: String, player_id: String },
    /// Persisting predictions failed.
    Sink(String),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::Locked => write!(f, "Bracket is already locked"),
            BracketError::DeadlinePassed => write!(f, "The prediction deadline has passed"),
            BracketError::IncompletePicks { picked } => write!(
                f,
                "All {} games must be picked before locking (picked {})",
                crate::models::TOTAL_GAMES,
                picked
            ),
            BracketError::UnknownGame(id) => write!(f, "Unknown game: {}", id),
            BracketError::UnknownPlayer(id) => write!(f, "Unknown player: {}", id),
            BracketError::IneligibleWinner { game_id, player_id } => {
                write!(f, "{} is not playing in {}", player_id, game_id)
            }
            BracketError::Sink(msg) => write!(f, "Could not save predictions: {}", msg),
        }
    }
}

impl std::error::Error for BracketError {}

/// Per-round and total points for one user.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub round1: u32,
    pub quarterfinal: u32,
    pub semifinal: u32,
    pub final_round: u32,
    pub total: u32,
}

impl Score {
    /// Points for one round.
    pub fn round(&self, round: Round) -> u32 {
        match round {
            Round::Round1 => self.round1,
            Round::Quarterfinal => self.quarterfinal,
            Round::Semifinal => self.semifinal,
            Round::Final => self.final_round,
        }
    }

    /// Add points to a round and to the total.
    pub fn add(&mut self, round: Round, points: u32) {
        match round {
            Round::Round1 => self.round1 += points,
            Round::Quarterfinal => self.quarterfinal += points,
            Round::Semifinal => self.semifinal += points,
            Round::Final => self.final_round += points,
        }
        self.total += points;
    }
}

/// Lock status of a user's bracket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketStatus {
    pub is_locked: bool,
    pub locked_at: Option<DateTime<Utc>>,
}

impl BracketStatus {
    pub fn locked(at: DateTime<Utc>) -> Self {
        Self {
            is_locked: true,
            locked_at: Some(at),
        }
    }
}
