//! March Mad CSS bracket predictions: library with models, bracket logic, storage and the HTTP API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{Config, ConfigError};
pub use logic::{
    calculate_score, cascade_clears, is_pickable, pickable_players, rank_leaderboard, remove_pick,
    set_pick, simulate_results, BracketEditor, EditorState, PredictionSink,
};
pub use models::{
    find_game, find_player, BracketError, BracketStatus, Game, GameId, LeaderboardEntry, Player,
    PlayerId, Predictions, ResultSet, Round, Score, Slot, User, UserId, BRACKET, PLAYERS,
    TOTAL_GAMES,
};
pub use store::{Store, StoreError, StoredBracket};
