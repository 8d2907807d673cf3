//! Bracket business logic: pickable players, cascade clears, editing, scoring, simulation.

mod cascade;
mod editor;
mod pickable;
mod scoring;
mod simulate;

pub use cascade::{cascade_clears, remove_pick, set_pick};
pub use editor::{BracketEditor, EditorState, PredictionSink};
pub use pickable::{is_pickable, pickable_players};
pub use scoring::{calculate_score, rank_leaderboard};
pub use simulate::simulate_results;
