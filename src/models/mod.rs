//! Data structures for the bracket: players, games, predictions, users.

mod game;
mod player;
mod prediction;
mod user;

pub use game::{find_game, is_known_game, Game, GameId, Round, Slot, BRACKET, TOTAL_GAMES};
pub use player::{find_player, is_known_player, Player, PlayerId, PLAYERS};
pub use prediction::{BracketError, BracketStatus, Predictions, ResultSet, Score};
pub use user::{LeaderboardEntry, User, UserId};
