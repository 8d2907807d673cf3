//! Pickable players: the two candidates a user may choose between for a game.

use crate::models::{find_game, Predictions, Slot};

/// Players eligible for `game_id`'s two slots, in bracket order.
///
/// Round 1 slots are seeded and ignore `predictions`. Later slots are the
/// predicted winners of the feeder games, verbatim; a missing feeder pick
/// leaves that slot empty. Unknown game ids give `(None, None)`.
pub fn pickable_players<'a>(
    game_id: &str,
    predictions: &'a Predictions,
) -> (Option<&'a str>, Option<&'a str>) {
    match find_game(game_id) {
        Some(game) => (
            resolve_slot(game.player1, predictions),
            resolve_slot(game.player2, predictions),
        ),
        None => (None, None),
    }
}

/// True if `player_id` fills one of `game_id`'s slots.
pub fn is_pickable(game_id: &str, player_id: &str, predictions: &Predictions) -> bool {
    let (p1, p2) = pickable_players(game_id, predictions);
    p1 == Some(player_id) || p2 == Some(player_id)
}

fn resolve_slot(slot: Slot, predictions: &Predictions) -> Option<&str> {
    match slot {
        Slot::Seed(player_id) => Some(player_id),
        Slot::WinnerOf(feeder) => predictions.get(feeder).map(String::as_str),
    }
}
