//! Cascade clears: dropping downstream picks that relied on a replaced pick.

use crate::models::{find_game, GameId, Predictions};

/// Games whose pick must be cleared when `game_id`'s pick changes away from `old_player_id`.
///
/// Walks the single forward edge (r1 -> qf -> sf -> final) while the next
/// game's pick is still `old_player_id`. Result is ordered upstream first.
pub fn cascade_clears(game_id: &str, old_player_id: &str, predictions: &Predictions) -> Vec<GameId> {
    let mut cleared = Vec::new();
    let mut current = find_game(game_id);
    while let Some(next) = current.and_then(|g| g.next).and_then(find_game) {
        if predictions.get(next.id).map(String::as_str) != Some(old_player_id) {
            break;
        }
        cleared.push(next.id.to_string());
        current = Some(next);
    }
    cleared
}

/// Set a pick, clearing downstream picks that depended on the replaced one.
/// Returns the cleared game ids.
pub fn set_pick(predictions: &mut Predictions, game_id: &str, player_id: &str) -> Vec<GameId> {
    let cleared = match predictions.get(game_id) {
        Some(old) if old != player_id => cascade_clears(game_id, old, predictions),
        _ => Vec::new(),
    };
    for id in &cleared {
        predictions.remove(id);
    }
    predictions.insert(game_id.to_string(), player_id.to_string());
    cleared
}

/// Remove a pick and everything downstream that depended on it.
/// Returns the cleared game ids (not including `game_id` itself).
pub fn remove_pick(predictions: &mut Predictions, game_id: &str) -> Vec<GameId> {
    let Some(old) = predictions.remove(game_id) else {
        return Vec::new();
    };
    let cleared = cascade_clears(game_id, &old, predictions);
    for id in &cleared {
        predictions.remove(id);
    }
    cleared
}
