//! Tournament simulation: mock result sets for previewing a stage of the bracket.

use crate::logic::pickable::pickable_players;
use crate::models::{ResultSet, Round};
use rand::Rng;

/// Results for every game up to and including `through`, each winner drawn
/// uniformly from the game's two players given the earlier mock results.
pub fn simulate_results<R: Rng + ?Sized>(through: Round, rng: &mut R) -> ResultSet {
    let mut results = ResultSet::new();
    let games = Round::ALL
        .iter()
        .filter(|r| **r <= through)
        .flat_map(|r| r.games());
    for game in games {
        let winner = match pickable_players(game.id, &results) {
            (Some(p1), Some(p2)) => {
                if rng.gen_bool(0.5) {
                    p1.to_string()
                } else {
                    p2.to_string()
                }
            }
            // Earlier rounds are filled first, so feeders always have winners.
            _ => continue,
        };
        results.insert(game.id.to_string(), winner);
    }
    results
}
