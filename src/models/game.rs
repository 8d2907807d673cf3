//! Game, Round and the static bracket table (15 games, 4 rounds).

use serde::{Deserialize, Serialize};

/// Unique identifier for a game (`r1-0..r1-7`, `qf-0..qf-3`, `sf-0..sf-1`, `final`).
pub type GameId = String;

/// Total number of games in the bracket.
pub const TOTAL_GAMES: usize = 15;

/// Round of the bracket a game belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Round1,
    Quarterfinal,
    Semifinal,
    Final,
}

impl Round {
    pub const ALL: [Round; 4] = [
        Round::Round1,
        Round::Quarterfinal,
        Round::Semifinal,
        Round::Final,
    ];

    /// Points awarded for a correct pick in this round.
    pub fn points(self) -> u32 {
        match self {
            Round::Round1 => 10,
            Round::Quarterfinal => 20,
            Round::Semifinal => 40,
            Round::Final => 80,
        }
    }

    /// Games of this round, in bracket order.
    pub fn games(self) -> impl Iterator<Item = &'static Game> {
        BRACKET.iter().filter(move |g| g.round == self)
    }
}

/// Where a game's slot gets its player from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Slot {
    /// Fixed seeded player (round 1 only).
    Seed(&'static str),
    /// Winner of an earlier game.
    WinnerOf(&'static str),
}

/// One node of the bracket tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Game {
    pub id: &'static str,
    pub round: Round,
    pub player1: Slot,
    pub player2: Slot,
    /// The game the winner advances to; `None` for the final.
    pub next: Option<&'static str>,
}

const fn seeded(id: &'static str, p1: &'static str, p2: &'static str, next: &'static str) -> Game {
    Game {
        id,
        round: Round::Round1,
        player1: Slot::Seed(p1),
        player2: Slot::Seed(p2),
        next: Some(next),
    }
}

const fn fed(
    id: &'static str,
    round: Round,
    from1: &'static str,
    from2: &'static str,
    next: Option<&'static str>,
) -> Game {
    Game {
        id,
        round,
        player1: Slot::WinnerOf(from1),
        player2: Slot::WinnerOf(from2),
        next,
    }
}

/// The whole bracket. Seeds follow `PLAYERS` order; slot 1 of every later
/// game is fed by the lower-numbered feeder.
pub static BRACKET: [Game; TOTAL_GAMES] = [
    seeded("r1-0", "maya-lindqvist", "theo-okafor", "qf-0"),
    seeded("r1-1", "ines-marchetti", "kenji-watanabe", "qf-0"),
    seeded("r1-2", "priya-raman", "lucas-fontaine", "qf-1"),
    seeded("r1-3", "amara-nwosu", "felix-brandt", "qf-1"),
    seeded("r1-4", "sofia-alvarez", "oskar-nilsson", "qf-2"),
    seeded("r1-5", "hana-kim", "diego-moreira", "qf-2"),
    seeded("r1-6", "zara-haddad", "noah-becker", "qf-3"),
    seeded("r1-7", "leila-sato", "marcus-reid", "qf-3"),
    fed("qf-0", Round::Quarterfinal, "r1-0", "r1-1", Some("sf-0")),
    fed("qf-1", Round::Quarterfinal, "r1-2", "r1-3", Some("sf-0")),
    fed("qf-2", Round::Quarterfinal, "r1-4", "r1-5", Some("sf-1")),
    fed("qf-3", Round::Quarterfinal, "r1-6", "r1-7", Some("sf-1")),
    fed("sf-0", Round::Semifinal, "qf-0", "qf-1", Some("final")),
    fed("sf-1", Round::Semifinal, "qf-2", "qf-3", Some("final")),
    fed("final", Round::Final, "sf-0", "sf-1", None),
];

/// Look up a game by id.
pub fn find_game(id: &str) -> Option<&'static Game> {
    BRACKET.iter().find(|g| g.id == id)
}

/// True if `id` is one of the 15 bracket game ids.
pub fn is_known_game(id: &str) -> bool {
    find_game(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::{is_known_player, PLAYERS};

    #[test]
    fn round_sizes() {
        let sizes: Vec<usize> = Round::ALL.iter().map(|r| r.games().count()).collect();
        assert_eq!(sizes, vec![8, 4, 2, 1]);
    }

    #[test]
    fn seeds_follow_roster_order() {
        for (i, game) in Round::Round1.games().enumerate() {
            assert_eq!(game.player1, Slot::Seed(PLAYERS[2 * i].id));
            assert_eq!(game.player2, Slot::Seed(PLAYERS[2 * i + 1].id));
        }
    }

    #[test]
    fn every_edge_points_at_a_known_game() {
        for game in &BRACKET {
            if let Some(next) = game.next {
                let next_game = find_game(next).unwrap();
                let feeds = [next_game.player1, next_game.player2];
                assert!(feeds.contains(&Slot::WinnerOf(game.id)), "{} -> {}", game.id, next);
            }
            for slot in [game.player1, game.player2] {
                match slot {
                    Slot::Seed(p) => assert!(is_known_player(p)),
                    Slot::WinnerOf(g) => assert_eq!(find_game(g).unwrap().next, Some(game.id)),
                }
            }
        }
    }

    #[test]
    fn only_final_has_no_next() {
        let terminal: Vec<_> = BRACKET.iter().filter(|g| g.next.is_none()).map(|g| g.id).collect();
        assert_eq!(terminal, vec!["final"]);
    }
}
