//! Player roster: the 16 seeded competitors, compiled in.

use serde::Serialize;

/// Unique identifier for a player (slug, e.g. `maya-lindqvist`).
pub type PlayerId = String;

/// A competitor in the bracket. Immutable; the roster never changes at runtime.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: &'static str,
    pub name: &'static str,
    /// Path of the player's photo under the static assets root.
    pub photo: &'static str,
    pub byline: &'static str,
}

/// Seeding order: round 1 game `r1-i` is `PLAYERS[2i]` vs `PLAYERS[2i + 1]`.
pub static PLAYERS: [Player; 16] = [
    Player {
        id: "maya-lindqvist",
        name: "Maya Lindqvist",
        photo: "/photos/maya-lindqvist.jpg",
        byline: "Container queries before they were cool",
    },
    Player {
        id: "theo-okafor",
        name: "Theo Okafor",
        photo: "/photos/theo-okafor.jpg",
        byline: "Writes grid templates in his sleep",
    },
    Player {
        id: "ines-marchetti",
        name: "Ines Marchetti",
        photo: "/photos/ines-marchetti.jpg",
        byline: "Cascade layers, all the way down",
    },
    Player {
        id: "kenji-watanabe",
        name: "Kenji Watanabe",
        photo: "/photos/kenji-watanabe.jpg",
        byline: "Scroll-driven animation wrangler",
    },
    Player {
        id: "priya-raman",
        name: "Priya Raman",
        photo: "/photos/priya-raman.jpg",
        byline: "Logical properties or bust",
    },
    Player {
        id: "lucas-fontaine",
        name: "Lucas Fontaine",
        photo: "/photos/lucas-fontaine.jpg",
        byline: "Has opinions about :has()",
    },
    Player {
        id: "amara-nwosu",
        name: "Amara Nwosu",
        photo: "/photos/amara-nwosu.jpg",
        byline: "Color spaces connoisseur",
    },
    Player {
        id: "felix-brandt",
        name: "Felix Brandt",
        photo: "/photos/felix-brandt.jpg",
        byline: "Subgrid superfan",
    },
    Player {
        id: "sofia-alvarez",
        name: "Sofia Alvarez",
        photo: "/photos/sofia-alvarez.jpg",
        byline: "View transitions in production",
    },
    Player {
        id: "oskar-nilsson",
        name: "Oskar Nilsson",
        photo: "/photos/oskar-nilsson.jpg",
        byline: "Specificity whisperer",
    },
    Player {
        id: "hana-kim",
        name: "Hana Kim",
        photo: "/photos/hana-kim.jpg",
        byline: "Anchor positioning pioneer",
    },
    Player {
        id: "diego-moreira",
        name: "Diego Moreira",
        photo: "/photos/diego-moreira.jpg",
        byline: "Fluid type scales for everyone",
    },
    Player {
        id: "zara-haddad",
        name: "Zara Haddad",
        photo: "/photos/zara-haddad.jpg",
        byline: "Custom properties maximalist",
    },
    Player {
        id: "noah-becker",
        name: "Noah Becker",
        photo: "/photos/noah-becker.jpg",
        byline: "Flexbox gap appreciator",
    },
    Player {
        id: "leila-sato",
        name: "Leila Sato",
        photo: "/photos/leila-sato.jpg",
        byline: "Nesting natively since day one",
    },
    Player {
        id: "marcus-reid",
        name: "Marcus Reid",
        photo: "/photos/marcus-reid.jpg",
        byline: "Print stylesheets are not dead",
    },
];

/// Look up a player by id.
pub fn find_player(id: &str) -> Option<&'static Player> {
    PLAYERS.iter().find(|p| p.id == id)
}

/// True if `id` names a player on the roster.
pub fn is_known_player(id: &str) -> bool {
    find_player(id).is_some()
}
