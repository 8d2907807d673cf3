//! User accounts and the leaderboard view of them.

use crate::models::prediction::Score;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user.
pub type UserId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique, compared case-insensitively.
    pub username: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id.
    pub fn new(username: impl Into<String>, name: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            name: name.into(),
            is_admin,
            created_at: Utc::now(),
        }
    }
}

/// One row of the leaderboard.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// Competition rank: tied totals share a rank, the next rank skips.
    pub rank: u32,
    pub user_id: UserId,
    pub username: String,
    pub name: String,
    pub score: Score,
}
