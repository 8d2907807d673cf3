//! Scoring: round-weighted points and leaderboard ranking.

use crate::models::{find_game, LeaderboardEntry, Predictions, ResultSet, Score, User};

/// Score one prediction set against the recorded results.
///
/// A correct pick earns the round's points (10/20/40/80). Games without a
/// result, wrong picks and unknown game ids earn nothing.
pub fn calculate_score(predictions: &Predictions, results: &ResultSet) -> Score {
    let mut score = Score::default();
    for (game_id, predicted) in predictions {
        let Some(game) = find_game(game_id) else {
            continue;
        };
        if results.get(game_id) == Some(predicted) {
            score.add(game.round, game.round.points());
        }
    }
    score
}

/// Order users by total (desc) then username, assigning competition ranks.
pub fn rank_leaderboard(mut rows: Vec<(User, Score)>) -> Vec<LeaderboardEntry> {
    rows.sort_by(|(ua, sa), (ub, sb)| {
        sb.total
            .cmp(&sa.total)
            .then_with(|| ua.username.to_lowercase().cmp(&ub.username.to_lowercase()))
    });
    let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(rows.len());
    for (i, (user, score)) in rows.into_iter().enumerate() {
        let rank = match entries.last() {
            Some(prev) if prev.score.total == score.total => prev.rank,
            _ => i as u32 + 1,
        };
        entries.push(LeaderboardEntry {
            rank,
            user_id: user.id,
            username: user.username,
            name: user.name,
            score,
        });
    }
    entries
}
