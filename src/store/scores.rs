//! `user_score`: cached scores, rebuilt wholesale by an admin batch.

use crate::logic::calculate_score;
use crate::models::{Score, User, UserId};
use crate::store::{predictions, results, StoreError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

fn score_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<Score> {
    Ok(Score {
        round1: row.get(first)?,
        quarterfinal: row.get(first + 1)?,
        semifinal: row.get(first + 2)?,
        final_round: row.get(first + 3)?,
        total: row.get(first + 4)?,
    })
}

/// Recompute every user's score from stored picks and results in one
/// transaction. Returns the number of users scored.
pub fn recalculate_all(conn: &mut Connection) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    let results = results::load(&tx)?;
    let all = predictions::load_all(&tx)?;
    let now = Utc::now();
    {
        let mut upsert = tx.prepare(
            "INSERT INTO user_score
                (user_id, round1_score, round2_score, round3_score, round4_score, total_score, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(user_id) DO UPDATE SET
                round1_score = excluded.round1_score,
                round2_score = excluded.round2_score,
                round3_score = excluded.round3_score,
                round4_score = excluded.round4_score,
                total_score = excluded.total_score,
                updated_at = excluded.updated_at",
        )?;
        for (user_id, picks) in &all {
            let s = calculate_score(picks, &results);
            upsert.execute(params![
                user_id,
                s.round1,
                s.quarterfinal,
                s.semifinal,
                s.final_round,
                s.total,
                now
            ])?;
        }
    }
    tx.commit()?;
    Ok(all.len())
}

/// Cached score of one user, if scored yet.
pub fn get(conn: &Connection, user_id: UserId) -> Result<Option<Score>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT round1_score, round2_score, round3_score, round4_score, total_score
             FROM user_score WHERE user_id = ?1",
            [user_id],
            |row| score_from_row(row, 0),
        )
        .optional()?)
}

/// Every scored user with their cached score, unordered.
pub fn leaderboard_rows(conn: &Connection) -> Result<Vec<(User, Score)>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.name, u.is_admin, u.created_at,
                s.round1_score, s.round2_score, s.round3_score, s.round4_score, s.total_score
         FROM user_score s JOIN user u ON u.id = s.user_id",
    )?;
    let rows = stmt.query_map([], |row| {
        let user = User {
            id: row.get(0)?,
            username: row.get(1)?,
            name: row.get(2)?,
            is_admin: row.get(3)?,
            created_at: row.get(4)?,
        };
        Ok((user, score_from_row(row, 5)?))
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
