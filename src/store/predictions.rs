//! `user_prediction` and `user_bracket_status`: picks and the one-way lock.

use crate::logic::PredictionSink;
use crate::models::{BracketError, BracketStatus, Predictions, UserId, TOTAL_GAMES};
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// A user's stored picks.
pub fn load(conn: &Connection, user_id: UserId) -> Result<Predictions, StoreError> {
    let mut stmt =
        conn.prepare("SELECT game_id, predicted_winner_id FROM user_prediction WHERE user_id = ?1")?;
    let rows = stmt.query_map([user_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    Ok(rows.collect::<Result<Predictions, _>>()?)
}

/// Every user's stored picks, for batch scoring.
pub fn load_all(conn: &Connection) -> Result<Vec<(UserId, Predictions)>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, p.game_id, p.predicted_winner_id
         FROM user u LEFT JOIN user_prediction p ON p.user_id = u.id
         ORDER BY u.id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out: Vec<(UserId, Predictions)> = Vec::new();
    while let Some(row) = rows.next()? {
        let user_id: UserId = row.get(0)?;
        if out.last().map(|(id, _)| *id) != Some(user_id) {
            out.push((user_id, Predictions::new()));
        }
        let game_id: Option<String> = row.get(1)?;
        let winner: Option<String> = row.get(2)?;
        if let (Some(game_id), Some(winner), Some((_, picks))) = (game_id, winner, out.last_mut()) {
            picks.insert(game_id, winner);
        }
    }
    Ok(out)
}

/// Lock status; users who never locked are unlocked.
pub fn status(conn: &Connection, user_id: UserId) -> Result<BracketStatus, StoreError> {
    let status = conn
        .query_row(
            "SELECT is_locked, locked_at FROM user_bracket_status WHERE user_id = ?1",
            [user_id],
            |row| {
                Ok(BracketStatus {
                    is_locked: row.get(0)?,
                    locked_at: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(status.unwrap_or_default())
}

/// Replace a user's picks in one transaction. Rejected, with nothing
/// written, if the bracket is locked.
pub fn save(conn: &mut Connection, user_id: UserId, predictions: &Predictions) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    if status(&tx, user_id)?.is_locked {
        return Err(StoreError::AlreadyLocked);
    }
    tx.execute("DELETE FROM user_prediction WHERE user_id = ?1", [user_id])?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO user_prediction (user_id, game_id, predicted_winner_id) VALUES (?1, ?2, ?3)",
        )?;
        for (game_id, winner) in predictions {
            insert.execute(params![user_id, game_id, winner])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Lock a complete bracket. The status row is a conditional upsert on
/// `is_locked = 0`, so only one of two racing locks succeeds.
pub fn lock(conn: &mut Connection, user_id: UserId, at: DateTime<Utc>) -> Result<DateTime<Utc>, StoreError> {
    let tx = conn.transaction()?;
    let picked: i64 = tx.query_row(
        "SELECT COUNT(*) FROM user_prediction WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    if picked as usize != TOTAL_GAMES {
        return Err(StoreError::IncompletePicks(picked as usize));
    }
    let changed = tx.execute(
        "INSERT INTO user_bracket_status (user_id, is_locked, locked_at) VALUES (?1, 1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET is_locked = 1, locked_at = excluded.locked_at
         WHERE user_bracket_status.is_locked = 0",
        params![user_id, at],
    )?;
    if changed == 0 {
        return Err(StoreError::AlreadyLocked);
    }
    tx.commit()?;
    Ok(at)
}

/// Admin unlock. Returns false if the bracket was not locked.
pub fn unlock(conn: &Connection, user_id: UserId) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE user_bracket_status SET is_locked = 0, locked_at = NULL
         WHERE user_id = ?1 AND is_locked = 1",
        [user_id],
    )?;
    Ok(changed > 0)
}

/// One user's bracket in the database, as a [`PredictionSink`].
pub struct StoredBracket<'c> {
    conn: &'c mut Connection,
    user_id: UserId,
}

impl<'c> StoredBracket<'c> {
    pub fn new(conn: &'c mut Connection, user_id: UserId) -> Self {
        Self { conn, user_id }
    }
}

impl From<StoreError> for BracketError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyLocked => BracketError::Locked,
            StoreError::IncompletePicks(picked) => BracketError::IncompletePicks { picked },
            other => BracketError::Sink(other.to_string()),
        }
    }
}

impl PredictionSink for StoredBracket<'_> {
    fn save(&mut self, predictions: &Predictions) -> Result<(), BracketError> {
        Ok(save(self.conn, self.user_id, predictions)?)
    }

    fn lock(&mut self) -> Result<DateTime<Utc>, BracketError> {
        Ok(lock(self.conn, self.user_id, Utc::now())?)
    }

    fn load(&mut self) -> Result<(Predictions, BracketStatus), BracketError> {
        Ok((load(self.conn, self.user_id)?, status(self.conn, self.user_id)?))
    }
}
