//! `game_result`: the authoritative winners, written by admins.

use crate::models::ResultSet;
use crate::store::StoreError;
use chrono::Utc;
use rusqlite::{params, Connection};

pub fn load(conn: &Connection) -> Result<ResultSet, StoreError> {
    let mut stmt = conn.prepare("SELECT game_id, winner_id FROM game_result")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    Ok(rows.collect::<Result<ResultSet, _>>()?)
}

/// Record `winner_id` for `game_id` and drop the downstream results in
/// `cleared`, in one transaction.
pub fn record(
    conn: &mut Connection,
    game_id: &str,
    winner_id: &str,
    cleared: &[String],
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    for id in cleared {
        tx.execute("DELETE FROM game_result WHERE game_id = ?1", [id])?;
    }
    tx.execute(
        "INSERT INTO game_result (game_id, winner_id, recorded_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(game_id) DO UPDATE SET winner_id = excluded.winner_id, recorded_at = excluded.recorded_at",
        params![game_id, winner_id, Utc::now()],
    )?;
    tx.commit()?;
    Ok(())
}

/// Remove the given results. Returns how many rows were deleted.
pub fn clear(conn: &mut Connection, game_ids: &[String]) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    let mut removed = 0;
    for id in game_ids {
        removed += tx.execute("DELETE FROM game_result WHERE game_id = ?1", [id])?;
    }
    tx.commit()?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[tokio::test]
    async fn record_overwrites_and_clears() {
        let store = Store::open_in_memory().unwrap();
        let mut conn = store.connection().await;
        record(&mut conn, "r1-0", "maya-lindqvist", &[]).unwrap();
        record(&mut conn, "qf-0", "maya-lindqvist", &[]).unwrap();
        record(&mut conn, "r1-0", "theo-okafor", &["qf-0".to_string()]).unwrap();
        let results = load(&conn).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("r1-0").map(String::as_str), Some("theo-okafor"));

        assert_eq!(clear(&mut conn, &["r1-0".to_string(), "sf-0".to_string()]).unwrap(), 1);
        assert!(load(&conn).unwrap().is_empty());
    }
}
