//! `user` table: accounts, admin flag, admin listing.

use crate::models::{BracketStatus, User, UserId};
use crate::store::StoreError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use sha2::{Digest, Sha256};

const USER_COLUMNS: &str = "u.id, u.username, u.name, u.is_admin, u.created_at";

/// Admin view of a user: account, lock status and how many games they picked.
#[derive(Clone, Debug, Serialize)]
pub struct UserSummary {
    #[serde(flatten)]
    pub user: User,
    #[serde(flatten)]
    pub status: BracketStatus,
    pub picks: usize,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        is_admin: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn secret_hash(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Insert a new user with their sign-in secret. Only the secret's digest is
/// stored. Usernames are unique case-insensitively.
pub fn create(conn: &Connection, user: &User, secret: &str) -> Result<(), StoreError> {
    if find_by_username(conn, &user.username)?.is_some() {
        return Err(StoreError::UsernameTaken(user.username.clone()));
    }
    conn.execute(
        "INSERT INTO user (id, username, name, is_admin, secret_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.username,
            user.name,
            user.is_admin,
            secret_hash(secret),
            user.created_at
        ],
    )?;
    Ok(())
}

/// The user with this username, if `secret` is theirs.
pub fn find_by_credentials(conn: &Connection, username: &str, secret: &str) -> Result<Option<User>, StoreError> {
    let sql = format!(
        "SELECT {} FROM user u WHERE u.username = ?1 COLLATE NOCASE AND u.secret_hash = ?2",
        USER_COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![username, secret_hash(secret)], user_from_row)
        .optional()?)
}

pub fn get(conn: &Connection, id: UserId) -> Result<Option<User>, StoreError> {
    let sql = format!("SELECT {} FROM user u WHERE u.id = ?1", USER_COLUMNS);
    Ok(conn.query_row(&sql, [id], user_from_row).optional()?)
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>, StoreError> {
    let sql = format!("SELECT {} FROM user u WHERE u.username = ?1 COLLATE NOCASE", USER_COLUMNS);
    Ok(conn.query_row(&sql, [username], user_from_row).optional()?)
}

/// All users ordered by username, with lock status and pick count.
pub fn list_summaries(conn: &Connection) -> Result<Vec<UserSummary>, StoreError> {
    let sql = format!(
        "SELECT {}, COALESCE(s.is_locked, 0), s.locked_at,
                (SELECT COUNT(*) FROM user_prediction p WHERE p.user_id = u.id)
         FROM user u LEFT JOIN user_bracket_status s ON s.user_id = u.id
         ORDER BY u.username COLLATE NOCASE",
        USER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let picks: i64 = row.get(7)?;
        Ok(UserSummary {
            user: user_from_row(row)?,
            status: BracketStatus {
                is_locked: row.get(5)?,
                locked_at: row.get(6)?,
            },
            picks: picks as usize,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Grant or revoke admin. Returns false if the user does not exist.
pub fn set_admin(conn: &Connection, id: UserId, is_admin: bool) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE user SET is_admin = ?2 WHERE id = ?1",
        params![id, is_admin],
    )?;
    Ok(changed > 0)
}

/// Delete a user; predictions, status and score go with it.
pub fn delete(conn: &Connection, id: UserId) -> Result<bool, StoreError> {
    let changed = conn.execute("DELETE FROM user WHERE id = ?1", [id])?;
    Ok(changed > 0)
}
