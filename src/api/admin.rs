//! Admin routes: user management, results, stage simulation, CSV export.

use crate::api::{require_admin, ApiError, State};
use crate::logic::{calculate_score, is_pickable, rank_leaderboard, remove_pick, set_pick, simulate_results};
use crate::models::{is_known_game, is_known_player, BracketError, GameId, LeaderboardEntry, ResultSet, Round, UserId};
use crate::store::{predictions, results, scores, users};
use actix_session::Session;
use actix_web::{delete, get, post, put, web::Json, web::Path, HttpResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize)]
struct SetAdminBody {
    is_admin: bool,
}

#[derive(Deserialize)]
struct RecordResultBody {
    game_id: String,
    winner_id: String,
}

#[derive(Deserialize)]
struct SimulateBody {
    /// Last round to fill with mock results.
    through: Round,
}

#[derive(Serialize)]
struct ResultsResponse {
    results: ResultSet,
    /// Downstream results removed because they depended on a changed result.
    cleared: Vec<GameId>,
}

#[derive(Serialize)]
struct SimulateResponse {
    results: ResultSet,
    leaderboard: Vec<LeaderboardEntry>,
}

const CSV_HEADER: [&str; 8] = [
    "rank",
    "username",
    "name",
    "round1",
    "quarterfinal",
    "semifinal",
    "final",
    "total",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: u32,
    username: &'a str,
    name: &'a str,
    round1: u32,
    quarterfinal: u32,
    semifinal: u32,
    final_round: u32,
    total: u32,
}

/// Users with lock status and pick counts.
#[get("/api/admin/users")]
pub(super) async fn api_list_users(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    require_admin(&session, &conn)?;
    Ok(HttpResponse::Ok().json(users::list_summaries(&conn)?))
}

/// Unlock a user's bracket so they can edit it again.
#[post("/api/admin/users/{id}/unlock")]
pub(super) async fn api_unlock_user(state: State, session: Session, path: Path<UserId>) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let admin = require_admin(&session, &conn)?;
    let user = users::get(&conn, *path)?.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    if !predictions::unlock(&conn, user.id)? {
        return Err(ApiError::Conflict(format!("{} is not locked", user.username)));
    }
    log::info!("{} unlocked the bracket of {}", admin.username, user.username);
    Ok(HttpResponse::Ok().json(predictions::status(&conn, user.id)?))
}

#[put("/api/admin/users/{id}/admin")]
pub(super) async fn api_set_admin(
    state: State,
    session: Session,
    path: Path<UserId>,
    body: Json<SetAdminBody>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let admin = require_admin(&session, &conn)?;
    let id = path.into_inner();
    if id == admin.id && !body.is_admin {
        return Err(ApiError::Validation("Cannot revoke your own admin access".to_string()));
    }
    if !users::set_admin(&conn, id, body.is_admin)? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    log::info!("{} set admin={} on {}", admin.username, body.is_admin, id);
    let user = users::get(&conn, id)?.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user with their picks, status and score.
#[delete("/api/admin/users/{id}")]
pub(super) async fn api_delete_user(state: State, session: Session, path: Path<UserId>) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let admin = require_admin(&session, &conn)?;
    let id = path.into_inner();
    if id == admin.id {
        return Err(ApiError::Validation("Cannot delete your own account".to_string()));
    }
    if !users::delete(&conn, id)? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }
    log::info!("{} deleted user {}", admin.username, id);
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/admin/results")]
pub(super) async fn api_get_results(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    require_admin(&session, &conn)?;
    Ok(HttpResponse::Ok().json(results::load(&conn)?))
}

/// Record a winner. The winner must be playing in that game given earlier
/// results; downstream results that advanced the replaced winner are cleared.
#[put("/api/admin/results")]
pub(super) async fn api_record_result(
    state: State,
    session: Session,
    body: Json<RecordResultBody>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = state.store.connection().await;
    let admin = require_admin(&session, &conn)?;
    let RecordResultBody { game_id, winner_id } = body.into_inner();
    if !is_known_game(&game_id) {
        return Err(BracketError::UnknownGame(game_id).into());
    }
    if !is_known_player(&winner_id) {
        return Err(BracketError::UnknownPlayer(winner_id).into());
    }
    let mut current = results::load(&conn)?;
    if !is_pickable(&game_id, &winner_id, &current) {
        return Err(BracketError::IneligibleWinner {
            game_id,
            player_id: winner_id,
        }
        .into());
    }
    let cleared = set_pick(&mut current, &game_id, &winner_id);
    results::record(&mut conn, &game_id, &winner_id, &cleared)?;
    log::info!("{} recorded {} as winner of {} (cleared {:?})", admin.username, winner_id, game_id, cleared);
    Ok(HttpResponse::Ok().json(ResultsResponse {
        results: current,
        cleared,
    }))
}

/// Remove a recorded result and the results that depended on it.
#[delete("/api/admin/results/{game_id}")]
pub(super) async fn api_clear_result(state: State, session: Session, path: Path<String>) -> Result<HttpResponse, ApiError> {
    let mut conn = state.store.connection().await;
    let admin = require_admin(&session, &conn)?;
    let game_id = path.into_inner();
    if !is_known_game(&game_id) {
        return Err(BracketError::UnknownGame(game_id).into());
    }
    let mut current = results::load(&conn)?;
    if !current.contains_key(&game_id) {
        return Err(ApiError::NotFound(format!("No result recorded for {}", game_id)));
    }
    let cleared = remove_pick(&mut current, &game_id);
    let mut to_delete = vec![game_id.clone()];
    to_delete.extend(cleared.iter().cloned());
    results::clear(&mut conn, &to_delete)?;
    log::info!("{} cleared result of {} (and {:?})", admin.username, game_id, cleared);
    Ok(HttpResponse::Ok().json(ResultsResponse {
        results: current,
        cleared,
    }))
}

/// Preview a tournament stage: mock results through `through` and the
/// leaderboard they would produce. Nothing is stored.
#[post("/api/admin/simulate")]
pub(super) async fn api_simulate(state: State, session: Session, body: Json<SimulateBody>) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    require_admin(&session, &conn)?;
    let mock = simulate_results(body.through, &mut rand::thread_rng());
    let mut picks_by_user: HashMap<UserId, _> = predictions::load_all(&conn)?.into_iter().collect();
    let rows = users::list_summaries(&conn)?
        .into_iter()
        .map(|s| {
            let picks = picks_by_user.remove(&s.user.id).unwrap_or_default();
            let score = calculate_score(&picks, &mock);
            (s.user, score)
        })
        .collect();
    Ok(HttpResponse::Ok().json(SimulateResponse {
        results: mock,
        leaderboard: rank_leaderboard(rows),
    }))
}

/// Leaderboard as CSV (cached scores).
#[get("/api/admin/leaderboard.csv")]
pub(super) async fn api_leaderboard_csv(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    require_admin(&session, &conn)?;
    let board = rank_leaderboard(scores::leaderboard_rows(&conn)?);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| ApiError::Internal(format!("csv: {}", e)))?;
    for entry in &board {
        writer
            .serialize(CsvRow {
                rank: entry.rank,
                username: &entry.username,
                name: &entry.name,
                round1: entry.score.round1,
                quarterfinal: entry.score.quarterfinal,
                semifinal: entry.score.semifinal,
                final_round: entry.score.final_round,
                total: entry.score.total,
            })
            .map_err(|e| ApiError::Internal(format!("csv: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("csv: {}", e)))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"leaderboard.csv\""))
        .body(bytes))
}
