//! Leaderboard read and the admin recalculation batch.

use crate::api::{require_admin, ApiError, State};
use crate::logic::rank_leaderboard;
use crate::store::scores;
use actix_session::Session;
use actix_web::{get, post, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
struct CalculateResponse {
    users_scored: usize,
}

/// Ranked cached scores.
#[get("/api/leaderboard")]
pub(super) async fn api_leaderboard(state: State) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let board = rank_leaderboard(scores::leaderboard_rows(&conn)?);
    Ok(HttpResponse::Ok().json(board))
}

/// Rescore every user against the current results (admin).
#[post("/api/leaderboard/calculate")]
pub(super) async fn api_calculate_leaderboard(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let mut conn = state.store.connection().await;
    let admin = require_admin(&session, &conn)?;
    let users_scored = scores::recalculate_all(&mut conn)?;
    log::info!("{} recalculated scores for {} users", admin.username, users_scored);
    Ok(HttpResponse::Ok().json(CalculateResponse { users_scored }))
}
