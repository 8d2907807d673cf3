//! Public reads: health, roster, bracket structure with results, deadline, locked brackets.

use crate::api::{ApiError, State};
use crate::logic::{calculate_score, pickable_players};
use crate::models::{Game, Predictions, Score, BRACKET, PLAYERS};
use crate::store::{predictions, results, users};
use actix_web::{get, web::Path, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// A bracket game with the players and winner known from recorded results.
#[derive(Serialize)]
struct GameView<'a> {
    #[serde(flatten)]
    game: &'static Game,
    points: u32,
    players: (Option<&'a str>, Option<&'a str>),
    winner: Option<&'a str>,
}

#[derive(Serialize)]
struct DeadlineResponse {
    deadline: DateTime<Utc>,
    /// Zero once the deadline has passed.
    seconds_remaining: i64,
    is_open: bool,
}

#[derive(Serialize)]
struct PublicBracket {
    username: String,
    name: String,
    locked_at: Option<DateTime<Utc>>,
    predictions: Predictions,
    score: Score,
}

#[get("/api/health")]
pub(super) async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "march-mad-css",
    })
}

#[get("/api/players")]
pub(super) async fn api_players() -> impl Responder {
    HttpResponse::Ok().json(PLAYERS)
}

/// The 15 games in bracket order, resolved against recorded results.
#[get("/api/bracket")]
pub(super) async fn api_bracket(state: State) -> Result<HttpResponse, ApiError> {
    let results = {
        let conn = state.store.connection().await;
        results::load(&conn)?
    };
    let games: Vec<GameView<'_>> = BRACKET
        .iter()
        .map(|game| GameView {
            game,
            points: game.round.points(),
            players: pickable_players(game.id, &results),
            winner: results.get(game.id).map(String::as_str),
        })
        .collect();
    Ok(HttpResponse::Ok().json(games))
}

/// Countdown to the prediction deadline.
#[get("/api/deadline")]
pub(super) async fn api_deadline(state: State) -> impl Responder {
    let now = Utc::now();
    let deadline = state.config.deadline;
    HttpResponse::Ok().json(DeadlineResponse {
        deadline,
        seconds_remaining: (deadline - now).num_seconds().max(0),
        is_open: state.config.is_open(now),
    })
}

/// A user's bracket, visible to anyone once it is locked.
#[get("/api/bracket/{username}")]
pub(super) async fn api_public_bracket(state: State, path: Path<String>) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let user = users::find_by_username(&conn, &path)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let status = predictions::status(&conn, user.id)?;
    if !status.is_locked {
        return Err(ApiError::NotFound(format!(
            "{} has not locked a bracket yet",
            user.username
        )));
    }
    let picks = predictions::load(&conn, user.id)?;
    let score = calculate_score(&picks, &results::load(&conn)?);
    Ok(HttpResponse::Ok().json(PublicBracket {
        username: user.username,
        name: user.name,
        locked_at: status.locked_at,
        predictions: picks,
        score,
    }))
}
