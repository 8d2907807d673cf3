//! The signed-in user's picks: fetch, replace, lock.

use crate::api::{current_user, ApiError, State};
use crate::models::{
    is_known_game, is_known_player, BracketError, BracketStatus, Predictions, TOTAL_GAMES,
};
use crate::store::predictions;
use actix_session::Session;
use actix_web::{get, post, web::Json, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct SavePredictionsBody {
    predictions: Predictions,
}

#[derive(Serialize)]
struct PredictionsResponse {
    predictions: Predictions,
    #[serde(flatten)]
    status: BracketStatus,
    complete: bool,
    deadline: DateTime<Utc>,
}

impl PredictionsResponse {
    fn new(predictions: Predictions, status: BracketStatus, deadline: DateTime<Utc>) -> Self {
        Self {
            complete: predictions.len() == TOTAL_GAMES,
            predictions,
            status,
            deadline,
        }
    }
}

/// Known game and player ids only; pickability is the editor's job.
fn validate(predictions: &Predictions) -> Result<(), BracketError> {
    for (game_id, player_id) in predictions {
        if !is_known_game(game_id) {
            return Err(BracketError::UnknownGame(game_id.clone()));
        }
        if !is_known_player(player_id) {
            return Err(BracketError::UnknownPlayer(player_id.clone()));
        }
    }
    Ok(())
}

#[get("/api/predictions")]
pub(super) async fn api_get_predictions(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let user = current_user(&session, &conn)?;
    let picks = predictions::load(&conn, user.id)?;
    let status = predictions::status(&conn, user.id)?;
    Ok(HttpResponse::Ok().json(PredictionsResponse::new(picks, status, state.config.deadline)))
}

/// Replace the caller's picks. Refused after the deadline and once locked.
#[post("/api/predictions")]
pub(super) async fn api_save_predictions(
    state: State,
    session: Session,
    body: Json<SavePredictionsBody>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = state.store.connection().await;
    let user = current_user(&session, &conn)?;
    if !state.config.is_open(Utc::now()) {
        log::warn!("{} tried to save after the deadline", user.username);
        return Err(BracketError::DeadlinePassed.into());
    }
    let picks = body.into_inner().predictions;
    validate(&picks)?;
    if let Err(e) = predictions::save(&mut conn, user.id, &picks) {
        log::warn!("save for {} refused: {}", user.username, e);
        return Err(e.into());
    }
    log::debug!("{} saved {} picks", user.username, picks.len());
    let status = predictions::status(&conn, user.id)?;
    Ok(HttpResponse::Ok().json(PredictionsResponse::new(picks, status, state.config.deadline)))
}

/// Lock the caller's bracket. Needs all 15 picks; a second lock gets 409.
#[post("/api/predictions/lock")]
pub(super) async fn api_lock_predictions(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let mut conn = state.store.connection().await;
    let user = current_user(&session, &conn)?;
    let now = Utc::now();
    if !state.config.is_open(now) {
        return Err(BracketError::DeadlinePassed.into());
    }
    let locked_at = predictions::lock(&mut conn, user.id, now)?;
    log::info!("{} locked their bracket at {}", user.username, locked_at);
    let picks = predictions::load(&conn, user.id)?;
    Ok(HttpResponse::Ok().json(PredictionsResponse::new(
        picks,
        BracketStatus::locked(locked_at),
        state.config.deadline,
    )))
}
