//! JSON HTTP API: routes, shared state, session identity.

mod admin;
mod auth;
mod bracket;
mod error;
mod leaderboard;
mod predictions;

pub use error::ApiError;

use crate::config::Config;
use crate::models::{User, UserId};
use crate::store::{users, Store};
use actix_session::{config::PersistentSession, storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::{time::Duration as CookieDuration, Key};
use actix_web::web::{Data, ServiceConfig};
use rusqlite::Connection;

/// Session key holding the signed-in user's id.
const SESSION_USER_ID: &str = "user_id";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "march_mad_css";

/// State shared by all handlers.
pub struct AppState {
    pub store: Store,
    pub config: Config,
}

pub type State = Data<AppState>;

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self { store, config }
    }
}

/// Register every API route.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(bracket::api_health)
        .service(auth::api_sign_up)
        .service(auth::api_sign_in)
        .service(auth::api_sign_out)
        .service(auth::api_me)
        .service(bracket::api_players)
        .service(bracket::api_bracket)
        .service(bracket::api_deadline)
        .service(bracket::api_public_bracket)
        .service(predictions::api_get_predictions)
        .service(predictions::api_save_predictions)
        .service(predictions::api_lock_predictions)
        .service(leaderboard::api_leaderboard)
        .service(leaderboard::api_calculate_leaderboard)
        .service(admin::api_list_users)
        .service(admin::api_unlock_user)
        .service(admin::api_set_admin)
        .service(admin::api_delete_user)
        .service(admin::api_get_results)
        .service(admin::api_record_result)
        .service(admin::api_clear_result)
        .service(admin::api_simulate)
        .service(admin::api_leaderboard_csv);
}

/// Signed cookie sessions; they last a week.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_secure(secure)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::days(7)))
        .build()
}

fn session_user_id(session: &Session) -> Option<UserId> {
    session.get::<UserId>(SESSION_USER_ID).ok().flatten()
}

fn start_session(session: &Session, user_id: UserId) -> Result<(), ApiError> {
    session.renew();
    session
        .insert(SESSION_USER_ID, user_id)
        .map_err(|e| ApiError::Internal(format!("session insert: {}", e)))
}

/// The signed-in user. Sessions of deleted users are dropped.
fn current_user(session: &Session, conn: &Connection) -> Result<User, ApiError> {
    let id = session_user_id(session).ok_or(ApiError::Unauthorized)?;
    match users::get(conn, id)? {
        Some(user) => Ok(user),
        None => {
            session.purge();
            Err(ApiError::Unauthorized)
        }
    }
}

/// The signed-in user, who must be an admin.
fn require_admin(session: &Session, conn: &Connection) -> Result<User, ApiError> {
    let user = current_user(session, conn)?;
    if !user.is_admin {
        log::warn!("non-admin {} refused on admin route", user.username);
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}
