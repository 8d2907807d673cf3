//! Session identity: sign-up, sign-in, sign-out, current user.
//!
//! Sign-up hands out a random secret once; sign-in needs the username and
//! that secret. Password flows and OAuth are left to an external provider.

use crate::api::{current_user, start_session, ApiError, State};
use crate::models::User;
use crate::store::users;
use actix_session::Session;
use actix_web::{get, post, web::Json, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
struct SignUpBody {
    username: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct SignInBody {
    username: String,
    #[serde(default)]
    secret: String,
}

#[derive(Serialize)]
struct SignUpResponse {
    #[serde(flatten)]
    user: User,
    /// Shown once; needed to sign in again.
    secret: String,
}

/// 3-32 characters: ASCII letters, digits, `-` and `_`.
fn validate_username(username: &str) -> Result<(), ApiError> {
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !(3..=32).contains(&username.len()) || !valid_chars {
        return Err(ApiError::Validation(
            "Username must be 3-32 letters, digits, '-' or '_'".to_string(),
        ));
    }
    Ok(())
}

/// Create an account, sign it in and return its sign-in secret. Usernames
/// listed in ADMIN_USERNAMES become admins.
#[post("/api/auth/sign-up")]
pub(super) async fn api_sign_up(state: State, session: Session, body: Json<SignUpBody>) -> Result<HttpResponse, ApiError> {
    let username = body.username.trim();
    validate_username(username)?;
    let name = match body.name.trim() {
        "" => username,
        n => n,
    };
    let user = User::new(username, name, state.config.is_admin_username(username));
    let secret = Uuid::new_v4().simple().to_string();
    let conn = state.store.connection().await;
    users::create(&conn, &user, &secret)?;
    start_session(&session, user.id)?;
    log::info!("new user {} (admin: {})", user.username, user.is_admin);
    Ok(HttpResponse::Created().json(SignUpResponse { user, secret }))
}

/// Unknown usernames and wrong secrets get the same 401.
#[post("/api/auth/sign-in")]
pub(super) async fn api_sign_in(state: State, session: Session, body: Json<SignInBody>) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let username = body.username.trim();
    let user = match users::find_by_credentials(&conn, username, body.secret.trim())? {
        Some(user) => user,
        None => {
            log::warn!("failed sign-in for {}", username);
            return Err(ApiError::BadCredentials);
        }
    };
    start_session(&session, user.id)?;
    Ok(HttpResponse::Ok().json(&user))
}

#[post("/api/auth/sign-out")]
pub(super) async fn api_sign_out(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[get("/api/auth/me")]
pub(super) async fn api_me(state: State, session: Session) -> Result<HttpResponse, ApiError> {
    let conn = state.store.connection().await;
    let user = current_user(&session, &conn)?;
    Ok(HttpResponse::Ok().json(&user))
}
