//! Single binary web server: the JSON API under /api.
//! Run with: cargo run --bin web
//! Configuration comes from the environment (see `march_mad_css::config`).

use actix_web::{cookie::Key, middleware::Logger, web::Data, App, HttpServer};
use march_mad_css::api::{self, AppState};
use march_mad_css::{Config, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let store = Store::open(&config.database_path).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    log::info!(
        "Using database {} (deadline {})",
        config.database_path.display(),
        config.deadline
    );

    let key = match &config.session_key {
        Some(bytes) => Key::from(bytes.as_slice()),
        None => {
            log::warn!("SESSION_KEY not set; using a random key, sessions end on restart");
            Key::generate()
        }
    };
    let cookie_secure = config.cookie_secure;
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(AppState::new(store, config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(api::session_middleware(key.clone(), cookie_secure))
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
