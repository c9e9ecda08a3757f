#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the LA crime dashboard.
//!
//! Loads the dataset once at startup, then serves the single-page
//! dashboard and the JSON endpoints it drives: the initial layout and one
//! update per interaction. Each page load gets its own session; the
//! session store sits behind a `Mutex`, so interactions are handled one at
//! a time.

mod handlers;
pub mod sessions;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::{App, HttpServer, middleware, web};
use crime_dashboard::config::DEFAULT_CONFIG_PATH;
use crime_dashboard::{DashboardConfig, DashboardContext, Session};

pub use handlers::PAGE_TITLE;
pub use sessions::SessionStore;

/// Shared application state.
pub struct AppState {
    /// Loaded dataset and presentation settings.
    pub context: Arc<DashboardContext>,
    /// Interaction state of each open page.
    pub sessions: Mutex<SessionStore<Session>>,
}

impl AppState {
    /// Wraps a loaded context with an empty session store.
    #[must_use]
    pub fn new(context: DashboardContext, max_sessions: usize) -> Self {
        Self {
            context: Arc::new(context),
            sessions: Mutex::new(SessionStore::new(max_sessions)),
        }
    }
}

/// Registers every dashboard route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index)).service(
        web::scope("/_dashboard")
            .route("/health", web::get().to(handlers::health))
            .route("/layout", web::get().to(handlers::layout))
            .route("/update", web::post().to(handlers::update)),
    );
}

/// Starts the dashboard server.
///
/// Reads `dashboard.toml` (or the file named by `DASHBOARD_CONFIG`) if it
/// exists, loads and cleans the dataset, and serves on `BIND_ADDR:PORT`
/// (default `127.0.0.1:8050`). This is a regular async function; the
/// caller provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the config or either input file
/// can't be loaded, or if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config_path = std::env::var("DASHBOARD_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    let config = DashboardConfig::load(&config_path).map_err(|e| {
        log::error!("{e}");
        std::io::Error::other(e)
    })?;

    log::info!("Loading dataset...");
    let context = DashboardContext::load(&config).map_err(|e| {
        log::error!("Failed to load dashboard data: {e}");
        std::io::Error::other(e)
    })?;

    let state = web::Data::new(AppState::new(context, config.server.max_sessions));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or(config.server.bind_addr);
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    log::info!("Starting server on http://{bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
