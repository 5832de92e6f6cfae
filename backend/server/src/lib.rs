//! Backend of a search engine front end demo.
//!
//! Serves one search API over a small, static, read-only set of documents,
//! plus the sign-in decision the external identity provider asks us for.
//! Pages, layout and styling live in the frontend and only consume the JSON below.
//!
//!
//!
//! # API
//!
//! ## `POST /api/search`
//! - Body: `{ "searchTerm": string }`
//! - `200` with an array of `{ "url", "title", "text" }` in dataset order, possibly empty
//! - `400` with `[]` for any other verb, a missing/empty/non-string `searchTerm`,
//!   a body that is not a JSON object, or a term that does not compile as a pattern
//!
//! ## `POST /api/auth/sign-in`
//! - Body: `{ "account": { "provider": string }, "profile": { "email_verified": bool } }`
//! - `200` with `{ "allowed": bool }`
//! - The only route with CORS, so cross-origin preflights are answered here and nowhere else
//!
//!
//!
//! # Configuration
//!
//! Every key is read from the environment. The credentials fall back to `/run/secrets/<KEY>`.
//!
//! | Key | Required | Default |
//! |-----|----------|---------|
//! | `RUST_PORT` | no | `3000` |
//! | `DATASET_PATH` | no | bundled `data/database.json` |
//! | `GOOGLE_CLIENT_ID` | **yes** | |
//! | `GOOGLE_CLIENT_SECRET` | **yes** | |
//!
//! Missing credentials stop the server before it binds, it never runs half configured.
//!
//!
//!
//! # Setup
//!
//! Run with logs.
//! ```sh
//! RUST_LOG=info GOOGLE_CLIENT_ID=... GOOGLE_CLIENT_SECRET=... cargo run -p backend
//! ```
//!
//! Log every search and sign-in decision.
//! ```sh
//! cargo run -p backend --features verbose
//! ```
//!
//! Smoke test a running server.
//! ```sh
//! cargo run -p tester -- product
//! ```
use std::{future::pending, sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{any, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pattern;
pub mod routes;
pub mod search;
pub mod state;
pub mod utils;

use routes::{search_handler, sign_in_handler};
use state::State;

pub const SEARCH_ROUTE: &str = "/api/search";
pub const SIGN_IN_ROUTE: &str = "/api/auth/sign-in";

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(SEARCH_ROUTE, any(search_handler))
        .route(SIGN_IN_ROUTE, post(sign_in_handler).layer(cors))
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let router = app(state);

    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
