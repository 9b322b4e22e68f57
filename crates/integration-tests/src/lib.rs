//! Integration tests for Trailmark.
//!
//! # Test Categories
//!
//! - `catalog_flow` - cross-service scenarios over the in-memory store;
//!   these run on every `cargo test`
//! - `http_smoke` - end-to-end checks against a running server; ignored by
//!   default
//!
//! # Running the HTTP smoke tests
//!
//! ```bash
//! # Start the database and server
//! cargo run -p trailmark-cli -- migrate
//! cargo run -p trailmark-server
//!
//! # Run everything including the ignored tests
//! cargo test -p trailmark-integration-tests -- --include-ignored
//! ```

use secrecy::SecretString;

use trailmark_server::config::CatalogConfig;
use trailmark_server::state::AppState;

/// Application state wired over empty in-memory stores.
#[must_use]
pub fn in_memory_state() -> AppState {
    let config = CatalogConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        sentry_dsn: None,
    };
    AppState::in_memory(config)
}

/// Base URL for the HTTP smoke tests (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("TRAILMARK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}
