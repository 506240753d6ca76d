//! Integration tests for Green Wally Grocers.
//!
//! Each test spawns the full storefront on an ephemeral loopback port, backed
//! by its own in-memory `SQLite` database, and drives it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p green-wally-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Registration, login and logout
//! - `cart` - Adding to the cart, totals and checkout
//! - `catalog` - Seeding and the product listing

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;

use green_wally_storefront::config::StorefrontConfig;
use green_wally_storefront::state::AppState;
use green_wally_storefront::{app, init_database, session_store};
use reqwest::{Client, StatusCode, header};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A running storefront and a handle on its database.
pub struct TestServer {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    _db_dir: Option<TempDir>,
}

impl TestServer {
    /// Start a freshly migrated and seeded storefront on an in-memory database.
    pub async fn spawn() -> Self {
        Self::start("sqlite::memory:", None).await
    }

    /// Start a storefront on a database file in a temporary directory.
    ///
    /// Unlike the in-memory database this gets a multi-connection pool, so
    /// concurrent requests really do reach `SQLite` in parallel.
    pub async fn spawn_on_file() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("grocery.db").display());
        Self::start(&url, Some(dir)).await
    }

    async fn start(database_url: &str, db_dir: Option<TempDir>) -> Self {
        let config = StorefrontConfig::for_database(database_url);
        let pool = init_database(&config)
            .await
            .expect("Failed to initialise database");
        let store = session_store(&pool)
            .await
            .expect("Failed to create session store");

        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let router = app(AppState::new(config, pool.clone()), store);
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server stopped");
        });

        Self {
            addr,
            pool,
            _db_dir: db_dir,
        }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A client with its own cookie jar that does not follow redirects.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Register `username` with password `pw` and sign the client in.
    pub async fn sign_up_and_in(&self, client: &Client, username: &str) {
        let email = format!("{username}@example.com");
        let resp = client
            .post(self.url("/register"))
            .form(&[("username", username), ("email", email.as_str()), ("password", "pw")])
            .send()
            .await
            .expect("Register request failed");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/login"));

        let resp = client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", "pw")])
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), Some("/"));
    }
}

/// The `Location` header of a redirect, if any.
#[must_use]
pub fn location(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

