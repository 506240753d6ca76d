//! Green Wally Grocers storefront library.
//!
//! The binary in `main.rs` and the integration tests both assemble the
//! application through [`init_database`], [`session_store`] and [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::Request};
use sqlx::SqlitePool;
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;
use crate::db::RepositoryError;
use crate::state::AppState;

/// Errors that stop the storefront from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("catalog seeding failed: {0}")]
    Seed(#[from] RepositoryError),
}

/// Open the database, apply migrations and seed the default catalog.
///
/// # Errors
///
/// Returns `StartupError` if any of the three steps fails. A seeding failure
/// leaves the products inserted before it in place.
pub async fn init_database(config: &StorefrontConfig) -> Result<SqlitePool, StartupError> {
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    catalog::seed_catalog(&pool, &catalog::default_catalog()).await?;
    Ok(pool)
}

/// Create the session store and its table.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Build the full application router.
pub fn app(state: AppState, store: SqliteStore) -> Router {
    let session_layer = middleware::create_session_layer(store, state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .merge(routes::routes())
        .fallback(error::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::render_not_found,
        ))
        .layer(session_layer)
        .nest_service("/static", static_dir)
        .merge(routes::health_routes())
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    struct TestApp {
        router: Router,
        pool: SqlitePool,
        cookie: Option<String>,
    }

    impl TestApp {
        async fn new() -> Self {
            let config = StorefrontConfig::for_database("sqlite::memory:");
            let pool = init_database(&config).await.unwrap();
            let store = session_store(&pool).await.unwrap();
            Self {
                router: app(AppState::new(config, pool.clone()), store),
                pool,
                cookie: None,
            }
        }

        async fn send(&mut self, method: &str, uri: &str, form: Option<&str>) -> (StatusCode, Option<String>, String) {
            let mut builder = HttpRequest::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            let body = match form {
                Some(form) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                    Body::from(form.to_owned())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();

            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_owned());
            }

            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .map(|v| v.to_str().unwrap().to_owned());
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, location, String::from_utf8_lossy(&bytes).into_owned())
        }

        async fn get(&mut self, uri: &str) -> (StatusCode, Option<String>, String) {
            self.send("GET", uri, None).await
        }

        async fn post(&mut self, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
            self.send("POST", uri, Some(form)).await
        }

        async fn sign_up_and_in(&mut self, username: &str) {
            let form = format!("username={username}&email={username}%40example.com&password=pw");
            self.post("/register", &form).await;
            let (status, location, _) = self
                .post("/login", &format!("username={username}&password=pw"))
                .await;
            assert_eq!(status, StatusCode::SEE_OTHER);
            assert_eq!(location.as_deref(), Some("/"));
        }
    }

    #[tokio::test]
    async fn home_lists_seeded_catalog() {
        let mut app = TestApp::new().await;
        let (status, _, body) = app.get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Rice"));
        assert!(body.contains("Wheat Flour"));
        assert!(body.contains("45.00"));
        assert!(body.contains("Login"));
    }

    #[tokio::test]
    async fn protected_pages_redirect_to_login() {
        let mut app = TestApp::new().await;
        for uri in ["/cart", "/checkout", "/logout"] {
            let (status, location, _) = app.get(uri).await;
            assert_eq!(status, StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(location.as_deref(), Some("/login"), "{uri}");
        }
        let (status, location, _) = app.post("/add_to_cart/1", "").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));
    }

    #[tokio::test]
    async fn unknown_route_renders_not_found_page() {
        let mut app = TestApp::new().await;
        let (status, _, body) = app.get("/no-such-page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn health_endpoints() {
        let mut app = TestApp::new().await;
        let (status, _, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
        let (status, _, _) = app.get("/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn register_flashes_then_login_page_shows_it() {
        let mut app = TestApp::new().await;
        let (status, location, _) = app
            .post("/register", "username=tara&email=tara%40example.com&password=pw")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));

        let (_, _, body) = app.get("/login").await;
        assert!(body.contains("Registration successful!"));

        let (_, _, body) = app.get("/login").await;
        assert!(!body.contains("Registration successful!"));
    }

    #[tokio::test]
    async fn duplicate_username_flashes_and_redirects_back() {
        let mut app = TestApp::new().await;
        app.post("/register", "username=tara&email=t1%40example.com&password=pw")
            .await;
        let (status, location, _) = app
            .post("/register", "username=tara&email=t2%40example.com&password=pw")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/register"));

        let (_, _, body) = app.get("/register").await;
        assert!(body.contains("Username already exists"));
    }

    #[tokio::test]
    async fn wrong_password_rerenders_form() {
        let mut app = TestApp::new().await;
        app.post("/register", "username=omar&email=omar%40example.com&password=pw")
            .await;

        let (status, _, body) = app.post("/login", "username=omar&password=nope").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Invalid username or password"));

        let (status, location, _) = app.get("/cart").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));
    }

    #[tokio::test]
    async fn add_to_cart_then_checkout() {
        let mut app = TestApp::new().await;
        app.sign_up_and_in("meena").await;

        // Seeded ids follow the catalog order: 1 = Rice, 2 = Milk.
        for id in [1, 1, 2] {
            let (status, location, _) = app.post(&format!("/add_to_cart/{id}"), "").await;
            assert_eq!(status, StatusCode::SEE_OTHER);
            assert_eq!(location.as_deref(), Some("/"));
        }

        let (_, _, body) = app.get("/").await;
        assert!(body.contains("Product added to cart!"));
        assert!(body.contains("meena"));

        let (status, _, body) = app.get("/cart").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("90.00"));
        assert!(body.contains("122.00"));

        let (_, _, body) = app.get("/checkout").await;
        assert!(body.contains("card_number"));
        assert!(body.contains("122.00"));

        let (status, _, body) = app
            .post("/checkout", "card_name=M&card_number=4111&expiry=12%2F30&cvv=123")
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Payment successful!"));
        assert!(body.contains("0.00"));

        let (_, _, body) = app.get("/cart").await;
        assert!(body.contains("Your cart is empty"));
    }

    #[tokio::test]
    async fn unknown_product_is_404() {
        let mut app = TestApp::new().await;
        app.sign_up_and_in("ishaan").await;

        let (status, _, _) = app.post("/add_to_cart/9999", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = app.post("/add_to_cart/rice", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn not_found_page_keeps_shopper_layout() {
        let mut app = TestApp::new().await;
        app.sign_up_and_in("priya").await;
        app.post("/add_to_cart/1", "").await;

        let (status, _, body) = app.post("/add_to_cart/9999", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
        assert!(body.contains("priya"));
        assert!(body.contains("Logout"));
        assert!(!body.contains("href=\"/register\""));

        let (status, _, body) = app.get("/no-such-page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("priya"));
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let mut app = TestApp::new().await;
        app.sign_up_and_in("zoya").await;

        let (status, location, _) = app.get("/logout").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (status, location, _) = app.get("/cart").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));
    }

    #[tokio::test]
    async fn oversized_cart_total_is_a_server_error() {
        let mut app = TestApp::new().await;
        app.sign_up_and_in("farah").await;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO products (name, price, stock) VALUES ('Gold', '79228162514264337593543950335', 1) RETURNING id",
        )
        .fetch_one(&app.pool)
        .await
        .unwrap();

        for _ in 0..2 {
            app.post(&format!("/add_to_cart/{id}"), "").await;
        }

        let (status, _, body) = app.get("/cart").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
        let (status, _, _) = app.get("/checkout").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
