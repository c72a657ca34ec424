//! Route definitions for the ads API
//!
//! This module configures all HTTP routes and maps them to their respective handlers.

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::database::AppState;
use crate::handler::{
    create_ad, create_from_link, health, insights, list_ads, summary, toggle_status,
    update_status,
};
use crate::middleware::auth_middleware;

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `GET /health` - Liveness check (public)
/// - `GET /ads` - Lists all ads, oldest first
/// - `POST /ads` - Persists a seeded ad
/// - `GET /ads/summary` - Aggregate totals
/// - `GET /ads/insights` - Active hot/cool cohorts
/// - `PATCH /ads/{id}` - Sets an ad's status
/// - `POST /ads/{id}/toggle` - Flips an ad's status
/// - `POST /links` - Validates a link and seeds a new ad from it
///
/// Everything except `/health` goes through the authorization check.
///
/// # Example Usage
///
/// ```no_run
/// # use adpulse::database::{init_db, AppState};
/// # use adpulse::route::create_app;
/// # let db = init_db("ads.db").unwrap();
/// let app = create_app(AppState::new(db));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/ads", get(list_ads).post(create_ad))
        .route("/ads/summary", get(summary))
        .route("/ads/insights", get(insights))
        .route("/ads/{id}", patch(update_status))
        .route("/ads/{id}/toggle", post(toggle_status))
        .route("/links", post(create_from_link))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
}
