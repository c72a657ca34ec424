//! HTTP request handlers for the ads API
//!
//! This module implements the request side of the dashboard backend:
//! - Listing stored ads and the metrics derived from them
//! - Persisting seeded ads and seeding new ones from submitted links
//! - Changing an ad's delivery status

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::database::{self, AppState};
use crate::error::ApiError;
use crate::intake::validate_link;
use crate::metrics::compute_totals;
use crate::model::{AdRecord, Insights, NewLinkPayload, StatusUpdate, Totals};
use crate::seeder::{RandomDraws, Seeder};

/// Lists every ad, oldest first
///
/// # Response
///
/// - **200 OK** - JSON array of ad records
pub async fn list_ads(State(state): State<AppState>) -> Result<Json<Vec<AdRecord>>, ApiError> {
    let ads = database::list_ads(&state.db)?;
    Ok(Json(ads))
}

/// Persists an already-seeded ad
///
/// # Response
///
/// - **201 Created** - The stored record
/// - **400 Bad Request** - `clicks` exceeds `reach`
/// - **409 Conflict** - An ad with this id already exists
pub async fn create_ad(
    State(state): State<AppState>,
    Json(record): Json<AdRecord>,
) -> Result<impl IntoResponse, ApiError> {
    record.check_invariants().map_err(ApiError::Validation)?;

    let stored = database::insert_ad(&state.db, &record)?;
    tracing::info!(id = %stored.id, platform = %stored.platform, "ad created");

    Ok((StatusCode::CREATED, Json(stored)))
}

/// Validates a submitted link, seeds an ad from it and persists the result
///
/// # Request Body
///
/// ```json
/// {
///   "title": "February drop teaser",
///   "platform": "Instagram",
///   "url": "https://instagram.com/p/abc"
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - The seeded ad
/// - **400 Bad Request** - Missing title/url, unparseable url, or a url
///   whose domain does not belong to the selected platform
pub async fn create_from_link(
    State(state): State<AppState>,
    Json(payload): Json<NewLinkPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(err) = validate_link(&payload) {
        tracing::info!(error = %err, "link rejected");
        return Err(err.into());
    }

    let record = {
        let mut seeder = Seeder::new(RandomDraws::new(rand::rng()), state.clock.clone());
        seeder.seed(&payload)
    };

    let stored = database::insert_ad(&state.db, &record)?;
    tracing::info!(
        id = %stored.id,
        platform = %stored.platform,
        ctr = stored.ctr,
        sentiment = ?stored.sentiment,
        "ad seeded from link"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

/// Sets an ad's status explicitly
///
/// # Request Body
///
/// ```json
/// { "status": "paused" }
/// ```
///
/// # Response
///
/// - **200 OK** - The updated record
/// - **404 Not Found** - No ad with this id
pub async fn update_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<AdRecord>, ApiError> {
    let updated =
        database::set_status(&state.db, &id, update.status)?.ok_or(ApiError::NotFound(id))?;
    tracing::info!(id = %updated.id, status = ?updated.status, "ad status set");
    Ok(Json(updated))
}

/// Flips an ad between active and paused
pub async fn toggle_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AdRecord>, ApiError> {
    let updated = database::toggle_status(&state.db, &id)?.ok_or(ApiError::NotFound(id))?;
    tracing::info!(id = %updated.id, status = ?updated.status, "ad status toggled");
    Ok(Json(updated))
}

/// Aggregate totals over all stored ads
pub async fn summary(State(state): State<AppState>) -> Result<Json<Totals>, ApiError> {
    let ads = database::list_ads(&state.db)?;
    Ok(Json(compute_totals(&ads)))
}

/// Active hot and cool cohorts
pub async fn insights(State(state): State<AppState>) -> Result<Json<Insights>, ApiError> {
    let ads = database::list_ads(&state.db)?;
    Ok(Json(Insights::from_ads(&ads)))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
