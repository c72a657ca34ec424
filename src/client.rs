//! HTTP client for the ads API
//!
//! This is the transport side the dashboard talks through. Any non-success
//! response is surfaced as [`ClientError::Transport`] carrying the server's
//! message: the `error` field of a JSON error body, or the raw body text
//! otherwise. Nothing is retried here.

use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::intake::{validate_link, ValidationError};
use crate::model::{AdRecord, AdStatus, NewLinkPayload, StatusUpdate};
use crate::seeder::{Clock, Draws, Seeder};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The link was rejected before anything was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct AdsClient {
    http: Client,
    base_url: String,
}

impl AdsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn ads_endpoint(&self) -> String {
        format!("{}/ads", self.base_url)
    }

    /// Fetches the current ad collection
    pub async fn list(&self) -> Result<Vec<AdRecord>, ClientError> {
        let response = self.http.get(self.ads_endpoint()).send().await?;
        parse_json(response).await
    }

    /// Persists a seeded record and returns the stored version
    pub async fn create(&self, record: &AdRecord) -> Result<AdRecord, ClientError> {
        let response = self
            .http
            .post(self.ads_endpoint())
            .json(record)
            .send()
            .await?;
        parse_json(response).await
    }

    /// Persists a status change and returns the updated record
    pub async fn set_status(&self, id: &str, status: AdStatus) -> Result<AdRecord, ClientError> {
        let response = self
            .http
            .patch(format!("{}/{id}", self.ads_endpoint()))
            .json(&StatusUpdate { status })
            .send()
            .await?;
        parse_json(response).await
    }

    /// Requests the opposite of the ad's current status
    pub async fn toggle_status(&self, ad: &AdRecord) -> Result<AdRecord, ClientError> {
        self.set_status(&ad.id, ad.status.toggled()).await
    }

    /// Validates a link, seeds an ad from it locally and creates it
    pub async fn create_ad_from_link<D, C>(
        &self,
        payload: &NewLinkPayload,
        seeder: &mut Seeder<D, C>,
    ) -> Result<AdRecord, ClientError>
    where
        D: Draws,
        C: Clock,
    {
        validate_link(payload)?;
        let record = seeder.seed(payload);
        tracing::debug!(id = %record.id, "submitting seeded ad");
        self.create(&record).await
    }
}

/// Error envelope rendered by the server, `{"error": ..., "code": ...}`
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Picks the human-readable message out of a failed response body
fn error_message(body: String, status: u16) -> String {
    if body.trim().is_empty() {
        return format!("Request failed with status {status}");
    }
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(envelope) => envelope.error,
        Err(_) => body,
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = error_message(body, status.as_u16());
        tracing::warn!(status = status.as_u16(), %message, "ads API request failed");
        return Err(ClientError::Transport(message));
    }

    Ok(response.json::<T>().await?)
}
