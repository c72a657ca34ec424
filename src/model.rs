//! Data models for the ads dashboard
//!
//! This module defines the records exchanged with the ads API: the stored
//! ad itself, the payload used to submit a new content link, and the
//! derived views (totals and insight cohorts) computed over a collection.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Social platforms a content link can come from
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Instagram,
    TikTok,
    LinkedIn,
    Facebook,
    X,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::TikTok,
        Platform::LinkedIn,
        Platform::Facebook,
        Platform::X,
    ];

    /// Domains accepted as the host of a link submitted for this platform
    ///
    /// A host matches when it equals one of these domains or is a
    /// subdomain of one (e.g. `m.facebook.com`).
    pub fn allowed_domains(self) -> &'static [&'static str] {
        match self {
            Platform::Instagram => &["instagram.com"],
            Platform::TikTok => &["tiktok.com"],
            Platform::LinkedIn => &["linkedin.com"],
            Platform::Facebook => &["facebook.com", "fb.com"],
            Platform::X => &["x.com", "twitter.com"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::LinkedIn => "LinkedIn",
            Platform::Facebook => "Facebook",
            Platform::X => "X",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of an ad
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    Active,
    Paused,
}

impl AdStatus {
    /// The only transition: active becomes paused and paused becomes active
    pub fn toggled(self) -> Self {
        match self {
            AdStatus::Active => AdStatus::Paused,
            AdStatus::Paused => AdStatus::Active,
        }
    }
}

/// Qualitative performance bucket assigned once, at creation, from the seeded CTR
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Hot,
    Steady,
    Cool,
}

/// A tracked AI-generated ad tied to a source content link
///
/// Records are stored as JSON using camelCase keys, matching what the
/// dashboard consumes:
///
/// ```json
/// {
///   "id": "ad-5b0c...",
///   "title": "February drop teaser",
///   "platform": "Instagram",
///   "url": "https://instagram.com/p/abc",
///   "reach": 3000,
///   "clicks": 150,
///   "ctr": 5.0,
///   "conversions": 15,
///   "status": "active",
///   "sentiment": "steady",
///   "createdAt": "2026-02-01"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdRecord {
    /// Opaque unique identifier, never changes after creation
    pub id: String,

    pub title: String,
    pub platform: Platform,

    /// Source content link the ad was generated from
    pub url: String,

    /// Audience impressions attributed to the ad
    pub reach: u64,
    pub clicks: u64,

    /// Click-through rate in percent, rounded to one decimal
    pub ctr: f64,

    pub conversions: u64,
    pub status: AdStatus,
    pub sentiment: Sentiment,

    /// Day the ad was created (no time-of-day component)
    pub created_at: NaiveDate,
}

impl AdRecord {
    /// Returns a copy of this record with its status flipped
    ///
    /// Counters, CTR and sentiment are carried over untouched.
    pub fn with_status_toggled(&self) -> Self {
        self.with_status(self.status.toggled())
    }

    /// Returns a copy of this record with the given status
    pub fn with_status(&self, status: AdStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Checks the counter invariant a stored record must satisfy
    ///
    /// Returns a human-readable reason when `clicks` exceeds `reach`.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.clicks > self.reach {
            return Err(format!(
                "clicks ({}) cannot exceed reach ({})",
                self.clicks, self.reach
            ));
        }
        Ok(())
    }
}

/// Request payload for submitting a new content link
///
/// # Example
/// ```json
/// {
///   "title": "February drop teaser",
///   "platform": "TikTok",
///   "url": "https://www.tiktok.com/@brand/video/123"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewLinkPayload {
    pub title: String,
    pub platform: Platform,
    pub url: String,
}

/// Aggregate metrics over a collection of ads, used by the overview cards
///
/// `cpa` is reach per conversion. There is no spend anywhere in the data
/// model, so it is a cost proxy rather than a currency amount.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub reach: u64,
    pub clicks: u64,
    pub conversions: u64,

    /// Number of ads currently active
    pub active: usize,

    /// Overall click-through rate in percent (unrounded)
    pub ctr: f64,
    pub cpa: f64,
}

/// Active ads split into winners and underperformers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Insights {
    pub hot: Vec<AdRecord>,
    pub cool: Vec<AdRecord>,
}

/// Request body for changing an ad's status
///
/// # Example
/// ```json
/// { "status": "paused" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StatusUpdate {
    pub status: AdStatus,
}
