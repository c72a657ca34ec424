//! Validation of submitted content links
//!
//! A link is accepted only when it has a title and its URL host belongs to
//! the selected platform's domain allow-list. Rejected links never reach
//! the seeder.

use thiserror::Error;
use url::Url;

use crate::model::{NewLinkPayload, Platform};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("url is required")]
    MissingUrl,

    #[error("url is not valid: {0}")]
    InvalidUrl(String),

    #[error("URL domain {host} does not match platform {platform}")]
    PlatformMismatch { host: String, platform: Platform },
}

/// Extracts the normalized host of a user-entered link
///
/// Input without an `http` prefix is treated as `https://<input>`. A
/// leading `www.` is dropped and the result is lowercased. Returns `None`
/// for blank or unparseable input.
pub fn host_of(raw: &str) -> Option<String> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return None;
    }

    let parsed = if candidate.starts_with("http") {
        Url::parse(candidate).ok()?
    } else {
        Url::parse(&format!("https://{candidate}")).ok()?
    };

    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// True when `host` is one of the platform's domains or a subdomain of one
pub fn host_matches(platform: Platform, host: &str) -> bool {
    platform.allowed_domains().iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Checks a submission before it is seeded
pub fn validate_link(payload: &NewLinkPayload) -> Result<(), ValidationError> {
    if payload.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if payload.url.trim().is_empty() {
        return Err(ValidationError::MissingUrl);
    }

    let host = host_of(&payload.url)
        .ok_or_else(|| ValidationError::InvalidUrl(payload.url.trim().to_string()))?;

    if !host_matches(payload.platform, &host) {
        return Err(ValidationError::PlatformMismatch {
            host,
            platform: payload.platform,
        });
    }

    Ok(())
}
