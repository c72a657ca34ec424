//! Creation-time seeding of new ads
//!
//! A submitted link becomes a full [`AdRecord`] with plausible starting
//! numbers. Randomness and the current date come in through the [`Draws`]
//! and [`Clock`] traits so callers (and tests) can pin both.

use std::ops::Range;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::metrics::{ctr_percent, round_one_decimal};
use crate::model::{AdRecord, AdStatus, NewLinkPayload, Sentiment};

pub const REACH_RANGE: Range<u64> = 2400..6600;
pub const CLICK_RATE_RANGE: Range<f64> = 0.03..0.07;
pub const CONVERSION_RATE_RANGE: Range<f64> = 0.08..0.15;

/// Every new ad reports at least this many conversions
pub const MIN_CONVERSIONS: u64 = 4;

/// CTR strictly above this is hot
pub const HOT_CTR: f64 = 5.0;
/// CTR strictly above this (and not hot) is steady
pub const STEADY_CTR: f64 = 3.0;

/// Source of the three random values used to seed an ad
pub trait Draws {
    /// Seeded reach, expected in [`REACH_RANGE`]
    fn reach(&mut self) -> u64;
    /// Fraction of reach that clicked, expected in [`CLICK_RATE_RANGE`]
    fn click_rate(&mut self) -> f64;
    /// Fraction of clicks that converted, expected in [`CONVERSION_RATE_RANGE`]
    fn conversion_rate(&mut self) -> f64;
}

/// Draws sampled uniformly from the seeding ranges
pub struct RandomDraws<R> {
    rng: R,
}

impl<R: Rng> RandomDraws<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Draws for RandomDraws<R> {
    fn reach(&mut self) -> u64 {
        self.rng.random_range(REACH_RANGE)
    }

    fn click_rate(&mut self) -> f64 {
        self.rng.random_range(CLICK_RATE_RANGE)
    }

    fn conversion_rate(&mut self) -> f64 {
        self.rng.random_range(CONVERSION_RATE_RANGE)
    }
}

/// Replays the same values on every call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDraws {
    pub reach: u64,
    pub click_rate: f64,
    pub conversion_rate: f64,
}

impl Draws for FixedDraws {
    fn reach(&mut self) -> u64 {
        self.reach
    }

    fn click_rate(&mut self) -> f64 {
        self.click_rate
    }

    fn conversion_rate(&mut self) -> f64 {
        self.conversion_rate
    }
}

/// Supplies the creation date stamped on new ads
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Current UTC date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Buckets a CTR into a sentiment
///
/// Thresholds are strict: exactly 5.0 is steady and exactly 3.0 is cool.
pub fn classify(ctr: f64) -> Sentiment {
    if ctr > HOT_CTR {
        Sentiment::Hot
    } else if ctr > STEADY_CTR {
        Sentiment::Steady
    } else {
        Sentiment::Cool
    }
}

/// Builds new ad records from submitted links
pub struct Seeder<D, C> {
    draws: D,
    clock: C,
}

impl<D: Draws, C: Clock> Seeder<D, C> {
    pub fn new(draws: D, clock: C) -> Self {
        Self { draws, clock }
    }

    /// Synthesizes a fresh, active ad for the given link
    ///
    /// Title and URL are trimmed. Counters come from the injected draws:
    /// `clicks = floor(reach * click_rate)` and
    /// `conversions = max(4, floor(clicks * conversion_rate))`.
    pub fn seed(&mut self, payload: &NewLinkPayload) -> AdRecord {
        let reach = self.draws.reach();
        let clicks = (reach as f64 * self.draws.click_rate()).floor() as u64;
        let conversions =
            ((clicks as f64 * self.draws.conversion_rate()).floor() as u64).max(MIN_CONVERSIONS);
        let ctr = round_one_decimal(ctr_percent(clicks, reach));

        AdRecord {
            id: format!("ad-{}", Uuid::new_v4()),
            title: payload.title.trim().to_string(),
            platform: payload.platform,
            url: payload.url.trim().to_string(),
            reach,
            clicks,
            ctr,
            conversions,
            status: AdStatus::Active,
            sentiment: classify(ctr),
            created_at: self.clock.today(),
        }
    }
}
