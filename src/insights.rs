//! Cohort selection for the insights view
//!
//! Only active ads are surfaced. Steady ads never appear in either cohort;
//! they show up in the full listing and the totals only.

use crate::model::{AdRecord, AdStatus, Insights, Sentiment};

fn select_active(ads: &[AdRecord], sentiment: Sentiment) -> Vec<AdRecord> {
    ads.iter()
        .filter(|ad| ad.status == AdStatus::Active && ad.sentiment == sentiment)
        .cloned()
        .collect()
}

/// High-performing active ads, in input order
pub fn select_hot(ads: &[AdRecord]) -> Vec<AdRecord> {
    select_active(ads, Sentiment::Hot)
}

/// Underperforming active ads that may need intervention, in input order
pub fn select_cool(ads: &[AdRecord]) -> Vec<AdRecord> {
    select_active(ads, Sentiment::Cool)
}

impl Insights {
    pub fn from_ads(ads: &[AdRecord]) -> Self {
        Self {
            hot: select_hot(ads),
            cool: select_cool(ads),
        }
    }
}
