//! Aggregate performance metrics over a collection of ads

use crate::model::{AdRecord, AdStatus, Totals};

/// Clicks as a percentage of reach, zero when there is no reach
pub fn ctr_percent(clicks: u64, reach: u64) -> f64 {
    if reach == 0 {
        return 0.0;
    }
    (clicks as f64 / reach as f64) * 100.0
}

/// Rounds to one decimal place using the exact binary value of `value`
///
/// `value * 10.0` can itself round across a half boundary (3.0499.. becomes
/// 30.5), so the decision is made on the mantissa instead: the result is the
/// tenth nearest to the true value, with exact ties going away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let bits = value.abs().to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = u128::from(bits & ((1u64 << 52) - 1));
    // value == mantissa * 2^exp
    let (mantissa, exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u128 << 52), biased_exp - 1075)
    };

    if exp >= 0 {
        // Already an integer
        return value;
    }

    let scaled = mantissa * 10;
    let tenths = if -exp >= 127 {
        0
    } else {
        let shift = (-exp) as u32;
        let whole = scaled >> shift;
        let remainder = scaled & ((1u128 << shift) - 1);
        if remainder << 1 >= 1u128 << shift {
            whole + 1
        } else {
            whole
        }
    };

    (tenths as f64 / 10.0).copysign(value)
}

/// Reduces a collection of ads into summary totals
///
/// Counters are summed over every ad regardless of status; only `active`
/// looks at status. Empty input yields all-zero totals. Sums saturate at
/// `u64::MAX` rather than wrap.
pub fn compute_totals(ads: &[AdRecord]) -> Totals {
    let mut totals = ads.iter().fold(Totals::default(), |mut acc, ad| {
        acc.reach = acc.reach.saturating_add(ad.reach);
        acc.clicks = acc.clicks.saturating_add(ad.clicks);
        acc.conversions = acc.conversions.saturating_add(ad.conversions);
        if ad.status == AdStatus::Active {
            acc.active += 1;
        }
        acc
    });

    totals.ctr = ctr_percent(totals.clicks, totals.reach);
    totals.cpa = if totals.conversions == 0 {
        0.0
    } else {
        totals.reach as f64 / totals.conversions as f64
    };

    totals
}
