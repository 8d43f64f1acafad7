//! Length-sensitive acceptance thresholds.

use crate::domain::models::{LengthTier, SimilarityVerdict};

/// Threshold used when a comparison names no tier.
pub const DEFAULT_THRESHOLD: f64 = 0.95;

/// Acceptance bar per tier. Longer outputs accumulate more benign spacing
/// and punctuation variation, so the bar drops as the tier grows.
pub const fn threshold_for(tier: LengthTier) -> f64 {
    match tier {
        LengthTier::Short => 0.95,
        LengthTier::Medium => 0.93,
        LengthTier::Long => 0.90,
    }
}

pub fn classify(score: f64, tier: LengthTier) -> SimilarityVerdict {
    classify_with(score, threshold_for(tier))
}

pub fn classify_with(score: f64, threshold: f64) -> SimilarityVerdict {
    SimilarityVerdict::new(score, threshold)
}
