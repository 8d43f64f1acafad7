//! Length tiers and similarity verdicts.

use serde::{Deserialize, Serialize};

/// Coarse size bucket of a case's input, used only to pick a threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthTier {
    #[default]
    #[serde(alias = "S", alias = "s")]
    Short,
    #[serde(alias = "M", alias = "m")]
    Medium,
    #[serde(alias = "L", alias = "l")]
    Long,
}

impl LengthTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "short" => Some(Self::Short),
            "m" | "medium" => Some(Self::Medium),
            "l" | "long" => Some(Self::Long),
            _ => None,
        }
    }
}

impl std::fmt::Display for LengthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing an observed value against an expected one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityVerdict {
    score: f64,
    threshold: f64,
    pass: bool,
}

impl SimilarityVerdict {
    /// Derive a verdict; `pass` is `score >= threshold`.
    pub fn new(score: f64, threshold: f64) -> Self {
        Self {
            score,
            threshold,
            pass: score >= threshold,
        }
    }

    pub const fn score(&self) -> f64 {
        self.score
    }

    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    pub const fn pass(&self) -> bool {
        self.pass
    }
}
