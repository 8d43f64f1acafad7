//! Implementation of the `tidemark compare` command.
//!
//! Scores two strings the way a positive case is judged, without a page.

use anyhow::{bail, Result};
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::cli::ChecksFailed;
use crate::domain::models::LengthTier;
use crate::services::{classify_with, normalize, score, threshold_for};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Text the page produced
    pub received: String,

    /// Text the case expects
    pub expected: String,

    /// Length tier that selects the threshold (short, medium, long)
    #[arg(long, value_parser = parse_tier, default_value = "short")]
    pub tier: LengthTier,

    /// Explicit threshold in [0, 1], overriding the tier
    #[arg(long)]
    pub threshold: Option<f64>,
}

fn parse_tier(s: &str) -> Result<LengthTier, String> {
    LengthTier::from_str(s)
        .ok_or_else(|| format!("unknown tier '{s}' (expected short, medium or long)"))
}

#[derive(Debug, serde::Serialize)]
pub struct CompareOutput {
    pub received: String,
    pub expected: String,
    pub normalized_received: String,
    pub normalized_expected: String,
    pub tier: LengthTier,
    pub score: f64,
    pub threshold: f64,
    pub pass: bool,
}

impl CommandOutput for CompareOutput {
    fn to_human(&self) -> String {
        let verdict = if self.pass { "PASS" } else { "FAIL" };
        let mut lines = vec![format!(
            "{verdict}: score {:.3} against threshold {:.2} ({})",
            self.score, self.threshold, self.tier
        )];
        if !self.pass {
            lines.push(format!("  received: {}", self.normalized_received));
            lines.push(format!("  expected: {}", self.normalized_expected));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn compare(args: &CompareArgs) -> Result<CompareOutput> {
    let threshold = args.threshold.unwrap_or_else(|| threshold_for(args.tier));
    if !(0.0..=1.0).contains(&threshold) {
        bail!("Threshold must be within [0, 1], got {threshold}");
    }

    let verdict = classify_with(score(&args.received, &args.expected), threshold);
    Ok(CompareOutput {
        received: args.received.clone(),
        expected: args.expected.clone(),
        normalized_received: normalize(&args.received),
        normalized_expected: normalize(&args.expected),
        tier: args.tier,
        score: verdict.score(),
        threshold: verdict.threshold(),
        pass: verdict.pass(),
    })
}

pub async fn execute(args: CompareArgs, json_mode: bool) -> Result<()> {
    let result = compare(&args)?;
    let pass = result.pass;
    output(&result, json_mode);

    if !pass {
        return Err(ChecksFailed { failed: 1, total: 1 }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(received: &str, expected: &str) -> CompareArgs {
        CompareArgs {
            received: received.to_string(),
            expected: expected.to_string(),
            tier: LengthTier::Short,
            threshold: None,
        }
    }

    #[test]
    fn test_identical_text_passes() {
        let result = compare(&args("මම ගෙදර යනවා", "මම ගෙදර යනවා")).unwrap();
        assert!(result.pass);
        assert!((result.score - 1.0).abs() < f64::EPSILON);
        assert!((result.threshold - threshold_for(LengthTier::Short)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_forms_are_reported() {
        let result = compare(&args("  මම   ගෙදර ", "මම ගෙදර")).unwrap();
        assert_eq!(result.normalized_received, "මම ගෙදර");
        assert_eq!(result.normalized_expected, "මම ගෙදර");
    }

    #[test]
    fn test_explicit_threshold_overrides_tier() {
        let mut a = args("abcd", "abce");
        a.threshold = Some(0.7);
        let result = compare(&a).unwrap();
        assert!(result.pass);
        assert!((result.threshold - 0.7).abs() < f64::EPSILON);

        a.threshold = Some(1.5);
        assert!(compare(&a).is_err());
    }

    #[tokio::test]
    async fn test_mismatch_reports_failed_check() {
        let err = execute(args("abc", "xyz"), true).await.unwrap_err();
        assert!(err.downcast_ref::<ChecksFailed>().is_some());
    }
}
