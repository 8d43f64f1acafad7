//! Verification of observed output against expectations.
//!
//! Two comparison modes are in use. Similarity checks score the *raw* text,
//! so spacing differences count against the score; equality checks compare
//! *normalized* text so formatting noise is ignored.

use super::normalization::normalize;
use super::similarity::score;
use super::tolerance::classify_with;
use crate::domain::errors::VerificationMismatch;
use crate::domain::models::SimilarityVerdict;

/// Raw similarity of `received` to `expected` must reach `threshold`.
pub fn similar(
    received: &str,
    expected: &str,
    threshold: f64,
) -> Result<SimilarityVerdict, VerificationMismatch> {
    let verdict = classify_with(score(received, expected), threshold);
    if verdict.pass() {
        Ok(verdict)
    } else {
        Err(VerificationMismatch {
            verdict,
            received: received.to_string(),
            expected: expected.to_string(),
        })
    }
}

/// Normalized output differs from the expected text.
pub fn differs(actual: &str, expected: &str) -> bool {
    normalize(actual) != normalize(expected)
}

/// Output exists but was produced as one unsegmented run of characters.
pub fn unsegmented(actual: &str) -> bool {
    let trimmed = actual.trim();
    !trimmed.is_empty() && !trimmed.chars().any(char::is_whitespace)
}

/// Both fields read back empty after a clear.
pub fn cleared(input: &str, output: &str) -> bool {
    input.is_empty() && normalize(output).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_passes_identical_text() {
        let verdict = similar("මම ගමනක් යනවා.", "මම ගමනක් යනවා.", 0.95).unwrap();
        assert!((verdict.score() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_similar_reports_mismatch_with_both_strings() {
        let mismatch = similar("u එනවද?", "උ එනවද?", 0.95).unwrap_err();
        assert!(!mismatch.verdict.pass());
        assert_eq!(mismatch.received, "u එනවද?");
        assert_eq!(mismatch.expected, "උ එනවද?");
    }

    #[test]
    fn test_differs_ignores_formatting() {
        assert!(!differs(" මම  ගෙදර\nයනවා ", "මම ගෙදර යනවා"));
        assert!(differs("u enavadha?", "u එනවද?"));
    }

    #[test]
    fn test_unsegmented() {
        assert!(unsegmented(" මමගෙදරයනවා "));
        assert!(!unsegmented("මම ගෙදර"));
        assert!(!unsegmented("   "));
    }

    #[test]
    fn test_cleared_requires_exactly_empty_input() {
        assert!(cleared("", " \n"));
        assert!(!cleared(" ", ""));
        assert!(!cleared("", "මම"));
    }
}
