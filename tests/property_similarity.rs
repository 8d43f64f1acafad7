use proptest::prelude::*;
use tidemark::domain::models::{LengthTier, WatchPredicate};
use tidemark::services::{classify, levenshtein, normalize, score, threshold_for};

const TIERS: [LengthTier; 3] = [LengthTier::Short, LengthTier::Medium, LengthTier::Long];

fn text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ම ගෙදර යනවා\t\n]{0,24}").unwrap()
}

proptest! {
    /// Normalizing twice changes nothing
    #[test]
    fn prop_normalize_idempotent(s in text()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn prop_score_identity(s in text()) {
        prop_assert!((score(&s, &s) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn prop_score_symmetric_and_bounded(a in text(), b in text()) {
        let ab = score(&a, &b);
        prop_assert!((ab - score(&b, &a)).abs() < f64::EPSILON);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    /// Distance never exceeds the longer length, nor falls below the length gap
    #[test]
    fn prop_levenshtein_bounds(a in text(), b in text()) {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let d = levenshtein(&a, &b);
        prop_assert!(d <= a.len().max(b.len()));
        prop_assert!(d >= a.len().abs_diff(b.len()));
    }

    /// A score that passes a tier passes every looser tier too
    #[test]
    fn prop_tolerance_monotonic(score in 0.0f64..=1.0) {
        for (i, strict) in TIERS.iter().enumerate() {
            for loose in &TIERS[i..] {
                prop_assert!(threshold_for(*loose) <= threshold_for(*strict));
                if classify(score, *strict).pass() {
                    prop_assert!(classify(score, *loose).pass());
                }
            }
        }
    }

    /// Predicates ignore surrounding whitespace
    #[test]
    fn prop_predicates_trim(prev in text(), cur in text()) {
        for predicate in [WatchPredicate::Changed, WatchPredicate::NonEmptyAndChanged, WatchPredicate::Emptied] {
            let padded = format!("  {cur}\n");
            prop_assert_eq!(predicate.holds(&prev, &cur), predicate.holds(&prev, &padded));
        }
    }
}
