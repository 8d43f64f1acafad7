//! Whitespace normalization for comparisons.

/// Collapse every whitespace run to a single space and trim both ends.
///
/// Only characters with the Unicode `White_Space` property are touched;
/// combining marks and the zero-width joiner used in Sinhala conjuncts are
/// not whitespace and pass through unchanged.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs_and_newlines() {
        assert_eq!(normalize("  මම   වැඩට \n\t යනවා.  "), "මම වැඩට යනවා.");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\u{00A0}\t"), "");
    }

    #[test]
    fn test_preserves_zero_width_joiner() {
        let text = "ප්\u{200D}රමණය";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn test_idempotent_on_sample() {
        let once = normalize("ගිය  වසරෙ\nඅති වූ ");
        assert_eq!(normalize(&once), once);
    }
}
