//! Type-conditional parsing of the free-text `duration` column.

use crate::types::{Runtime, TitleKind};
use once_cell::sync::Lazy;
use regex::Regex;

// First maximal run of ASCII digits, compiled once.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("Invalid regex: digit run"));

/// Extract the first run of decimal digits in `raw` as a number.
///
/// Returns `None` for blank input, input without digits, or a run too large
/// for `u32`.
pub fn leading_number(raw: &str) -> Option<u32> {
    DIGIT_RUN
        .find(raw)
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Parse a duration cell into the unit implied by `kind`.
///
/// The extraction rule is the same for both kinds; only the destination
/// differs. `"90 min"` on a movie gives 90 minutes, `"3 Seasons"` on a show
/// gives 3 seasons.
pub fn parse_runtime(kind: TitleKind, raw: Option<&str>) -> Runtime {
    let value = raw.and_then(leading_number);
    match kind {
        TitleKind::Movie => Runtime::Minutes(value),
        TitleKind::TvShow => Runtime::Seasons(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("90 min"), Some(90));
        assert_eq!(leading_number("3 Seasons"), Some(3));
        assert_eq!(leading_number("1 Season"), Some(1));
        assert_eq!(leading_number("approx. 125 min (cut 2)"), Some(125));
        assert_eq!(leading_number("min"), None);
        assert_eq!(leading_number(""), None);
        assert_eq!(leading_number("   "), None);
    }

    #[test]
    fn test_leading_number_overflow_is_null() {
        assert_eq!(leading_number("99999999999999 min"), None);
    }

    #[test]
    fn test_movie_populates_minutes_only() {
        assert_eq!(
            parse_runtime(TitleKind::Movie, Some("90 min")),
            Runtime::Minutes(Some(90))
        );
        assert_eq!(
            parse_runtime(TitleKind::Movie, Some("")),
            Runtime::Minutes(None)
        );
    }

    #[test]
    fn test_show_populates_seasons_only() {
        assert_eq!(
            parse_runtime(TitleKind::TvShow, Some("3 Seasons")),
            Runtime::Seasons(Some(3))
        );
        assert_eq!(parse_runtime(TitleKind::TvShow, None), Runtime::Seasons(None));
    }

    #[test]
    fn test_show_with_minutes_text_still_counts_seasons() {
        // The slot is unit-ambiguous; kind decides the destination.
        assert_eq!(
            parse_runtime(TitleKind::TvShow, Some("45 min")),
            Runtime::Seasons(Some(45))
        );
    }
}
