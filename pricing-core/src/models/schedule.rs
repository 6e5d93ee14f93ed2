//! Parsing of schedule count lists.
//!
//! Class-size and classes-per-week inputs arrive as comma-separated lists
//! where each token is either a single count (`"4"`) or an inclusive range
//! (`"2-5"`). Malformed or non-positive tokens are dropped rather than
//! rejected, so a partially valid list still produces a usable schedule.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static RANGE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)\s*-\s*(-?\d+(?:\.\d+)?)$").expect("range pattern is valid")
});

/// Parses a comma-separated list of counts into a deduplicated, ascending
/// list of positive integers.
///
/// Supported token forms:
/// - single values (`"3"`), decimals are rounded half away from zero
/// - inclusive ranges (`"2-5"`), reversed bounds are normalized (`"5-2"`)
///
/// Tokens that do not parse, and values that round to zero or below, are
/// silently skipped.
///
/// # Examples
///
/// ```
/// use pricing_core::models::schedule::parse_count_list;
///
/// assert_eq!(parse_count_list("1-3, 5"), vec![1, 2, 3, 5]);
/// assert_eq!(parse_count_list("4, oops, -2"), vec![4]);
/// ```
pub fn parse_count_list(raw: &str) -> Vec<u32> {
    let mut values = BTreeSet::new();

    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some(captures) = RANGE_TOKEN.captures(token) {
            let start = captures[1].parse::<f64>().ok().map(round_count);
            let end = captures[2].parse::<f64>().ok().map(round_count);
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };
            let (low, high) = if start <= end { (start, end) } else { (end, start) };
            for value in low..=high {
                if value > 0 {
                    values.insert(value as u32);
                }
            }
            continue;
        }

        if let Ok(parsed) = token.parse::<f64>() {
            let rounded = round_count(parsed);
            if rounded > 0 {
                values.insert(rounded as u32);
            }
        }
    }

    values.into_iter().collect()
}

fn round_count(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_single_values() {
        assert_eq!(parse_count_list("4"), vec![4]);
    }

    #[test]
    fn parses_comma_separated_values_sorted() {
        assert_eq!(parse_count_list("5, 2, 9"), vec![2, 5, 9]);
    }

    #[test]
    fn expands_inclusive_ranges() {
        assert_eq!(parse_count_list("2-5"), vec![2, 3, 4, 5]);
    }

    #[test]
    fn normalizes_reversed_ranges() {
        assert_eq!(parse_count_list("5-2"), vec![2, 3, 4, 5]);
    }

    #[test]
    fn deduplicates_overlapping_tokens() {
        assert_eq!(parse_count_list("1-3, 2, 3-4"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn rounds_decimal_tokens() {
        assert_eq!(parse_count_list("2.4, 3.6"), vec![2, 4]);
    }

    #[test]
    fn drops_non_positive_values() {
        assert_eq!(parse_count_list("0, -3, 2"), vec![2]);
    }

    #[test]
    fn clips_range_starting_below_one() {
        // Range may begin at or below zero; only the positive part survives.
        assert_eq!(parse_count_list("-1-2"), vec![1, 2]);
    }

    #[test]
    fn drops_malformed_tokens() {
        assert_eq!(parse_count_list("three, 2, 4-x"), vec![2]);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        assert_eq!(parse_count_list(""), Vec::<u32>::new());
        assert_eq!(parse_count_list("  ,  ,"), Vec::<u32>::new());
    }
}
