//! Numeric token classification for recognized HUD text.
//!
//! The recognizer returns unlabeled digits; which field a number belongs to
//! is decided purely by value ranges hand-tuned to the simulator's fixed
//! panel layout. Ranges overlap, so rules run in a fixed priority order and
//! a value already claimed by an earlier field is not reused. This is a
//! lossy heuristic by design: it trades generality for accuracy on the one
//! layout it targets.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::shot::{Field, ShotFields};

/// Decimal numeric substrings: optional sign, optional fractional part.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("number pattern compiles"));

/// One classification rule: claims `field` when the token value lies in
/// `[min, max]` and none of `excludes` already holds the same value.
#[derive(Debug, Clone)]
pub struct RangeRule {
    pub field: Field,
    pub min: f64,
    pub max: f64,
    pub excludes: Vec<Field>,
}

impl RangeRule {
    pub fn new(field: Field, min: f64, max: f64, excludes: &[Field]) -> Self {
        Self {
            field,
            min,
            max,
            excludes: excludes.to_vec(),
        }
    }
}

/// Priority-ordered rule table.
///
/// The default is tuned to one specific simulator layout; swap in a custom
/// table for displays with different value ranges.
#[derive(Debug, Clone)]
pub struct RangeTable {
    pub rules: Vec<RangeRule>,
}

impl Default for RangeTable {
    fn default() -> Self {
        use Field::*;
        Self {
            rules: vec![
                RangeRule::new(CarryDistance, 40.0, 80.0, &[]),
                RangeRule::new(TotalDistance, 50.0, 90.0, &[CarryDistance]),
                RangeRule::new(ClubHeadSpeed, 45.0, 70.0, &[CarryDistance, TotalDistance]),
                RangeRule::new(
                    BallSpeed,
                    45.0,
                    70.0,
                    &[ClubHeadSpeed, CarryDistance, TotalDistance],
                ),
                RangeRule::new(SpinRate, 3000.0, 8000.0, &[]),
                RangeRule::new(LaunchAngle, 10.0, 50.0, &[CarryDistance, TotalDistance]),
            ],
        }
    }
}

/// Rounds a derived ratio to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classifies recognized text into a partial field set.
///
/// Lines are trimmed and scanned in order; each numeric token is offered to
/// the rules in priority order and claimed by the first unfilled rule whose
/// range and exclusion guards pass. Tokens matching nothing are discarded.
/// Returns `None` when no field was assigned at all. When both speeds were
/// assigned the smash factor is derived, rounded to two decimals.
///
/// A pure function of the token sequence: identical text always yields the
/// same assignment.
pub fn classify_text(text: &str, table: &RangeTable) -> Option<ShotFields> {
    let mut fields = ShotFields::default();
    let mut found = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        for token in NUMBER_RE.find_iter(line) {
            let Ok(value) = token.as_str().parse::<f64>() else {
                continue;
            };
            for rule in &table.rules {
                if fields.get(rule.field).is_some() {
                    continue;
                }
                if value < rule.min || value > rule.max {
                    continue;
                }
                if rule
                    .excludes
                    .iter()
                    .any(|&other| fields.get(other) == Some(value))
                {
                    continue;
                }
                debug!(?rule.field, value, "claimed token");
                fields.set(rule.field, value);
                found = true;
                break;
            }
        }
    }

    if !found {
        return None;
    }

    if let (Some(ball), Some(club)) = (fields.ball_speed, fields.club_head_speed) {
        fields.smash_factor = Some(round2(ball / club));
    }

    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Option<ShotFields> {
        classify_text(text, &RangeTable::default())
    }

    #[test]
    fn test_full_panel_readout() {
        // Values from a real simulator debug capture, one per line in the
        // order the panel displays them.
        let fields = classify("50.1\n56.3\n54.0\n53.6\n5150\n32.6").unwrap();
        assert_eq!(fields.carry_distance, Some(50.1));
        assert_eq!(fields.total_distance, Some(56.3));
        assert_eq!(fields.club_head_speed, Some(54.0));
        assert_eq!(fields.ball_speed, Some(53.6));
        assert_eq!(fields.spin_rate, Some(5150.0));
        assert_eq!(fields.launch_angle, Some(32.6));
    }

    #[test]
    fn test_no_in_range_token_yields_none() {
        assert!(classify("1 2 3\n999").is_none());
        assert!(classify("").is_none());
        assert!(classify("\n \n").is_none());
    }

    #[test]
    fn test_deterministic() {
        let text = "50.1\n56.3\n54.0\n53.6";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn test_exclusivity_under_overlap() {
        // Carry and total are claimed first; the next 65.0 then lands on
        // club head speed, and the second identical 65.0 is excluded from
        // ball speed by the already-claimed-value guard.
        let fields = classify("50.1 56.3 65.0 65.0").unwrap();
        assert_eq!(fields.club_head_speed, Some(65.0));
        assert!(fields.ball_speed.is_none());
        assert!(fields.smash_factor.is_none());
    }

    #[test]
    fn test_duplicate_value_not_reused_across_distances() {
        // 65.0 claims carry; the second 65.0 cannot claim total (guard) and
        // cannot claim club/ball either since the value is already taken.
        let fields = classify("65.0 65.0").unwrap();
        assert_eq!(fields.carry_distance, Some(65.0));
        assert!(fields.total_distance.is_none());
        assert!(fields.club_head_speed.is_none());
        assert!(fields.ball_speed.is_none());
    }

    #[test]
    fn test_smash_factor_rounded_two_decimals() {
        use Field::*;
        // Ranges shifted so mph-scale speeds classify; the default table
        // targets a panel that displays lower values.
        let table = RangeTable {
            rules: vec![
                RangeRule::new(ClubHeadSpeed, 75.0, 90.0, &[]),
                RangeRule::new(BallSpeed, 100.0, 130.0, &[ClubHeadSpeed]),
            ],
        };
        let fields = classify_text("80.3\n116.1", &table).unwrap();
        assert_eq!(fields.ball_speed, Some(116.1));
        assert_eq!(fields.club_head_speed, Some(80.3));
        // 116.1 / 80.3 = 1.4458... rounds to 1.45
        assert_eq!(fields.smash_factor, Some(1.45));
    }

    #[test]
    fn test_spin_rate_only() {
        let fields = classify("5150").unwrap();
        assert_eq!(fields.spin_rate, Some(5150.0));
        assert!(fields.carry_distance.is_none());
    }

    #[test]
    fn test_tokens_scanned_in_first_seen_order() {
        // Same tokens, opposite order: the first in-range value always
        // claims the highest-priority open field.
        let a = classify("41.0 79.0").unwrap();
        assert_eq!(a.carry_distance, Some(41.0));
        assert_eq!(a.total_distance, Some(79.0));

        let b = classify("79.0 41.0").unwrap();
        assert_eq!(b.carry_distance, Some(79.0));
        assert!(b.total_distance.is_none()); // 41.0 is below total's range
    }

    #[test]
    fn test_out_of_range_tokens_discarded_silently() {
        let fields = classify("garbage 12000 50.1 -5").unwrap();
        assert_eq!(fields.carry_distance, Some(50.1));
        assert!(fields.spin_rate.is_none());
    }
}
