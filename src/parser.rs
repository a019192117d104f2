//! Parser for free-text model answers.
//!
//! The model is prompted to preface any data readout with a fixed marker
//! and labeled lines, e.g.
//!
//! ```text
//! GOLF_DATA:
//! Ball Speed: 116.1 mph
//! Carry: 135 yds
//! ```
//!
//! Text without the marker is ignored entirely, not even scanned.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::shot::{Field, ShotFields};

/// Marker string that activates parsing of a model answer.
pub const DATA_SENTINEL: &str = "GOLF_DATA:";

/// Labeled-line patterns in display order, each capturing a decimal number.
static LABEL_PATTERNS: LazyLock<Vec<(Regex, Field)>> = LazyLock::new(|| {
    [
        ("Ball Speed:", Field::BallSpeed),
        ("Club Speed:", Field::ClubHeadSpeed),
        ("Carry:", Field::CarryDistance),
        ("Total:", Field::TotalDistance),
        ("Spin Rate:", Field::SpinRate),
        ("Launch Angle:", Field::LaunchAngle),
    ]
    .into_iter()
    .map(|(label, field)| {
        let pattern = format!(r"(?i){label}\s*([0-9.]+)");
        (Regex::new(&pattern).expect("label pattern compiles"), field)
    })
    .collect()
});

/// Parses a sentinel-tagged model answer into a partial field set.
///
/// Returns `None` when the sentinel is absent or no labeled line matched.
/// A label appearing on several lines keeps the last value. When both
/// speeds are present the smash factor is the raw, unrounded ratio (unlike
/// the OCR path, which rounds).
pub fn parse_response(text: &str) -> Option<ShotFields> {
    if !text.contains(DATA_SENTINEL) {
        return None;
    }

    let mut fields = ShotFields::default();
    let mut found = false;

    for line in text.lines() {
        for (pattern, field) in LABEL_PATTERNS.iter() {
            let Some(captures) = pattern.captures(line) else {
                continue;
            };
            let Ok(value) = captures[1].parse::<f64>() else {
                continue;
            };
            debug!(?field, value, "parsed labeled line");
            fields.set(*field, value);
            found = true;
        }
    }

    if !found {
        return None;
    }

    if let (Some(ball), Some(club)) = (fields.ball_speed, fields.club_head_speed) {
        fields.smash_factor = Some(ball / club);
    }

    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_labeled_lines() {
        let fields =
            parse_response("GOLF_DATA:\nBall Speed: 116.1 mph\nCarry: 135 yds").unwrap();
        assert_eq!(fields.ball_speed, Some(116.1));
        assert_eq!(fields.carry_distance, Some(135.0));
        assert!(fields.club_head_speed.is_none());
        assert!(fields.total_distance.is_none());
        assert!(fields.spin_rate.is_none());
        assert!(fields.launch_angle.is_none());
        assert!(fields.smash_factor.is_none());
    }

    #[test]
    fn test_ignores_text_without_sentinel() {
        assert!(parse_response("Ball Speed: 116.1 mph\nCarry: 135 yds").is_none());
    }

    #[test]
    fn test_sentinel_alone_is_no_data() {
        assert!(parse_response("GOLF_DATA:\nnice shot!").is_none());
    }

    #[test]
    fn test_labels_case_insensitive() {
        let fields = parse_response("GOLF_DATA:\nball speed: 98.5\nSPIN RATE: 4200").unwrap();
        assert_eq!(fields.ball_speed, Some(98.5));
        assert_eq!(fields.spin_rate, Some(4200.0));
    }

    #[test]
    fn test_smash_factor_unrounded() {
        let fields =
            parse_response("GOLF_DATA:\nBall Speed: 116.1\nClub Speed: 80.3").unwrap();
        // Raw ratio, unlike the OCR path's two-decimal rounding
        assert_eq!(fields.smash_factor, Some(116.1 / 80.3));
    }

    #[test]
    fn test_all_labels() {
        let text = "GOLF_DATA:\nBall Speed: 116.1\nClub Speed: 80.3\nCarry: 250\n\
                    Total: 270.5\nSpin Rate: 2900\nLaunch Angle: 12.4";
        let fields = parse_response(text).unwrap();
        assert_eq!(fields.ball_speed, Some(116.1));
        assert_eq!(fields.club_head_speed, Some(80.3));
        assert_eq!(fields.carry_distance, Some(250.0));
        assert_eq!(fields.total_distance, Some(270.5));
        assert_eq!(fields.spin_rate, Some(2900.0));
        assert_eq!(fields.launch_angle, Some(12.4));
    }

    #[test]
    fn test_repeated_label_keeps_last_value() {
        let fields = parse_response("GOLF_DATA:\nCarry: 100\nCarry: 120").unwrap();
        assert_eq!(fields.carry_distance, Some(120.0));
    }
}
