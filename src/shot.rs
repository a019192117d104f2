//! Canonical shot records and reconciliation of partial field sets.
//!
//! Both extraction paths produce a [`ShotFields`] (the subset of semantic
//! fields they managed to assign); [`ShotRecord::from_fields`] merges that
//! with session defaults into the immutable record that enters history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Club label applied when no club was identified.
pub const DEFAULT_CLUB: &str = "Driver";

/// Shot direction relative to the target line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Center,
    Right,
}

/// Subjective quality rating attached to each shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotQuality {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
}

/// Semantic fields a numeric reading can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    BallSpeed,
    ClubHeadSpeed,
    LaunchAngle,
    CarryDistance,
    TotalDistance,
    SpinRate,
}

/// Partial field set produced by one extraction path before reconciliation.
///
/// Absent fields are `None`, never zero. `club_type` and `side` are only
/// populated by the manual-entry path; the OCR and text paths cannot read
/// them off the display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotFields {
    pub ball_speed: Option<f64>,
    pub club_head_speed: Option<f64>,
    pub launch_angle: Option<f64>,
    pub carry_distance: Option<f64>,
    pub total_distance: Option<f64>,
    pub spin_rate: Option<f64>,
    pub smash_factor: Option<f64>,
    pub club_type: Option<String>,
    pub side: Option<Side>,
}

impl ShotFields {
    /// Current value of a numeric field.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::BallSpeed => self.ball_speed,
            Field::ClubHeadSpeed => self.club_head_speed,
            Field::LaunchAngle => self.launch_angle,
            Field::CarryDistance => self.carry_distance,
            Field::TotalDistance => self.total_distance,
            Field::SpinRate => self.spin_rate,
        }
    }

    /// Assigns a numeric field.
    pub fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::BallSpeed => &mut self.ball_speed,
            Field::ClubHeadSpeed => &mut self.club_head_speed,
            Field::LaunchAngle => &mut self.launch_angle,
            Field::CarryDistance => &mut self.carry_distance,
            Field::TotalDistance => &mut self.total_distance,
            Field::SpinRate => &mut self.spin_rate,
        };
        *slot = Some(value);
    }
}

fn default_club() -> String {
    DEFAULT_CLUB.to_string()
}

/// One canonical, immutable extracted measurement entry.
///
/// `smash_factor` is present only when both speeds are; the rounding policy
/// differs by extraction path (the OCR classifier rounds to two decimals,
/// the text parser keeps the raw ratio) and is applied before reconciliation.
///
/// Serialized with camelCase names and epoch-millisecond timestamps,
/// matching the persisted history format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_head_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smash_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_rate: Option<f64>,
    #[serde(default = "default_club")]
    pub club_type: String,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub shot_quality: ShotQuality,
}

impl ShotRecord {
    /// Reconciles a partial field set with defaults, timestamped now.
    pub fn from_fields(fields: ShotFields) -> Self {
        Self::from_fields_at(fields, Utc::now())
    }

    /// Reconciles a partial field set with defaults at an explicit instant.
    pub fn from_fields_at(fields: ShotFields, timestamp: DateTime<Utc>) -> Self {
        // History is persisted with millisecond timestamps; truncate up
        // front so a record compares equal after a round-trip.
        let timestamp =
            DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp);
        Self {
            timestamp,
            ball_speed: fields.ball_speed,
            club_head_speed: fields.club_head_speed,
            smash_factor: fields.smash_factor,
            launch_angle: fields.launch_angle,
            carry_distance: fields.carry_distance,
            total_distance: fields.total_distance,
            spin_rate: fields.spin_rate,
            club_type: fields.club_type.unwrap_or_else(default_club),
            side: fields.side.unwrap_or_default(),
            shot_quality: ShotQuality::default(),
        }
    }

    /// Builds a record from manually entered fields.
    ///
    /// The smash factor is recomputed (unrounded) from the two speeds so a
    /// hand-typed value can never contradict them; without both speeds it
    /// stays unset.
    pub fn manual(mut fields: ShotFields) -> Self {
        fields.smash_factor = match (fields.ball_speed, fields.club_head_speed) {
            (Some(ball), Some(club)) => Some(ball / club),
            _ => None,
        };
        Self::from_fields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let record = ShotRecord::from_fields(ShotFields {
            ball_speed: Some(53.6),
            ..Default::default()
        });
        assert_eq!(record.ball_speed, Some(53.6));
        assert_eq!(record.club_type, "Driver");
        assert_eq!(record.side, Side::Center);
        assert_eq!(record.shot_quality, ShotQuality::Good);
        assert!(record.carry_distance.is_none());
    }

    #[test]
    fn test_explicit_fields_override_defaults() {
        let record = ShotRecord::from_fields(ShotFields {
            club_type: Some("7 Iron".to_string()),
            side: Some(Side::Left),
            ..Default::default()
        });
        assert_eq!(record.club_type, "7 Iron");
        assert_eq!(record.side, Side::Left);
    }

    #[test]
    fn test_manual_recomputes_smash_factor() {
        let record = ShotRecord::manual(ShotFields {
            ball_speed: Some(116.1),
            club_head_speed: Some(80.3),
            smash_factor: Some(9.99),
            ..Default::default()
        });
        assert_eq!(record.smash_factor, Some(116.1 / 80.3));
    }

    #[test]
    fn test_manual_drops_smash_factor_without_both_speeds() {
        let record = ShotRecord::manual(ShotFields {
            ball_speed: Some(116.1),
            smash_factor: Some(1.45),
            ..Default::default()
        });
        assert!(record.smash_factor.is_none());
    }

    #[test]
    fn test_serialization_format() {
        let timestamp = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let record = ShotRecord::from_fields_at(
            ShotFields {
                ball_speed: Some(53.6),
                spin_rate: Some(5150.0),
                ..Default::default()
            },
            timestamp,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
        assert_eq!(json["ballSpeed"], 53.6);
        assert_eq!(json["spinRate"], 5150.0);
        assert_eq!(json["clubType"], "Driver");
        assert_eq!(json["side"], "center");
        assert_eq!(json["shotQuality"], "good");
        // Absent fields are omitted, not zeroed
        assert!(json.get("carryDistance").is_none());
    }

    #[test]
    fn test_deserialize_minimal_record() {
        // Records written by older sessions may omit every optional field
        let record: ShotRecord =
            serde_json::from_str(r#"{"timestamp": 1700000000000}"#).unwrap();
        assert_eq!(record.club_type, "Driver");
        assert_eq!(record.side, Side::Center);
        assert!(record.ball_speed.is_none());
    }

    #[test]
    fn test_round_trip() {
        let timestamp = DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();
        let record = ShotRecord::from_fields_at(
            ShotFields {
                ball_speed: Some(53.6),
                club_head_speed: Some(54.0),
                smash_factor: Some(0.99),
                carry_distance: Some(50.1),
                total_distance: Some(56.3),
                spin_rate: Some(5150.0),
                launch_angle: Some(32.6),
                ..Default::default()
            },
            timestamp,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: ShotRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
