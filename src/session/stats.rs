//! Session statistics over shot history.

use serde::Serialize;

use crate::shot::ShotRecord;

/// Per-field averages, each computed over only the shots where that field
/// is present. A field no shot carries averages to `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAverages {
    pub ball_speed: Option<f64>,
    pub club_head_speed: Option<f64>,
    pub smash_factor: Option<f64>,
    pub launch_angle: Option<f64>,
    pub carry_distance: Option<f64>,
    pub total_distance: Option<f64>,
    pub spin_rate: Option<f64>,
}

/// Aggregate view of the session; derived on demand, never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_shots: usize,
    pub averages: FieldAverages,
    pub last_shot: ShotRecord,
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.flatten() {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Computes statistics for a newest-first history. `None` when empty.
pub(crate) fn compute(history: &[ShotRecord]) -> Option<SessionStats> {
    let last_shot = history.first()?.clone();
    let averages = FieldAverages {
        ball_speed: mean(history.iter().map(|s| s.ball_speed)),
        club_head_speed: mean(history.iter().map(|s| s.club_head_speed)),
        smash_factor: mean(history.iter().map(|s| s.smash_factor)),
        launch_angle: mean(history.iter().map(|s| s.launch_angle)),
        carry_distance: mean(history.iter().map(|s| s.carry_distance)),
        total_distance: mean(history.iter().map(|s| s.total_distance)),
        spin_rate: mean(history.iter().map(|s| s.spin_rate)),
    };
    Some(SessionStats {
        total_shots: history.len(),
        averages,
        last_shot,
    })
}
