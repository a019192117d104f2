//! JSON export of shot history.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::shot::ShotRecord;

/// A ready-to-download export: pretty-printed history plus a dated filename.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionExport {
    /// Suggested filename, e.g. `golf-shots-2026-08-23.json`.
    pub filename: String,
    /// Pretty-printed JSON array, newest shot first.
    pub contents: String,
}

impl SessionExport {
    /// Writes the export into `dir` under its suggested filename.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}

/// Serializes a full history for download.
pub(crate) fn export_history(history: &[ShotRecord]) -> Result<SessionExport> {
    let contents = serde_json::to_string_pretty(history)?;
    let filename = format!("golf-shots-{}.json", Local::now().format("%Y-%m-%d"));
    Ok(SessionExport { filename, contents })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::ShotFields;
    use tempfile::tempdir;

    #[test]
    fn test_export_round_trips_history() {
        let history = vec![
            ShotRecord::from_fields(ShotFields {
                ball_speed: Some(110.0),
                ..Default::default()
            }),
            ShotRecord::from_fields(ShotFields {
                carry_distance: Some(150.0),
                ..Default::default()
            }),
        ];
        let export = export_history(&history).unwrap();
        let reloaded: Vec<ShotRecord> = serde_json::from_str(&export.contents).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].ball_speed, history[0].ball_speed);
        assert_eq!(reloaded[1].carry_distance, history[1].carry_distance);
    }

    #[test]
    fn test_filename_carries_current_date() {
        let export = export_history(&[]).unwrap();
        let expected = format!("golf-shots-{}.json", Local::now().format("%Y-%m-%d"));
        assert_eq!(export.filename, expected);
        assert_eq!(export.contents, "[]");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempdir().unwrap();
        let export = export_history(&[]).unwrap();
        let path = export.write_to(dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
