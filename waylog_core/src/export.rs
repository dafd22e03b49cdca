//! CSV export of the workout snapshot.
//!
//! Flattens the stored workouts into a headered CSV for use outside
//! Waylog (spreadsheets, plotting). Derived metrics are exported as-is;
//! variant fields that don't apply to a row are left empty.

use crate::{Result, Workout};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    date: String,
    lat: f64,
    lng: f64,
    distance_km: f64,
    duration_min: f64,
    cadence_spm: Option<u32>,
    elevation_gain_m: Option<f64>,
    pace_min_per_km: Option<f64>,
    speed_km_per_h: Option<f64>,
    description: String,
}

impl From<&Workout> for CsvRow {
    fn from(workout: &Workout) -> Self {
        CsvRow {
            id: workout.id.to_string(),
            kind: workout.kind().to_string(),
            date: workout.recorded_at.to_rfc3339(),
            lat: workout.coords.lat,
            lng: workout.coords.lng,
            distance_km: workout.distance_km,
            duration_min: workout.duration_min,
            cadence_spm: workout.cadence_spm(),
            elevation_gain_m: workout.elevation_gain_m(),
            pace_min_per_km: workout.pace_min_per_km(),
            speed_km_per_h: workout.speed_km_per_h(),
            description: workout.description.clone(),
        }
    }
}

/// Write all workouts to a CSV file, returning the number of rows written
///
/// Any existing file at `path` is replaced; the export is a read-only view
/// of the snapshot, never the source of truth.
pub fn export_csv(workouts: &[Workout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for workout in workouts {
        writer.serialize(CsvRow::from(workout))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} workouts to {:?}", workouts.len(), path);
    Ok(workouts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinates;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("workouts.csv");

        let recorded = Utc.with_ymd_and_hms(2025, 4, 14, 9, 0, 0).unwrap();
        let workouts = vec![
            Workout::running(Coordinates::new(40.0, -73.9), 5.0, 25.0, 178, recorded),
            Workout::cycling(Coordinates::new(51.5, -0.1), 27.0, 95.0, 523.0, recorded),
        ];

        let count = export_csv(&workouts, &csv_path).unwrap();
        assert_eq!(count, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("id,type,date"));
        assert_eq!(lines.count(), 2);
        assert!(contents.contains("running"));
        assert!(contents.contains("cycling"));
    }

    #[test]
    fn test_export_empty_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("empty.csv");

        let count = export_csv(&[], &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }
}
