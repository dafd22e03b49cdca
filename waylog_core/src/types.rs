//! Core domain types for Waylog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Geographic coordinates as captured from map clicks
//! - The workout record and its two variants (running, cycling)
//! - Derived metrics (pace, speed) computed at construction time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Coordinates
// ============================================================================

/// A geographic point, stored as `[lat, lng]` on the wire
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lng: pair[1],
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.lat, coords.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

// ============================================================================
// Workout Kind
// ============================================================================

/// Discriminant between the two workout variants
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Capitalized name used in descriptions ("Running on April 14")
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    /// Glyph shown next to markers and list entries
    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃",
            WorkoutKind::Cycling => "🚴",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutKind::Running => write!(f, "running"),
            WorkoutKind::Cycling => write!(f, "cycling"),
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" | "run" => Ok(WorkoutKind::Running),
            "cycling" | "ride" => Ok(WorkoutKind::Cycling),
            other => Err(crate::Error::Validation(format!(
                "unknown workout type: {}",
                other
            ))),
        }
    }
}

// ============================================================================
// Workout Record
// ============================================================================

/// Variant-specific fields, tagged by `type` in the stored snapshot
///
/// The derived metric of each variant is computed once at construction and
/// persisted alongside the inputs, so a reloaded record carries it without
/// recomputation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutDetails {
    Running {
        /// Steps per minute
        cadence: u32,
        /// Derived: duration_min / distance_km
        pace: f64,
    },
    Cycling {
        /// Metres climbed; may be zero or negative on a net-descent ride
        elevation: f64,
        /// Derived: distance_km / (duration_min / 60)
        speed: f64,
    },
}

/// A single logged workout, anchored to the map point it was created from
///
/// `id`, `recorded_at`, `coords`, `distance_km` and `duration_min` are fixed
/// at construction; only the interaction counter mutates afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
    pub coords: Coordinates,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    #[serde(rename = "duration")]
    pub duration_min: f64,
    /// Times this entry was selected from the list
    #[serde(default)]
    pub interactions: u32,
    pub description: String,
    #[serde(flatten)]
    pub details: WorkoutDetails,
}

impl Workout {
    /// Construct a running workout, deriving pace from distance and duration
    ///
    /// Inputs must already be validated; construction itself cannot fail.
    pub fn running(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let pace = duration_min / distance_km;
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            coords,
            distance_km,
            duration_min,
            interactions: 0,
            description: describe(WorkoutKind::Running, recorded_at),
            details: WorkoutDetails::Running {
                cadence: cadence_spm,
                pace,
            },
        }
    }

    /// Construct a cycling workout, deriving speed from distance and duration
    pub fn cycling(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let speed = distance_km / (duration_min / 60.0);
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            coords,
            distance_km,
            duration_min,
            interactions: 0,
            description: describe(WorkoutKind::Cycling, recorded_at),
            details: WorkoutDetails::Cycling {
                elevation: elevation_gain_m,
                speed,
            },
        }
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.details {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// Minutes per kilometre (running only)
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { pace, .. } => Some(pace),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    /// Kilometres per hour (cycling only)
    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed, .. } => Some(speed),
            WorkoutDetails::Running { .. } => None,
        }
    }

    pub fn cadence_spm(&self) -> Option<u32> {
        match self.details {
            WorkoutDetails::Running { cadence, .. } => Some(cadence),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub fn elevation_gain_m(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { elevation, .. } => Some(elevation),
            WorkoutDetails::Running { .. } => None,
        }
    }

    /// Record that the user selected this entry from the list
    pub fn record_interaction(&mut self) {
        self.interactions += 1;
    }
}

/// "Running on April 14" — capitalized kind, month name, unpadded day
fn describe(kind: WorkoutKind, recorded_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), recorded_at.format("%B %-d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn april_14() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_running_pace_derivation() {
        let w = Workout::running(Coordinates::new(40.0, -73.9), 5.0, 25.0, 178, april_14());
        assert_eq!(w.pace_min_per_km(), Some(5.0));
        assert_eq!(w.speed_km_per_h(), None);
        assert_eq!(w.cadence_spm(), Some(178));
        assert_eq!(w.kind(), WorkoutKind::Running);
    }

    #[test]
    fn test_cycling_speed_derivation() {
        let w = Workout::cycling(Coordinates::new(40.0, -73.9), 27.0, 95.0, 523.0, april_14());
        let speed = w.speed_km_per_h().unwrap();
        assert!((speed - 27.0 / (95.0 / 60.0)).abs() < 1e-9);
        assert_eq!(w.pace_min_per_km(), None);
        assert_eq!(w.elevation_gain_m(), Some(523.0));
    }

    #[test]
    fn test_description_contains_label_and_month() {
        let run = Workout::running(Coordinates::new(0.0, 0.0), 1.0, 10.0, 160, april_14());
        assert_eq!(run.description, "Running on April 14");

        let ride = Workout::cycling(Coordinates::new(0.0, 0.0), 1.0, 10.0, 0.0, april_14());
        assert_eq!(ride.description, "Cycling on April 14");
    }

    #[test]
    fn test_interaction_counter_starts_at_zero() {
        let mut w = Workout::running(Coordinates::new(0.0, 0.0), 1.0, 10.0, 160, april_14());
        assert_eq!(w.interactions, 0);
        w.record_interaction();
        w.record_interaction();
        assert_eq!(w.interactions, 2);
    }

    #[test]
    fn test_snapshot_field_layout() {
        let w = Workout::running(Coordinates::new(40.0, -73.9), 5.0, 25.0, 178, april_14());
        let json = serde_json::to_value(&w).unwrap();

        assert_eq!(json["type"], "running");
        assert_eq!(json["coords"], serde_json::json!([40.0, -73.9]));
        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["duration"], 25.0);
        assert_eq!(json["cadence"], 178);
        assert_eq!(json["pace"], 5.0);
        assert!(json.get("date").is_some());
        assert!(json.get("elevation").is_none());
    }

    #[test]
    fn test_reloaded_record_keeps_variant_behavior() {
        let w = Workout::cycling(Coordinates::new(51.5, -0.1), 27.0, 95.0, -40.0, april_14());
        let json = serde_json::to_string(&w).unwrap();

        let mut reloaded: Workout = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.id, w.id);
        assert_eq!(reloaded.coords, w.coords);
        assert_eq!(reloaded.elevation_gain_m(), Some(-40.0));
        assert_eq!(reloaded.speed_km_per_h(), w.speed_km_per_h());

        // Still a live variant, not a bag of plain fields
        reloaded.record_interaction();
        assert_eq!(reloaded.interactions, 1);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            "running".parse::<WorkoutKind>().unwrap(),
            WorkoutKind::Running
        );
        assert_eq!(
            "Cycling".parse::<WorkoutKind>().unwrap(),
            WorkoutKind::Cycling
        );
        assert!("rowing".parse::<WorkoutKind>().is_err());
    }
}
