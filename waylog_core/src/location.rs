//! One-shot position acquisition.
//!
//! The controller asks for the user's position exactly once per session;
//! there is no continuous tracking and no retry. A session without a
//! resolvable position runs map-less.

use crate::{Coordinates, Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Position fix file name inside the data directory
pub const FIX_FILE: &str = "position.json";

/// Source of the user's current position
pub trait LocationProvider {
    fn current_position(&self) -> Result<Coordinates>;
}

/// A provider that always reports the same position
///
/// Used for explicit `--lat`/`--lng` overrides and in tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedPosition(pub Coordinates);

impl LocationProvider for FixedPosition {
    fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// Fix file format (matches external locator output)
#[derive(Debug, Deserialize)]
struct PositionFix {
    latitude: f64,
    longitude: f64,
}

/// The CLI's resolution chain: fix file, then configured home position
///
/// The fix file is dropped into the data directory by an external locator
/// (a GPS daemon dump, a geoclue script). A missing or malformed file is
/// not fatal on its own; resolution falls through to the configured home
/// coordinates, and only fails once both sources come up empty.
pub struct SessionLocation {
    fix_path: PathBuf,
    home: Option<Coordinates>,
}

impl SessionLocation {
    pub fn new(data_dir: &Path, home: Option<Coordinates>) -> Self {
        Self {
            fix_path: data_dir.join(FIX_FILE),
            home,
        }
    }
}

impl LocationProvider for SessionLocation {
    fn current_position(&self) -> Result<Coordinates> {
        if let Some(coords) = load_fix(&self.fix_path) {
            return Ok(coords);
        }

        if let Some(home) = self.home {
            tracing::info!("No position fix, falling back to configured home");
            return Ok(home);
        }

        Err(Error::Location(
            "no position fix and no home position configured".into(),
        ))
    }
}

/// Read a position fix file, degrading to None with a warning on any problem
fn load_fix(path: &Path) -> Option<Coordinates> {
    if !path.exists() {
        tracing::debug!("No position fix file at {:?}", path);
        return None;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                "Failed to read position fix at {:?}: {}. Ignoring fix.",
                path,
                e
            );
            return None;
        }
    };

    let fix: PositionFix = match serde_json::from_str(&contents) {
        Ok(fix) => fix,
        Err(e) => {
            tracing::warn!(
                "Failed to parse position fix at {:?}: {}. Ignoring fix.",
                path,
                e
            );
            return None;
        }
    };

    tracing::info!(
        "Loaded position fix ({}, {}) from {:?}",
        fix.latitude,
        fix.longitude,
        path
    );

    Some(Coordinates::new(fix.latitude, fix.longitude))
}
