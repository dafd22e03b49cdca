//! Map widget seam.
//!
//! The map itself is an external collaborator (a tile-rendering widget);
//! Waylog only asks it to show a view, place markers with popups, and
//! re-center. Click events do not come back through this trait: frontends
//! turn them into [`crate::controller::Event::MapClick`].

use crate::{Coordinates, Result, Workout};
use serde::{Deserialize, Serialize};

/// Tile layer the widget should render, with its attribution line
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".into(),
            attribution: "© OpenStreetMap contributors".into(),
        }
    }
}

/// Popup placement request accompanying a marker
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerPopup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl MarkerPopup {
    /// Popup for a logged workout: kind glyph plus description, styled by kind
    pub fn for_workout(workout: &Workout) -> Self {
        let kind = workout.kind();
        Self {
            content: format!("{} {}", kind.icon(), workout.description),
            class_name: format!("{}-popup", kind),
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
        }
    }
}

/// Operations Waylog asks of the external map widget
pub trait MapWidget {
    /// Create the map view centered on `center`, with the given tile layer
    fn init(&mut self, center: Coordinates, zoom: u8, tiles: &TileLayer) -> Result<()>;

    /// Place a marker and open its popup
    fn add_marker(&mut self, at: Coordinates, popup: &MarkerPopup) -> Result<()>;

    /// Re-center the view; `animate` requests a smooth pan
    fn pan_to(&mut self, center: Coordinates, zoom: u8, animate: bool) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_popup_for_running_workout() {
        let recorded = Utc.with_ymd_and_hms(2025, 4, 14, 9, 0, 0).unwrap();
        let w = Workout::running(Coordinates::new(40.0, -73.9), 5.0, 25.0, 178, recorded);

        let popup = MarkerPopup::for_workout(&w);
        assert_eq!(popup.content, "🏃 Running on April 14");
        assert_eq!(popup.class_name, "running-popup");
        assert!(!popup.auto_close);
        assert!(!popup.close_on_click);
    }

    #[test]
    fn test_popup_class_follows_kind() {
        let recorded = Utc.with_ymd_and_hms(2025, 4, 14, 9, 0, 0).unwrap();
        let w = Workout::cycling(Coordinates::new(40.0, -73.9), 27.0, 95.0, 0.0, recorded);

        let popup = MarkerPopup::for_workout(&w);
        assert_eq!(popup.class_name, "cycling-popup");
    }
}
