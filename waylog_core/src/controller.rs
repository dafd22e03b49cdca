//! The workout controller: a state machine over session events.
//!
//! The controller exclusively owns the in-memory workout list and mediates
//! between the location provider, the external map widget, the form, and
//! the snapshot store. Frontends translate user input into [`Event`]s and
//! feed them through [`Controller::handle`]; the reducer-style dispatch
//! keeps the whole flow testable without a live UI.
//!
//! Phases: `AwaitingLocation` → `MapReady` ⇄ `FormOpen`, with
//! `MapUnavailable` as the dead end after a failed position request.

use crate::map::{MapWidget, MarkerPopup, TileLayer};
use crate::{store, Coordinates, Error, LocationProvider, Result, Workout, WorkoutKind};
use chrono::Utc;
use std::path::PathBuf;
use uuid::Uuid;

/// Blocking notification shown when form validation rejects the input
pub const INVALID_INPUT_MSG: &str = "Please enter input numbers only.";

/// Blocking notification shown when the position request fails
pub const LOCATION_FAILED_MSG: &str = "Could not get your location.";

/// Surface for blocking user notifications
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Where the session currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Position requested, map not yet created
    AwaitingLocation,
    /// Map on screen, waiting for a click
    MapReady,
    /// A click is pending and the form is showing
    FormOpen,
    /// Position request failed; map-dependent events are dead for the session
    MapUnavailable,
}

/// One submitted form, numbers still raw
///
/// Frontends coerce unparseable text to NaN rather than rejecting it
/// themselves; validation here is the single gate. The variant mirrors the
/// form's type selector, which swaps the cadence input for the elevation
/// input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormSubmission {
    Running {
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    },
    Cycling {
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

impl FormSubmission {
    pub fn new(kind: WorkoutKind, distance_km: f64, duration_min: f64, extra: f64) -> Self {
        match kind {
            WorkoutKind::Running => FormSubmission::Running {
                distance_km,
                duration_min,
                cadence_spm: extra,
            },
            WorkoutKind::Cycling => FormSubmission::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m: extra,
            },
        }
    }

    /// Gate every submission before a workout is constructed
    ///
    /// All fields must be finite; distance, duration and (running only)
    /// cadence must be strictly positive. Elevation gain is exempt from the
    /// positivity check: a net-descent ride is a legal entry.
    pub fn validate(&self) -> Result<()> {
        let finite = |inputs: &[f64]| inputs.iter().all(|v| v.is_finite());
        let positive = |inputs: &[f64]| inputs.iter().all(|v| *v > 0.0);

        let ok = match *self {
            FormSubmission::Running {
                distance_km,
                duration_min,
                cadence_spm,
            } => {
                let fields = [distance_km, duration_min, cadence_spm];
                finite(&fields) && positive(&fields)
            }
            FormSubmission::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => {
                finite(&[distance_km, duration_min, elevation_gain_m])
                    && positive(&[distance_km, duration_min])
            }
        };

        if ok {
            Ok(())
        } else {
            Err(Error::Validation(INVALID_INPUT_MSG.into()))
        }
    }
}

/// Everything that can happen during a session
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The one-shot position request resolved
    PositionResolved(Coordinates),
    /// The one-shot position request failed
    PositionFailed(String),
    /// The user clicked a point on the map
    MapClick(Coordinates),
    /// The user submitted the form
    FormSubmitted(FormSubmission),
    /// The user selected an entry from the workout list
    EntrySelected { id: Uuid },
}

/// Session orchestrator owning the workout list
pub struct Controller<M: MapWidget, N: Notifier> {
    phase: Phase,
    workouts: Vec<Workout>,
    pending_click: Option<Coordinates>,
    zoom: u8,
    tiles: TileLayer,
    snapshot_path: PathBuf,
    map: M,
    notifier: N,
}

impl<M: MapWidget, N: Notifier> Controller<M, N> {
    /// Load the persisted snapshot and start awaiting the position
    pub fn new(
        map: M,
        notifier: N,
        snapshot_path: PathBuf,
        zoom: u8,
        tiles: TileLayer,
    ) -> Result<Self> {
        let workouts = store::load_workouts(&snapshot_path)?;
        tracing::info!("Session starting with {} stored workouts", workouts.len());

        Ok(Self {
            phase: Phase::AwaitingLocation,
            workouts,
            pending_click: None,
            zoom,
            tiles,
            snapshot_path,
            map,
            notifier,
        })
    }

    /// Fire the one-shot position request and feed the outcome back in
    pub fn start(&mut self, provider: &dyn LocationProvider) -> Result<()> {
        match provider.current_position() {
            Ok(coords) => self.handle(Event::PositionResolved(coords)),
            Err(e) => self.handle(Event::PositionFailed(e.to_string())),
        }
    }

    /// Dispatch one event; exactly one handler runs to completion
    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::PositionResolved(coords) => self.on_position_resolved(coords),
            Event::PositionFailed(reason) => self.on_position_failed(&reason),
            Event::MapClick(coords) => self.on_map_click(coords),
            Event::FormSubmitted(submission) => self.on_form_submitted(submission),
            Event::EntrySelected { id } => self.on_entry_selected(id),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn pending_click(&self) -> Option<Coordinates> {
        self.pending_click
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn on_position_resolved(&mut self, coords: Coordinates) -> Result<()> {
        if self.phase != Phase::AwaitingLocation {
            tracing::debug!("Ignoring position in phase {:?}", self.phase);
            return Ok(());
        }

        self.map.init(coords, self.zoom, &self.tiles)?;
        for workout in &self.workouts {
            self.map
                .add_marker(workout.coords, &MarkerPopup::for_workout(workout))?;
        }

        self.phase = Phase::MapReady;
        tracing::info!("Map ready at {} (zoom {})", coords, self.zoom);
        Ok(())
    }

    fn on_position_failed(&mut self, reason: &str) -> Result<()> {
        tracing::warn!("Position request failed: {}", reason);
        self.notifier.alert(LOCATION_FAILED_MSG);
        self.phase = Phase::MapUnavailable;
        Ok(())
    }

    fn on_map_click(&mut self, coords: Coordinates) -> Result<()> {
        match self.phase {
            // Last click wins; a click with the form already open re-targets it
            Phase::MapReady | Phase::FormOpen => {
                self.pending_click = Some(coords);
                self.phase = Phase::FormOpen;
                Ok(())
            }
            _ => {
                tracing::debug!("Ignoring map click in phase {:?}", self.phase);
                Ok(())
            }
        }
    }

    fn on_form_submitted(&mut self, submission: FormSubmission) -> Result<()> {
        if self.phase != Phase::FormOpen {
            tracing::debug!("Ignoring form submission in phase {:?}", self.phase);
            return Ok(());
        }

        let Some(coords) = self.pending_click else {
            tracing::debug!("Form open without a pending click; ignoring submission");
            return Ok(());
        };

        if let Err(Error::Validation(msg)) = submission.validate() {
            // Form stays open, nothing mutated
            self.notifier.alert(&msg);
            return Ok(());
        }

        let workout = match submission {
            FormSubmission::Running {
                distance_km,
                duration_min,
                cadence_spm,
            } => Workout::running(
                coords,
                distance_km,
                duration_min,
                cadence_spm.round() as u32,
                Utc::now(),
            ),
            FormSubmission::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => Workout::cycling(coords, distance_km, duration_min, elevation_gain_m, Utc::now()),
        };

        self.map
            .add_marker(workout.coords, &MarkerPopup::for_workout(&workout))?;
        tracing::info!("Logged {} at {}", workout.description, workout.coords);

        self.workouts.push(workout);
        store::save_workouts(&self.snapshot_path, &self.workouts)?;

        self.pending_click = None;
        self.phase = Phase::MapReady;
        Ok(())
    }

    fn on_entry_selected(&mut self, id: Uuid) -> Result<()> {
        if !matches!(self.phase, Phase::MapReady | Phase::FormOpen) {
            tracing::debug!("Ignoring entry selection in phase {:?}", self.phase);
            return Ok(());
        }

        // A stale id (removed or unknown entry) is a no-op, not an error
        let coords = match self.workouts.iter_mut().find(|w| w.id == id) {
            Some(workout) => {
                workout.record_interaction();
                workout.coords
            }
            None => {
                tracing::debug!("No workout with id {}; ignoring selection", id);
                return Ok(());
            }
        };

        self.map.pan_to(coords, self.zoom, true)
    }
}
