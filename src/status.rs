//! Application/tracking status state machine
//!
//! Coordinates the lifecycle of rig loading, solver-feed acquisition, and
//! tracking activation. Transitions only move forward; the single reverse
//! path is an external camera stop, which returns to `ModelLoaded`.

use serde::{Deserialize, Serialize};

/// The lifecycle phase of a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppPhase {
    /// Rig asset is still loading
    ModelLoading,
    /// Rig is ready; no tracking session yet
    ModelLoaded,
    /// Camera start requested, waiting for the first frame
    CameraPreparing,
    /// Frames are arriving, no landmark results yet
    CameraActive,
    /// At least one detection produced landmark results
    TrackingActive,
}

impl Default for AppPhase {
    fn default() -> Self {
        Self::ModelLoading
    }
}

impl std::fmt::Display for AppPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppPhase::ModelLoading => "MODEL_LOADING",
            AppPhase::ModelLoaded => "MODEL_LOADED",
            AppPhase::CameraPreparing => "CAMERA_PREPARING",
            AppPhase::CameraActive => "CAMERA_ACTIVE",
            AppPhase::TrackingActive => "TRACKING_ACTIVE",
        };
        write!(f, "{}", label)
    }
}

/// Single-session status machine.
///
/// Each event method fires only from its expected predecessor phase and
/// returns whether the transition happened. Out-of-order events leave the
/// phase unchanged.
#[derive(Debug, Default)]
pub struct StatusMachine {
    phase: AppPhase,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    /// Rig asset finished loading and post-processing
    pub fn model_ready(&mut self) -> bool {
        self.advance(AppPhase::ModelLoading, AppPhase::ModelLoaded)
    }

    /// Camera/solver start was requested
    pub fn camera_requested(&mut self) -> bool {
        self.advance(AppPhase::ModelLoaded, AppPhase::CameraPreparing)
    }

    /// First frame arrived from the capture side
    pub fn camera_ready(&mut self) -> bool {
        self.advance(AppPhase::CameraPreparing, AppPhase::CameraActive)
    }

    /// First detection callback yielded landmark results
    pub fn tracking_started(&mut self) -> bool {
        self.advance(AppPhase::CameraActive, AppPhase::TrackingActive)
    }

    /// External stop action: camera toggled off. Valid from any phase past
    /// `ModelLoaded`; returns the machine to `ModelLoaded`.
    pub fn camera_stopped(&mut self) -> bool {
        match self.phase {
            AppPhase::CameraPreparing | AppPhase::CameraActive | AppPhase::TrackingActive => {
                tracing::info!("Status: {} -> MODEL_LOADED (camera stopped)", self.phase);
                self.phase = AppPhase::ModelLoaded;
                true
            }
            _ => false,
        }
    }

    fn advance(&mut self, from: AppPhase, to: AppPhase) -> bool {
        if self.phase == from {
            tracing::info!("Status: {} -> {}", from, to);
            self.phase = to;
            true
        } else {
            tracing::debug!(
                "Ignoring status transition {} -> {} (current: {})",
                from,
                to,
                self.phase
            );
            false
        }
    }
}
