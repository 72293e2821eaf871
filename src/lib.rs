//! Kagami - Webcam-to-humanoid retargeting service
//!
//! Drives a humanoid avatar rig from per-frame landmark solves:
//! - Consumes pose/face/hand solve results from an external solver process
//! - Holds the latest solves in a shared per-session retargeting state
//! - Blends bone rotations, expression weights, and gaze into the rig once
//!   per render tick with time-based smoothing
//! - Coordinates the model/camera/tracking lifecycle in a status machine

pub mod config;
pub mod error;
pub mod retarget;
pub mod rig;
pub mod solver;
pub mod status;

pub use crate::config::Config;
pub use crate::error::{KagamiError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::retarget::RetargetingState;
use crate::solver::LandmarkFrame;
use crate::status::{AppPhase, StatusMachine};

/// Application state shared across all components
#[derive(Debug)]
pub struct AppState {
    /// Current configuration
    pub config: tokio::sync::RwLock<Config>,
    /// Latest solve results, written by the feed task, read by the render tick
    pub retargeting: RetargetingState,
    /// Lifecycle status machine
    status: std::sync::RwLock<StatusMachine>,
    /// Whether a live solver feed is currently attached
    video_attached: AtomicBool,
    /// Broadcast of each frame immediately after ingestion (debug overlays)
    frame_tx: broadcast::Sender<LandmarkFrame>,
    /// Shutdown signal
    shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Create a new application state with the given configuration
    pub fn new(config: Config) -> Arc<Self> {
        let (frame_tx, _) = broadcast::channel(64);
        let (shutdown_tx, _) = broadcast::channel(1);

        Arc::new(Self {
            config: tokio::sync::RwLock::new(config),
            retargeting: RetargetingState::new(),
            status: std::sync::RwLock::new(StatusMachine::new()),
            video_attached: AtomicBool::new(false),
            frame_tx,
            shutdown_tx,
        })
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> AppPhase {
        self.status.read().expect("status poisoned").phase()
    }

    /// The rig finished loading and post-processing
    pub fn model_ready(&self) -> bool {
        self.status.write().expect("status poisoned").model_ready()
    }

    /// Begin a tracking session: camera start was requested and the solver
    /// feed is now considered attached.
    pub fn start_tracking(&self) -> bool {
        let started = self
            .status
            .write()
            .expect("status poisoned")
            .camera_requested();
        if started {
            self.video_attached.store(true, Ordering::Release);
        }
        started
    }

    /// First frame arrived from the capture side
    pub fn frame_received(&self) -> bool {
        self.status.write().expect("status poisoned").camera_ready()
    }

    /// Merge one solved frame into the retargeting state.
    ///
    /// `generation` is the tag the feed task captured before the solve
    /// completed; a frame whose generation is stale (tracking was stopped in
    /// the meantime) is discarded and not broadcast. A non-empty frame
    /// activates tracking on first arrival.
    pub fn ingest_frame(&self, generation: u64, frame: LandmarkFrame) -> bool {
        if !self.retargeting.update(generation, &frame) {
            return false;
        }

        if !frame.is_empty() {
            self.status
                .write()
                .expect("status poisoned")
                .tracking_started();
        }

        let _ = self.frame_tx.send(frame);
        true
    }

    /// Stop the tracking session: detach the feed, clear held solves (which
    /// also invalidates in-flight writes), return the status machine to
    /// `MODEL_LOADED`.
    pub fn stop_tracking(&self) {
        self.video_attached.store(false, Ordering::Release);
        self.retargeting.clear();
        self.status
            .write()
            .expect("status poisoned")
            .camera_stopped();
    }

    /// Whether a live solver feed is attached (gates tracked-vs-manual
    /// expression blending)
    pub fn video_attached(&self) -> bool {
        self.video_attached.load(Ordering::Acquire)
    }

    /// Subscribe to the per-frame landmark broadcast
    pub fn subscribe_frames(&self) -> broadcast::Receiver<LandmarkFrame> {
        self.frame_tx.subscribe()
    }

    /// Subscribe to shutdown signal
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::frame::{EulerAngles, RiggedPose};

    fn pose_frame() -> LandmarkFrame {
        LandmarkFrame {
            pose: Some(RiggedPose {
                spine: Some(EulerAngles::new(0.0, 0.1, 0.0)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_lifecycle_through_app_state() {
        let state = AppState::new(Config::default());
        assert_eq!(state.phase(), AppPhase::ModelLoading);

        assert!(state.model_ready());
        assert!(state.start_tracking());
        assert!(state.video_attached());
        assert_eq!(state.phase(), AppPhase::CameraPreparing);

        assert!(state.frame_received());
        assert_eq!(state.phase(), AppPhase::CameraActive);

        let generation = state.retargeting.generation();
        assert!(state.ingest_frame(generation, pose_frame()));
        assert_eq!(state.phase(), AppPhase::TrackingActive);
    }

    #[test]
    fn test_empty_frame_does_not_activate_tracking() {
        let state = AppState::new(Config::default());
        state.model_ready();
        state.start_tracking();
        state.frame_received();

        let generation = state.retargeting.generation();
        assert!(state.ingest_frame(generation, LandmarkFrame::default()));
        assert_eq!(state.phase(), AppPhase::CameraActive);
    }

    #[test]
    fn test_stop_tracking_discards_in_flight_frame() {
        let state = AppState::new(Config::default());
        state.model_ready();
        state.start_tracking();
        state.frame_received();

        // A solve is in flight when the session stops
        let stale_generation = state.retargeting.generation();
        state.stop_tracking();

        assert!(!state.ingest_frame(stale_generation, pose_frame()));
        assert!(state.retargeting.snapshot().pose.is_none());
        assert!(!state.video_attached());
        assert_eq!(state.phase(), AppPhase::ModelLoaded);
    }

    #[test]
    fn test_ingested_frames_are_broadcast() {
        let state = AppState::new(Config::default());
        state.model_ready();
        state.start_tracking();
        state.frame_received();

        let mut frames = state.subscribe_frames();
        let generation = state.retargeting.generation();
        state.ingest_frame(generation, pose_frame());

        let received = frames.try_recv().unwrap();
        assert!(received.pose.is_some());
    }

    #[test]
    fn test_session_restart_after_stop() {
        let state = AppState::new(Config::default());
        state.model_ready();
        state.start_tracking();
        state.frame_received();
        state.stop_tracking();

        // A fresh session runs the same transitions again
        assert!(state.start_tracking());
        assert!(state.frame_received());
        let generation = state.retargeting.generation();
        assert!(state.ingest_frame(generation, pose_frame()));
        assert_eq!(state.phase(), AppPhase::TrackingActive);
    }
}
