//! Gaze controller
//!
//! Steers the rig's camera-attached eye target toward a destination derived
//! from the solved pupil offset. The mapping mirrors the webcam: a pupil
//! shift to the subject's left moves the gaze target the other way in
//! camera space. Without pupil data the target holds its last position.

use glam::Vec3;

use crate::rig::humanoid::HumanoidRig;
use crate::solver::frame::PupilOffset;

/// Smoothing rate for the gaze target (multiplied by elapsed time).
pub const GAZE_RATE: f32 = 5.0;

/// Horizontal/vertical gain from pupil offset to camera-local target.
const PUPIL_GAIN: f32 = 2.0;

/// Moves the eye target toward the pupil-derived destination.
#[derive(Debug, Default)]
pub struct GazeController;

impl GazeController {
    pub fn new() -> Self {
        Self
    }

    /// Advance the gaze target by one tick. `None` pupil data is a no-op:
    /// the target keeps its last position rather than recentering.
    pub fn tick(&self, rig: &mut dyn HumanoidRig, pupil: Option<PupilOffset>, dt: f32) {
        let Some(pupil) = pupil else {
            return;
        };

        let destination = Vec3::new(-PUPIL_GAIN * pupil.x, PUPIL_GAIN * pupil.y, 0.0);
        let t = (dt * GAZE_RATE).clamp(0.0, 1.0);
        let position = rig.look_at();
        rig.set_look_at(position.lerp(destination, t));
    }
}
