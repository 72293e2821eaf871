//! Bone rotation applier
//!
//! Blends solved target rotations into the live rig with time-based
//! spherical interpolation. Missing bones degrade to a skipped write with a
//! one-time diagnostic; the warning set is per applier lifetime so a
//! 40-bone rig at 60 ticks/sec cannot flood the log.

use std::collections::HashSet;

use crate::rig::humanoid::HumanoidRig;
use crate::solver::frame::EulerAngles;

use super::bones::HumanBone;

/// Wrist targets merge two solvers: the pose solver is authoritative for the
/// z (forearm twist) axis, the hand solver for x/y. Each axis defaults to
/// zero independently when its source is absent.
pub fn compose_wrist(
    pose_twist: Option<EulerAngles>,
    hand_wrist: Option<EulerAngles>,
) -> EulerAngles {
    let hand = hand_wrist.unwrap_or(EulerAngles::ZERO);
    let twist = pose_twist.unwrap_or(EulerAngles::ZERO);
    EulerAngles::new(hand.x, hand.y, twist.z)
}

/// Applies target rotations to rig bones with per-bone smoothing.
#[derive(Debug, Default)]
pub struct BoneApplier {
    warned: HashSet<HumanBone>,
}

impl BoneApplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend `target` into `bone` by the fraction `dt × rate`, clamped to
    /// [0, 1]. Repeated calls with a fixed target converge monotonically and
    /// never overshoot. A bone the rig lacks is skipped after one warning.
    pub fn apply(
        &mut self,
        rig: &mut dyn HumanoidRig,
        bone: HumanBone,
        target: EulerAngles,
        dt: f32,
    ) {
        let Some(current) = rig.orientation(bone) else {
            if self.warned.insert(bone) {
                tracing::warn!("Bone {} not present on this rig, skipping", bone);
            }
            return;
        };

        let t = (dt * bone.smoothing_rate()).clamp(0.0, 1.0);
        let target_quat = target.to_quat(bone.axis_scale());
        rig.set_orientation(bone, current.slerp(target_quat, t));
    }

    /// Number of distinct bones skipped so far.
    pub fn warned_count(&self) -> usize {
        self.warned.len()
    }

    /// Forget skipped bones (a different model was loaded).
    pub fn reset(&mut self) {
        self.warned.clear();
    }
}
