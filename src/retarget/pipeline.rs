//! Per-tick retargeting orchestration
//!
//! Once per render tick the [`Retargeter`] reads a snapshot of the shared
//! state and blends it into the rig: expressions, gaze, head, torso, arms,
//! wrists, and digits, in the same order the solves are authoritative.
//! Regions with no data this frame keep their last applied values.

use crate::rig::humanoid::HumanoidRig;
use crate::solver::frame::Side;

use super::applier::{compose_wrist, BoneApplier};
use super::bones::HumanBone;
use super::expression::{self, ManualSliders};
use super::gaze::GazeController;
use super::state::PoseSnapshot;

/// Orchestrates bone, expression, and gaze blending for one subject.
#[derive(Debug, Default)]
pub struct Retargeter {
    applier: BoneApplier,
    gaze: GazeController,
}

impl Retargeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one retargeting tick against the rig, then advance it.
    ///
    /// `video_attached` selects tracked vs. manual expression blending.
    /// `dt` is the elapsed time since the previous tick in seconds.
    pub fn tick(
        &mut self,
        rig: &mut dyn HumanoidRig,
        snapshot: &PoseSnapshot,
        sliders: &ManualSliders,
        video_attached: bool,
        dt: f32,
    ) {
        // Emotion sliders bypass smoothing in both modes
        expression::apply_emotions(rig, sliders);

        if !video_attached {
            expression::blend_manual(rig, sliders, dt);
        } else if let Some(face) = &snapshot.face {
            expression::blend_tracked(rig, face, dt);
            self.gaze.tick(rig, face.pupil, dt);

            if let Some(head) = face.head {
                self.applier.apply(rig, HumanBone::Neck, head, dt);
            }
        }

        if let Some(pose) = &snapshot.pose {
            if let Some(spine) = pose.spine {
                self.applier.apply(rig, HumanBone::Chest, spine, dt);
                self.applier.apply(rig, HumanBone::Spine, spine, dt);
            }
            if let Some(rotation) = pose.hips.and_then(|h| h.rotation) {
                self.applier.apply(rig, HumanBone::Hips, rotation, dt);
            }

            if let Some(arm) = pose.left_upper_arm {
                self.applier.apply(rig, HumanBone::LeftUpperArm, arm, dt);
            }
            if let Some(arm) = pose.left_lower_arm {
                self.applier.apply(rig, HumanBone::LeftLowerArm, arm, dt);
            }
            if let Some(arm) = pose.right_upper_arm {
                self.applier.apply(rig, HumanBone::RightUpperArm, arm, dt);
            }
            if let Some(arm) = pose.right_lower_arm {
                self.applier.apply(rig, HumanBone::RightLowerArm, arm, dt);
            }

            // Hands ride on the pose solve: the wrist composite needs the
            // pose solver's twist axis even when it defaults to zero.
            if let Some(hand) = &snapshot.left_hand {
                let wrist = compose_wrist(pose.left_hand, hand.wrist);
                self.applier.apply(rig, HumanBone::LeftHand, wrist, dt);
                for (bone, rotation) in hand.digit_targets(Side::Left) {
                    self.applier.apply(rig, bone, rotation, dt);
                }
            }
            if let Some(hand) = &snapshot.right_hand {
                let wrist = compose_wrist(pose.right_hand, hand.wrist);
                self.applier.apply(rig, HumanBone::RightHand, wrist, dt);
                for (bone, rotation) in hand.digit_targets(Side::Right) {
                    self.applier.apply(rig, bone, rotation, dt);
                }
            }
        }

        rig.advance(dt);
    }

    /// Forget per-model diagnostics (a different rig was loaded).
    pub fn reset(&mut self) {
        self.applier.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::normalized::NormalizedRig;
    use crate::rig::HumanoidRig;
    use crate::solver::frame::{
        EulerAngles, EyeOpenness, HipsSolve, MouthShape, PupilOffset, RiggedFace, RiggedHand,
        RiggedPose,
    };
    use crate::retarget::bones::ExpressionName;
    use glam::Quat;

    const DT: f32 = 1.0 / 60.0;

    fn full_snapshot() -> PoseSnapshot {
        PoseSnapshot {
            face: Some(RiggedFace {
                head: Some(EulerAngles::new(0.1, 0.2, 0.0)),
                eye: Some(EyeOpenness { l: 0.5, r: 0.5 }),
                mouth: Some(MouthShape {
                    a: 0.7,
                    ..Default::default()
                }),
                pupil: Some(PupilOffset { x: 0.1, y: 0.1 }),
            }),
            pose: Some(RiggedPose {
                spine: Some(EulerAngles::new(0.05, 0.1, 0.0)),
                hips: Some(HipsSolve {
                    rotation: Some(EulerAngles::new(0.0, 0.2, 0.0)),
                }),
                left_upper_arm: Some(EulerAngles::new(0.4, 0.0, 0.0)),
                left_lower_arm: Some(EulerAngles::new(0.2, 0.0, 0.0)),
                right_upper_arm: Some(EulerAngles::new(-0.4, 0.0, 0.0)),
                right_lower_arm: Some(EulerAngles::new(-0.2, 0.0, 0.0)),
                left_hand: Some(EulerAngles::new(0.0, 0.0, 0.3)),
                right_hand: Some(EulerAngles::new(0.0, 0.0, -0.3)),
            }),
            left_hand: Some(RiggedHand {
                wrist: Some(EulerAngles::new(0.1, 0.2, 0.9)),
                index_proximal: Some(EulerAngles::new(0.5, 0.0, 0.0)),
                ..Default::default()
            }),
            right_hand: Some(RiggedHand {
                wrist: Some(EulerAngles::new(-0.1, -0.2, 0.9)),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_full_tick_drives_all_regions() {
        let mut rig = NormalizedRig::full();
        let mut retargeter = Retargeter::new();
        let snapshot = full_snapshot();
        let sliders = ManualSliders::default();

        for _ in 0..120 {
            retargeter.tick(&mut rig, &snapshot, &sliders, true, DT);
        }

        for bone in [
            HumanBone::Neck,
            HumanBone::Chest,
            HumanBone::Spine,
            HumanBone::Hips,
            HumanBone::LeftUpperArm,
            HumanBone::RightLowerArm,
            HumanBone::LeftHand,
            HumanBone::RightHand,
            HumanBone::LeftIndexProximal,
        ] {
            let q = rig.orientation(bone).unwrap();
            assert!(
                q.angle_between(Quat::IDENTITY) > 0.01,
                "{} was not driven",
                bone
            );
        }

        assert!(rig.expression(ExpressionName::Aa).unwrap() > 0.5);
        assert!(rig.look_at().x < 0.0);
        assert_eq!(rig.advance_calls(), 120);
    }

    #[test]
    fn test_absent_region_holds_last_orientation() {
        let mut rig = NormalizedRig::full();
        let mut retargeter = Retargeter::new();
        let sliders = ManualSliders::default();

        for _ in 0..120 {
            retargeter.tick(&mut rig, &full_snapshot(), &sliders, true, DT);
        }
        let held_arm = rig.orientation(HumanBone::LeftUpperArm).unwrap();
        let held_neck = rig.orientation(HumanBone::Neck).unwrap();

        // Pose and face drop out; bones must not reset toward identity
        let empty = PoseSnapshot::default();
        for _ in 0..120 {
            retargeter.tick(&mut rig, &empty, &sliders, true, DT);
        }

        assert_eq!(rig.orientation(HumanBone::LeftUpperArm).unwrap(), held_arm);
        assert_eq!(rig.orientation(HumanBone::Neck).unwrap(), held_neck);
    }

    #[test]
    fn test_advance_called_once_per_tick() {
        let mut rig = NormalizedRig::full();
        let mut retargeter = Retargeter::new();
        let sliders = ManualSliders::default();

        // Even a fully empty snapshot advances the rig exactly once
        retargeter.tick(&mut rig, &PoseSnapshot::default(), &sliders, false, DT);
        assert_eq!(rig.advance_calls(), 1);

        retargeter.tick(&mut rig, &full_snapshot(), &sliders, true, DT);
        assert_eq!(rig.advance_calls(), 2);
    }

    #[test]
    fn test_wrist_composite_uses_both_solvers() {
        let mut rig = NormalizedRig::full();
        let mut retargeter = Retargeter::new();
        let sliders = ManualSliders::default();
        let snapshot = full_snapshot();

        for _ in 0..2000 {
            retargeter.tick(&mut rig, &snapshot, &sliders, true, DT);
        }

        // x/y from the hand solver's wrist, z from the pose solver's twist
        let expected = EulerAngles::new(0.1, 0.2, 0.3).to_quat(HumanBone::LeftHand.axis_scale());
        let wrist = rig.orientation(HumanBone::LeftHand).unwrap();
        assert!(
            wrist.angle_between(expected) < 1e-2,
            "composite wrist off by {}",
            wrist.angle_between(expected)
        );
    }

    #[test]
    fn test_hands_ignored_without_pose_solve() {
        let mut rig = NormalizedRig::full();
        let mut retargeter = Retargeter::new();
        let sliders = ManualSliders::default();

        let snapshot = PoseSnapshot {
            left_hand: full_snapshot().left_hand,
            ..Default::default()
        };
        for _ in 0..120 {
            retargeter.tick(&mut rig, &snapshot, &sliders, true, DT);
        }

        assert_eq!(
            rig.orientation(HumanBone::LeftIndexProximal).unwrap(),
            Quat::IDENTITY
        );
    }

    #[test]
    fn test_manual_mode_ignores_tracked_face() {
        let mut rig = NormalizedRig::full();
        let mut retargeter = Retargeter::new();
        let sliders = ManualSliders {
            oh: 0.6,
            ..Default::default()
        };
        let snapshot = full_snapshot();

        // Video detached: the face solve (aa = 0.7) must not drive vowels
        for _ in 0..300 {
            retargeter.tick(&mut rig, &snapshot, &sliders, false, DT);
        }

        assert!(rig.expression(ExpressionName::Aa).unwrap() < 1e-3);
        assert!((rig.expression(ExpressionName::Oh).unwrap() - 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_partial_rig_skips_missing_bones() {
        let mut rig = NormalizedRig::upper_body();
        let mut retargeter = Retargeter::new();
        let sliders = ManualSliders::default();
        let snapshot = full_snapshot();

        // Finger bones are missing; the tick must not panic and must still
        // drive the bones that exist
        for _ in 0..120 {
            retargeter.tick(&mut rig, &snapshot, &sliders, true, DT);
        }

        let arm = rig.orientation(HumanBone::LeftUpperArm).unwrap();
        assert!(arm.angle_between(Quat::IDENTITY) > 0.01);
    }
}
