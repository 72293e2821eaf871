//! Solved-landmark wire types
//!
//! One `SolverPacket` arrives per detection frame from the external
//! pose/face/hand solver. All sub-structures are optional: the solver omits
//! whatever it could not compute this frame (occlusion, out-of-frame, low
//! confidence). The packet is converted into a [`LandmarkFrame`] with the
//! camera-mirror hand swap applied, which is what the retargeting pipeline
//! consumes.

use glam::{EulerRot, Quat};
use serde::{Deserialize, Serialize};

use crate::retarget::bones::{AxisScale, HumanBone};

/// A 3-axis rotation in radians, in the solver's XYZ Euler convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerAngles {
    pub const ZERO: EulerAngles = EulerAngles {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build the target quaternion, applying per-axis damping first.
    pub fn to_quat(self, scale: AxisScale) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.x * scale.x,
            self.y * scale.y,
            self.z * scale.z,
        )
    }
}

/// Pupil offset from eye center, normalized to roughly [-0.5, 0.5] per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PupilOffset {
    pub x: f32,
    pub y: f32,
}

/// Per-eye openness, 0 = closed, 1 = open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeOpenness {
    pub l: f32,
    pub r: f32,
}

/// Vowel mouth-shape weights, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouthShape {
    pub a: f32,
    pub i: f32,
    pub e: f32,
    pub o: f32,
    pub u: f32,
}

/// Face solve: head rotation, eye openness, mouth shape, pupil offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiggedFace {
    #[serde(default)]
    pub head: Option<EulerAngles>,
    #[serde(default)]
    pub eye: Option<EyeOpenness>,
    #[serde(default)]
    pub mouth: Option<MouthShape>,
    #[serde(default)]
    pub pupil: Option<PupilOffset>,
}

/// Hips solve. Only the rotation is retargeted; the solver may also emit a
/// world position, which this pipeline ignores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HipsSolve {
    #[serde(default)]
    pub rotation: Option<EulerAngles>,
}

/// Body pose solve.
///
/// `left_hand`/`right_hand` are the pose solver's wrist estimates; only
/// their z (forearm twist) axis is authoritative, the hand solver owns x/y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiggedPose {
    #[serde(default)]
    pub spine: Option<EulerAngles>,
    #[serde(default)]
    pub hips: Option<HipsSolve>,
    #[serde(default)]
    pub left_upper_arm: Option<EulerAngles>,
    #[serde(default)]
    pub left_lower_arm: Option<EulerAngles>,
    #[serde(default)]
    pub right_upper_arm: Option<EulerAngles>,
    #[serde(default)]
    pub right_lower_arm: Option<EulerAngles>,
    #[serde(default)]
    pub left_hand: Option<EulerAngles>,
    #[serde(default)]
    pub right_hand: Option<EulerAngles>,
}

/// Which rig side a hand solve is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Hand solve: wrist rotation plus 15 finger-bone rotations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiggedHand {
    #[serde(default)]
    pub wrist: Option<EulerAngles>,
    #[serde(default)]
    pub thumb_proximal: Option<EulerAngles>,
    #[serde(default)]
    pub thumb_intermediate: Option<EulerAngles>,
    #[serde(default)]
    pub thumb_distal: Option<EulerAngles>,
    #[serde(default)]
    pub index_proximal: Option<EulerAngles>,
    #[serde(default)]
    pub index_intermediate: Option<EulerAngles>,
    #[serde(default)]
    pub index_distal: Option<EulerAngles>,
    #[serde(default)]
    pub middle_proximal: Option<EulerAngles>,
    #[serde(default)]
    pub middle_intermediate: Option<EulerAngles>,
    #[serde(default)]
    pub middle_distal: Option<EulerAngles>,
    #[serde(default)]
    pub ring_proximal: Option<EulerAngles>,
    #[serde(default)]
    pub ring_intermediate: Option<EulerAngles>,
    #[serde(default)]
    pub ring_distal: Option<EulerAngles>,
    #[serde(default)]
    pub little_proximal: Option<EulerAngles>,
    #[serde(default)]
    pub little_intermediate: Option<EulerAngles>,
    #[serde(default)]
    pub little_distal: Option<EulerAngles>,
}

impl RiggedHand {
    /// Finger-bone targets for the given rig side.
    ///
    /// A digit the solver omitted defaults to zero rotation (relaxed pose).
    /// The solver's thumb intermediate segment drives the rig's thumb
    /// metacarpal: the hand solver emits proximal/intermediate/distal while
    /// VRM names the thumb chain metacarpal/proximal/distal.
    pub fn digit_targets(&self, side: Side) -> [(HumanBone, EulerAngles); 15] {
        use HumanBone::*;

        let d = |r: Option<EulerAngles>| r.unwrap_or(EulerAngles::ZERO);

        match side {
            Side::Left => [
                (LeftThumbProximal, d(self.thumb_proximal)),
                (LeftThumbMetacarpal, d(self.thumb_intermediate)),
                (LeftThumbDistal, d(self.thumb_distal)),
                (LeftIndexProximal, d(self.index_proximal)),
                (LeftIndexIntermediate, d(self.index_intermediate)),
                (LeftIndexDistal, d(self.index_distal)),
                (LeftMiddleProximal, d(self.middle_proximal)),
                (LeftMiddleIntermediate, d(self.middle_intermediate)),
                (LeftMiddleDistal, d(self.middle_distal)),
                (LeftRingProximal, d(self.ring_proximal)),
                (LeftRingIntermediate, d(self.ring_intermediate)),
                (LeftRingDistal, d(self.ring_distal)),
                (LeftLittleProximal, d(self.little_proximal)),
                (LeftLittleIntermediate, d(self.little_intermediate)),
                (LeftLittleDistal, d(self.little_distal)),
            ],
            Side::Right => [
                (RightThumbProximal, d(self.thumb_proximal)),
                (RightThumbMetacarpal, d(self.thumb_intermediate)),
                (RightThumbDistal, d(self.thumb_distal)),
                (RightIndexProximal, d(self.index_proximal)),
                (RightIndexIntermediate, d(self.index_intermediate)),
                (RightIndexDistal, d(self.index_distal)),
                (RightMiddleProximal, d(self.middle_proximal)),
                (RightMiddleIntermediate, d(self.middle_intermediate)),
                (RightMiddleDistal, d(self.middle_distal)),
                (RightRingProximal, d(self.ring_proximal)),
                (RightRingIntermediate, d(self.ring_intermediate)),
                (RightRingDistal, d(self.ring_distal)),
                (RightLittleProximal, d(self.little_proximal)),
                (RightLittleIntermediate, d(self.little_intermediate)),
                (RightLittleDistal, d(self.little_distal)),
            ],
        }
    }
}

/// One datagram from the external solver, hands attributed as the raw
/// detector saw them (before mirror correction).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SolverPacket {
    #[serde(default)]
    pub face: Option<RiggedFace>,
    #[serde(default)]
    pub pose: Option<RiggedPose>,
    #[serde(default)]
    pub left_hand: Option<RiggedHand>,
    #[serde(default)]
    pub right_hand: Option<RiggedHand>,
}

impl SolverPacket {
    /// Convert into a rig-attributed frame.
    ///
    /// With `mirror` on, the detector's left hand drives the rig's right
    /// hand and vice versa (the webcam image is a mirror of the subject).
    pub fn into_frame(self, mirror: bool) -> LandmarkFrame {
        let (left_hand, right_hand) = if mirror {
            (self.right_hand, self.left_hand)
        } else {
            (self.left_hand, self.right_hand)
        };

        LandmarkFrame {
            face: self.face,
            pose: self.pose,
            left_hand,
            right_hand,
        }
    }
}

/// Per-frame solve results, hands attributed to rig sides.
///
/// Ephemeral: superseded entirely by the next frame. Absent sub-structures
/// mean "not detected this frame", never "detected as neutral".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    pub face: Option<RiggedFace>,
    #[serde(default)]
    pub pose: Option<RiggedPose>,
    #[serde(default)]
    pub left_hand: Option<RiggedHand>,
    #[serde(default)]
    pub right_hand: Option<RiggedHand>,
}

impl LandmarkFrame {
    /// True when the frame carries no landmark result at all.
    pub fn is_empty(&self) -> bool {
        self.face.is_none()
            && self.pose.is_none()
            && self.left_hand.is_none()
            && self.right_hand.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_packet() {
        let json = r#"{
            "face": {
                "head": {"x": 0.1, "y": -0.2, "z": 0.05},
                "eye": {"l": 0.9, "r": 0.85},
                "mouth": {"a": 0.4, "i": 0.0, "e": 0.1, "o": 0.0, "u": 0.0},
                "pupil": {"x": 0.1, "y": -0.05}
            },
            "pose": {
                "spine": {"x": 0.02, "y": 0.0, "z": 0.01},
                "hips": {"rotation": {"x": 0.0, "y": 0.1, "z": 0.0}},
                "left_upper_arm": {"x": 0.5, "y": 0.2, "z": -0.3},
                "left_hand": {"x": 0.0, "y": 0.0, "z": 0.4}
            },
            "left_hand": {
                "wrist": {"x": 0.1, "y": 0.2, "z": 0.0},
                "index_proximal": {"x": 0.3, "y": 0.0, "z": 0.0}
            }
        }"#;

        let packet: SolverPacket = serde_json::from_str(json).unwrap();

        let face = packet.face.unwrap();
        assert!((face.head.unwrap().y + 0.2).abs() < 1e-6);
        assert!((face.mouth.unwrap().a - 0.4).abs() < 1e-6);

        let pose = packet.pose.unwrap();
        assert!((pose.hips.unwrap().rotation.unwrap().y - 0.1).abs() < 1e-6);
        assert!(pose.right_upper_arm.is_none());

        assert!(packet.left_hand.is_some());
        assert!(packet.right_hand.is_none());
    }

    #[test]
    fn test_absent_subkeys_parse_to_none() {
        let packet: SolverPacket = serde_json::from_str("{}").unwrap();
        assert!(packet.face.is_none());
        assert!(packet.pose.is_none());
        assert!(packet.left_hand.is_none());
        assert!(packet.right_hand.is_none());
        assert!(packet.into_frame(true).is_empty());
    }

    #[test]
    fn test_mirror_swaps_hand_attribution() {
        let mut packet = SolverPacket::default();
        packet.left_hand = Some(RiggedHand {
            wrist: Some(EulerAngles::new(0.1, 0.0, 0.0)),
            ..Default::default()
        });

        let mirrored = packet.into_frame(true);
        assert!(mirrored.left_hand.is_none());
        assert!(mirrored.right_hand.is_some());

        let unmirrored = packet.into_frame(false);
        assert!(unmirrored.left_hand.is_some());
        assert!(unmirrored.right_hand.is_none());
    }

    #[test]
    fn test_digit_targets_default_to_zero() {
        let hand = RiggedHand {
            index_proximal: Some(EulerAngles::new(0.3, 0.0, 0.0)),
            ..Default::default()
        };

        let targets = hand.digit_targets(Side::Left);
        for (bone, rotation) in targets {
            if bone == HumanBone::LeftIndexProximal {
                assert!((rotation.x - 0.3).abs() < 1e-6);
            } else {
                assert_eq!(rotation, EulerAngles::ZERO, "{} should default", bone);
            }
        }
    }

    #[test]
    fn test_thumb_intermediate_drives_metacarpal() {
        let hand = RiggedHand {
            thumb_intermediate: Some(EulerAngles::new(0.0, 0.0, 0.25)),
            ..Default::default()
        };

        let targets = hand.digit_targets(Side::Right);
        let (_, metacarpal) = targets
            .iter()
            .find(|(b, _)| *b == HumanBone::RightThumbMetacarpal)
            .unwrap();
        assert!((metacarpal.z - 0.25).abs() < 1e-6);

        let (_, proximal) = targets
            .iter()
            .find(|(b, _)| *b == HumanBone::RightThumbProximal)
            .unwrap();
        assert_eq!(*proximal, EulerAngles::ZERO);
    }

    #[test]
    fn test_euler_to_quat_axis_order() {
        // Single-axis rotations must match glam's axis constructors, with
        // the damping factor applied before conversion.
        let rot = EulerAngles::new(0.5, 0.0, 0.0);
        let q = rot.to_quat(AxisScale::uniform(0.7));
        let expected = Quat::from_rotation_x(0.35);
        assert!(q.angle_between(expected) < 1e-5);

        let rot = EulerAngles::new(0.0, 0.4, 0.0);
        let q = rot.to_quat(AxisScale::ONE);
        assert!(q.angle_between(Quat::from_rotation_y(0.4)) < 1e-5);
    }

    #[test]
    fn test_frame_round_trip() {
        let frame = LandmarkFrame {
            face: Some(RiggedFace {
                head: Some(EulerAngles::new(0.1, 0.2, 0.3)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&frame).unwrap();
        let back: LandmarkFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, back);
    }
}
