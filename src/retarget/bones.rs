//! Standardized humanoid bone and expression enumerations
//!
//! Bone names follow the VRM humanoid convention (the subset the retargeting
//! pipeline drives: torso, head, arms, and all finger bones). Each bone
//! carries a fixed smoothing rate and per-axis damping factor; these are
//! pipeline constants, not user configuration.

use serde::{Deserialize, Serialize};

/// Per-axis multipliers applied to a target Euler rotation before blending.
///
/// Used to damp regions where the raw solve overshoots (torso) and to flip
/// axes where a rig convention disagrees with the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AxisScale {
    pub const ONE: AxisScale = AxisScale {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub const fn uniform(s: f32) -> Self {
        Self { x: s, y: s, z: s }
    }
}

impl Default for AxisScale {
    fn default() -> Self {
        Self::ONE
    }
}

/// Standardized humanoid bones driven by the retargeting pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HumanBone {
    Hips,
    Spine,
    Chest,
    Neck,

    LeftUpperArm,
    LeftLowerArm,
    LeftHand,
    RightUpperArm,
    RightLowerArm,
    RightHand,

    LeftThumbMetacarpal,
    LeftThumbProximal,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,

    RightThumbMetacarpal,
    RightThumbProximal,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
}

impl HumanBone {
    /// Every bone the pipeline knows about.
    pub const ALL: [HumanBone; 40] = [
        HumanBone::Hips,
        HumanBone::Spine,
        HumanBone::Chest,
        HumanBone::Neck,
        HumanBone::LeftUpperArm,
        HumanBone::LeftLowerArm,
        HumanBone::LeftHand,
        HumanBone::RightUpperArm,
        HumanBone::RightLowerArm,
        HumanBone::RightHand,
        HumanBone::LeftThumbMetacarpal,
        HumanBone::LeftThumbProximal,
        HumanBone::LeftThumbDistal,
        HumanBone::LeftIndexProximal,
        HumanBone::LeftIndexIntermediate,
        HumanBone::LeftIndexDistal,
        HumanBone::LeftMiddleProximal,
        HumanBone::LeftMiddleIntermediate,
        HumanBone::LeftMiddleDistal,
        HumanBone::LeftRingProximal,
        HumanBone::LeftRingIntermediate,
        HumanBone::LeftRingDistal,
        HumanBone::LeftLittleProximal,
        HumanBone::LeftLittleIntermediate,
        HumanBone::LeftLittleDistal,
        HumanBone::RightThumbMetacarpal,
        HumanBone::RightThumbProximal,
        HumanBone::RightThumbDistal,
        HumanBone::RightIndexProximal,
        HumanBone::RightIndexIntermediate,
        HumanBone::RightIndexDistal,
        HumanBone::RightMiddleProximal,
        HumanBone::RightMiddleIntermediate,
        HumanBone::RightMiddleDistal,
        HumanBone::RightRingProximal,
        HumanBone::RightRingIntermediate,
        HumanBone::RightRingDistal,
        HumanBone::RightLittleProximal,
        HumanBone::RightLittleIntermediate,
        HumanBone::RightLittleDistal,
    ];

    /// Bones of the upper body excluding hands and fingers. Used by the
    /// "upper-body" rig profile (webcam framing that cuts at the waist).
    pub const UPPER_BODY: [HumanBone; 10] = [
        HumanBone::Hips,
        HumanBone::Spine,
        HumanBone::Chest,
        HumanBone::Neck,
        HumanBone::LeftUpperArm,
        HumanBone::LeftLowerArm,
        HumanBone::LeftHand,
        HumanBone::RightUpperArm,
        HumanBone::RightLowerArm,
        HumanBone::RightHand,
    ];

    /// VRM humanoid bone name.
    pub fn name(self) -> &'static str {
        match self {
            HumanBone::Hips => "hips",
            HumanBone::Spine => "spine",
            HumanBone::Chest => "chest",
            HumanBone::Neck => "neck",
            HumanBone::LeftUpperArm => "leftUpperArm",
            HumanBone::LeftLowerArm => "leftLowerArm",
            HumanBone::LeftHand => "leftHand",
            HumanBone::RightUpperArm => "rightUpperArm",
            HumanBone::RightLowerArm => "rightLowerArm",
            HumanBone::RightHand => "rightHand",
            HumanBone::LeftThumbMetacarpal => "leftThumbMetacarpal",
            HumanBone::LeftThumbProximal => "leftThumbProximal",
            HumanBone::LeftThumbDistal => "leftThumbDistal",
            HumanBone::LeftIndexProximal => "leftIndexProximal",
            HumanBone::LeftIndexIntermediate => "leftIndexIntermediate",
            HumanBone::LeftIndexDistal => "leftIndexDistal",
            HumanBone::LeftMiddleProximal => "leftMiddleProximal",
            HumanBone::LeftMiddleIntermediate => "leftMiddleIntermediate",
            HumanBone::LeftMiddleDistal => "leftMiddleDistal",
            HumanBone::LeftRingProximal => "leftRingProximal",
            HumanBone::LeftRingIntermediate => "leftRingIntermediate",
            HumanBone::LeftRingDistal => "leftRingDistal",
            HumanBone::LeftLittleProximal => "leftLittleProximal",
            HumanBone::LeftLittleIntermediate => "leftLittleIntermediate",
            HumanBone::LeftLittleDistal => "leftLittleDistal",
            HumanBone::RightThumbMetacarpal => "rightThumbMetacarpal",
            HumanBone::RightThumbProximal => "rightThumbProximal",
            HumanBone::RightThumbDistal => "rightThumbDistal",
            HumanBone::RightIndexProximal => "rightIndexProximal",
            HumanBone::RightIndexIntermediate => "rightIndexIntermediate",
            HumanBone::RightIndexDistal => "rightIndexDistal",
            HumanBone::RightMiddleProximal => "rightMiddleProximal",
            HumanBone::RightMiddleIntermediate => "rightMiddleIntermediate",
            HumanBone::RightMiddleDistal => "rightMiddleDistal",
            HumanBone::RightRingProximal => "rightRingProximal",
            HumanBone::RightRingIntermediate => "rightRingIntermediate",
            HumanBone::RightRingDistal => "rightRingDistal",
            HumanBone::RightLittleProximal => "rightLittleProximal",
            HumanBone::RightLittleIntermediate => "rightLittleIntermediate",
            HumanBone::RightLittleDistal => "rightLittleDistal",
        }
    }

    /// Smoothing rate constant (multiplied by elapsed frame time).
    ///
    /// Hands and fingers track fast motion; torso and arms are damped harder
    /// to absorb solver jitter.
    pub fn smoothing_rate(self) -> f32 {
        match self {
            HumanBone::Hips
            | HumanBone::Spine
            | HumanBone::Chest
            | HumanBone::Neck
            | HumanBone::LeftUpperArm
            | HumanBone::LeftLowerArm
            | HumanBone::RightUpperArm
            | HumanBone::RightLowerArm => 5.0,
            // Wrists and every finger bone
            _ => 12.0,
        }
    }

    /// Per-axis damping applied to the target rotation for this bone.
    pub fn axis_scale(self) -> AxisScale {
        match self {
            HumanBone::Neck | HumanBone::Hips => AxisScale::uniform(0.7),
            HumanBone::Spine | HumanBone::Chest => AxisScale::uniform(0.3),
            _ => AxisScale::ONE,
        }
    }
}

impl std::fmt::Display for HumanBone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Standardized expression (morph) names driven by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionName {
    Aa,
    Ih,
    Ee,
    Oh,
    Ou,
    BlinkLeft,
    BlinkRight,
    Angry,
    Sad,
    Happy,
}

impl ExpressionName {
    pub const ALL: [ExpressionName; 10] = [
        ExpressionName::Aa,
        ExpressionName::Ih,
        ExpressionName::Ee,
        ExpressionName::Oh,
        ExpressionName::Ou,
        ExpressionName::BlinkLeft,
        ExpressionName::BlinkRight,
        ExpressionName::Angry,
        ExpressionName::Sad,
        ExpressionName::Happy,
    ];

    /// The seven expressions subject to smoothing (vowels + blinks).
    pub const BLENDED: [ExpressionName; 7] = [
        ExpressionName::Aa,
        ExpressionName::Ih,
        ExpressionName::Ee,
        ExpressionName::Oh,
        ExpressionName::Ou,
        ExpressionName::BlinkLeft,
        ExpressionName::BlinkRight,
    ];

    /// Emotion sliders, always driven directly from manual values.
    pub const EMOTIONS: [ExpressionName; 3] = [
        ExpressionName::Angry,
        ExpressionName::Sad,
        ExpressionName::Happy,
    ];

    /// VRM expression preset name.
    pub fn name(self) -> &'static str {
        match self {
            ExpressionName::Aa => "aa",
            ExpressionName::Ih => "ih",
            ExpressionName::Ee => "ee",
            ExpressionName::Oh => "oh",
            ExpressionName::Ou => "ou",
            ExpressionName::BlinkLeft => "blinkLeft",
            ExpressionName::BlinkRight => "blinkRight",
            ExpressionName::Angry => "angry",
            ExpressionName::Sad => "sad",
            ExpressionName::Happy => "happy",
        }
    }
}

impl std::fmt::Display for ExpressionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
