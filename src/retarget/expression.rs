//! Expression blending
//!
//! Drives the rig's expression weights. Two mutually exclusive modes,
//! selected by whether a live video source is attached: tracked mode pulls
//! vowel shapes and blinks from the latest face solve; manual mode blends
//! toward user slider values. Emotion sliders bypass smoothing in both modes.

use serde::{Deserialize, Serialize};

use crate::rig::humanoid::HumanoidRig;
use crate::solver::frame::RiggedFace;

use super::bones::ExpressionName;

/// Smoothing rate for blended expressions (multiplied by elapsed time).
pub const EXPRESSION_RATE: f32 = 12.0;

/// Manual expression slider values, all in [0, 1].
///
/// Fed from config defaults and whatever UI layer the host wires up; passed
/// into each tick as plain data so the blender stays toolkit-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualSliders {
    pub aa: f32,
    pub ih: f32,
    pub ee: f32,
    pub oh: f32,
    pub ou: f32,
    pub blink_left: f32,
    pub blink_right: f32,
    pub angry: f32,
    pub sad: f32,
    pub happy: f32,
}

impl ManualSliders {
    /// Slider value for an expression.
    pub fn value(&self, name: ExpressionName) -> f32 {
        match name {
            ExpressionName::Aa => self.aa,
            ExpressionName::Ih => self.ih,
            ExpressionName::Ee => self.ee,
            ExpressionName::Oh => self.oh,
            ExpressionName::Ou => self.ou,
            ExpressionName::BlinkLeft => self.blink_left,
            ExpressionName::BlinkRight => self.blink_right,
            ExpressionName::Angry => self.angry,
            ExpressionName::Sad => self.sad,
            ExpressionName::Happy => self.happy,
        }
    }

    /// All sliders with their config field names, for validation.
    pub fn named_values(&self) -> [(&'static str, f32); 10] {
        [
            ("aa", self.aa),
            ("ih", self.ih),
            ("ee", self.ee),
            ("oh", self.oh),
            ("ou", self.ou),
            ("blink_left", self.blink_left),
            ("blink_right", self.blink_right),
            ("angry", self.angry),
            ("sad", self.sad),
            ("happy", self.happy),
        ]
    }
}

/// Exponential approach: move `current` toward `target` by `rate`, clamped
/// so one step never overshoots. At the fixed point this is the identity.
fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate.clamp(0.0, 1.0)
}

/// Blend one expression toward a target. Models lacking the expression are
/// skipped.
fn blend_expression(rig: &mut dyn HumanoidRig, name: ExpressionName, target: f32, dt: f32) {
    let Some(current) = rig.expression(name) else {
        return;
    };
    rig.set_expression(name, approach(current, target, dt * EXPRESSION_RATE));
}

/// Drive emotion sliders directly (no smoothing). Always active regardless
/// of tracking mode.
pub fn apply_emotions(rig: &mut dyn HumanoidRig, sliders: &ManualSliders) {
    for name in ExpressionName::EMOTIONS {
        rig.set_expression(name, sliders.value(name));
    }
}

/// Manual mode: blend the seven mouth/blink expressions toward sliders.
pub fn blend_manual(rig: &mut dyn HumanoidRig, sliders: &ManualSliders, dt: f32) {
    for name in ExpressionName::BLENDED {
        blend_expression(rig, name, sliders.value(name), dt);
    }
}

/// Tracked mode: blend vowels from the face solve's mouth shape and blinks
/// from `1 − openness`. A face with no mouth-shape group drives the vowels
/// to zero; same for blinks without an eye group. Callers skip this entirely
/// when no face solve is held, which leaves all seven weights in place.
pub fn blend_tracked(rig: &mut dyn HumanoidRig, face: &RiggedFace, dt: f32) {
    let mouth = face.mouth.unwrap_or_default();
    blend_expression(rig, ExpressionName::Aa, mouth.a, dt);
    blend_expression(rig, ExpressionName::Ih, mouth.i, dt);
    blend_expression(rig, ExpressionName::Ee, mouth.e, dt);
    blend_expression(rig, ExpressionName::Oh, mouth.o, dt);
    blend_expression(rig, ExpressionName::Ou, mouth.u, dt);

    let (blink_l, blink_r) = match face.eye {
        Some(eye) => (1.0 - eye.l, 1.0 - eye.r),
        None => (0.0, 0.0),
    };
    blend_expression(rig, ExpressionName::BlinkLeft, blink_l, dt);
    blend_expression(rig, ExpressionName::BlinkRight, blink_r, dt);
}
