//! Humanoid rig interface
//!
//! The narrow surface the retargeting pipeline needs from a loaded model.
//! Asset loading, skinning, and rendering live behind this trait; the
//! pipeline only reads/writes normalized bone orientations, expression
//! weights, and the gaze target, then advances the rig once per tick.

use glam::{Quat, Vec3};

use crate::retarget::bones::{ExpressionName, HumanBone};

/// A loaded humanoid model as seen by the retargeting pipeline.
///
/// Bones absent from a particular skeleton return `None`/`false`; that is a
/// per-bone condition, never an error. Expression weights are clamped by the
/// implementation to [0, 1].
pub trait HumanoidRig {
    /// Current local orientation of a bone, `None` when the skeleton lacks it.
    fn orientation(&self, bone: HumanBone) -> Option<Quat>;

    /// Overwrite a bone's local orientation. Returns false when the skeleton
    /// lacks the bone (nothing written).
    fn set_orientation(&mut self, bone: HumanBone, rotation: Quat) -> bool;

    /// Current weight of an expression, `None` when the model lacks it.
    fn expression(&self, name: ExpressionName) -> Option<f32>;

    /// Set an expression weight (implementations clamp to [0, 1]). Returns
    /// false when the model lacks the expression.
    fn set_expression(&mut self, name: ExpressionName, weight: f32) -> bool;

    /// Current gaze-target position, camera-local.
    fn look_at(&self) -> Vec3;

    /// Move the gaze target.
    fn set_look_at(&mut self, target: Vec3);

    /// Advance the rig's internal skeleton/morph systems by `dt` seconds.
    /// Must be called exactly once per render tick, after all mutations.
    fn advance(&mut self, dt: f32);
}
