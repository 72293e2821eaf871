//! In-memory normalized rig
//!
//! A [`HumanoidRig`] implementation over plain orientation/weight maps, in
//! rest pose at identity. Drives the headless runner and the pipeline tests;
//! a GPU-rendered model plugs in through the same trait.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::retarget::bones::{ExpressionName, HumanBone};

use super::humanoid::HumanoidRig;

/// Normalized humanoid skeleton with a configurable bone set.
#[derive(Debug, Clone)]
pub struct NormalizedRig {
    bones: HashMap<HumanBone, Quat>,
    expressions: HashMap<ExpressionName, f32>,
    look_at: Vec3,
    /// Total simulated time advanced, and tick count, for diagnostics.
    advanced_secs: f32,
    advance_calls: u64,
}

impl NormalizedRig {
    /// Rig with every standardized bone and expression present.
    pub fn full() -> Self {
        Self::with_bones(HumanBone::ALL)
    }

    /// Rig restricted to the upper body (no finger bones).
    pub fn upper_body() -> Self {
        Self::with_bones(HumanBone::UPPER_BODY)
    }

    /// Rig with an explicit bone subset (non-standard skeletons).
    pub fn with_bones(bones: impl IntoIterator<Item = HumanBone>) -> Self {
        Self {
            bones: bones.into_iter().map(|b| (b, Quat::IDENTITY)).collect(),
            expressions: ExpressionName::ALL.iter().map(|&e| (e, 0.0)).collect(),
            look_at: Vec3::ZERO,
            advanced_secs: 0.0,
            advance_calls: 0,
        }
    }

    /// Number of bones present on this skeleton.
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Total time the rig has been advanced.
    pub fn advanced_secs(&self) -> f32 {
        self.advanced_secs
    }

    /// Number of advance calls (one per render tick).
    pub fn advance_calls(&self) -> u64 {
        self.advance_calls
    }
}

impl HumanoidRig for NormalizedRig {
    fn orientation(&self, bone: HumanBone) -> Option<Quat> {
        self.bones.get(&bone).copied()
    }

    fn set_orientation(&mut self, bone: HumanBone, rotation: Quat) -> bool {
        match self.bones.get_mut(&bone) {
            Some(slot) => {
                *slot = rotation;
                true
            }
            None => false,
        }
    }

    fn expression(&self, name: ExpressionName) -> Option<f32> {
        self.expressions.get(&name).copied()
    }

    fn set_expression(&mut self, name: ExpressionName, weight: f32) -> bool {
        match self.expressions.get_mut(&name) {
            Some(slot) => {
                *slot = weight.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    fn look_at(&self) -> Vec3 {
        self.look_at
    }

    fn set_look_at(&mut self, target: Vec3) {
        self.look_at = target;
    }

    fn advance(&mut self, dt: f32) {
        self.advanced_secs += dt;
        self.advance_calls += 1;
    }
}
