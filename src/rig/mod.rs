//! Rig interface and the in-memory reference implementation.

pub mod humanoid;
pub mod normalized;

pub use humanoid::HumanoidRig;
pub use normalized::NormalizedRig;
