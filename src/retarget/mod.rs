//! Retargeting pipeline
//!
//! Turns noisy per-frame landmark solves into stable, anatomically plausible
//! skeletal pose and expression state:
//! - shared per-session state the solver writes and the render tick reads
//! - time-based bone rotation blending with per-bone damping
//! - expression blending (tracked and manual modes)
//! - gaze steering from pupil offsets

pub mod applier;
pub mod bones;
pub mod expression;
pub mod gaze;
pub mod pipeline;
pub mod state;

pub use bones::{AxisScale, ExpressionName, HumanBone};
pub use expression::ManualSliders;
pub use pipeline::Retargeter;
pub use state::{PoseSnapshot, RetargetingState};
