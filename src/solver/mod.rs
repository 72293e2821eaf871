//! Landmark solver adapter
//!
//! The pose/face/hand solver runs out of process (MediaPipe Holistic plus a
//! kalidokit-style solve step) and delivers one JSON datagram per frame.
//! This module owns the wire types and the UDP receiver that feeds the
//! shared retargeting state.

pub mod frame;
pub mod receiver;

pub use frame::{LandmarkFrame, RiggedFace, RiggedHand, RiggedPose, SolverPacket};
pub use receiver::SolverReceiver;
