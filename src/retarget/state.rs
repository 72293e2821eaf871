//! Shared retargeting state
//!
//! Holds the most recent solved face, pose, and hand structures. The solver
//! receiver writes as frames complete; the render tick snapshots once per
//! tick. Fields are overwritten independently: an absent face in one frame
//! never clears a previously held pose (stale pose beats a snap to rest).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::solver::frame::{LandmarkFrame, RiggedFace, RiggedHand, RiggedPose};

/// Read view of the retargeting state, cloned once per render tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseSnapshot {
    pub face: Option<RiggedFace>,
    pub pose: Option<RiggedPose>,
    pub left_hand: Option<RiggedHand>,
    pub right_hand: Option<RiggedHand>,
}

/// Per-session buffer of the latest solve results.
///
/// Single writer (the solver receiver), single reader (the render tick).
/// Writes are tagged with the generation current when the producing solve
/// began; `clear` bumps the generation so a result that lands after a reset
/// is discarded instead of resurrecting the stopped session.
#[derive(Debug, Default)]
pub struct RetargetingState {
    latest: RwLock<PoseSnapshot>,
    generation: AtomicU64,
}

impl RetargetingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation tag a producer must capture before starting a solve.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Merge a completed frame into the state.
    ///
    /// Only fields present in `frame` are overwritten. Returns false (and
    /// changes nothing) when `generation` is stale, i.e. `clear` ran after
    /// the producer captured its tag.
    pub fn update(&self, generation: u64, frame: &LandmarkFrame) -> bool {
        // Lock first so a concurrent clear() can't interleave between the
        // generation check and the field writes.
        let mut latest = self.latest.write().expect("retargeting state poisoned");

        if generation != self.generation.load(Ordering::Acquire) {
            tracing::debug!("Discarding stale solve result (generation {})", generation);
            return false;
        }

        if let Some(face) = frame.face {
            latest.face = Some(face);
        }
        if let Some(pose) = frame.pose {
            latest.pose = Some(pose);
        }
        if let Some(hand) = frame.left_hand {
            latest.left_hand = Some(hand);
        }
        if let Some(hand) = frame.right_hand {
            latest.right_hand = Some(hand);
        }

        true
    }

    /// Clone the current state for one render tick.
    pub fn snapshot(&self) -> PoseSnapshot {
        *self.latest.read().expect("retargeting state poisoned")
    }

    /// Reset all fields and invalidate in-flight writes.
    pub fn clear(&self) {
        let mut latest = self.latest.write().expect("retargeting state poisoned");
        self.generation.fetch_add(1, Ordering::AcqRel);
        *latest = PoseSnapshot::default();
    }
}
