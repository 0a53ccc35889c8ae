#![forbid(unsafe_code)]

//! Events the engine raises to the host.
//!
//! Events accumulate in an internal queue and are drained with
//! `TutorialEngine::take_events`; a single host call can produce more than one
//! (starting tutorial B while A is active aborts A and then presents B).

use crate::error::AbortReason;
use crate::model::TutorialId;

/// Notification from the engine to the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TutorialEvent {
    /// A step's tooltip finished layout and began its enter fade.
    StepPresented {
        tutorial: TutorialId,
        /// Zero-based index into the tutorial's steps.
        step: usize,
    },
    /// The run walked past its last step; the shown flag has been written.
    Completed { tutorial: TutorialId },
    /// The run ended early; the shown flag was left untouched.
    Aborted {
        tutorial: TutorialId,
        reason: AbortReason,
    },
}

impl TutorialEvent {
    /// The tutorial this event concerns.
    pub fn tutorial(&self) -> &TutorialId {
        match self {
            Self::StepPresented { tutorial, .. }
            | Self::Completed { tutorial }
            | Self::Aborted { tutorial, .. } => tutorial,
        }
    }
}
