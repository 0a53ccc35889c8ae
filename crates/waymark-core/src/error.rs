#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! Every failure mode the engine can hit is a named variant with a defined
//! recovery, not an ad hoc catch site:
//!
//! # Failure Modes
//! - [`TutorialError::TargetUnavailable`]: skip to the next step, never
//!   surfaced to the host.
//! - [`TutorialError::SurfaceDetached`]: one reattachment attempt; a second
//!   failure aborts the run.
//! - [`TutorialError::SurfaceUnavailable`]: the weak host handle is dead;
//!   abort immediately, no retry.
//! - [`TutorialError::ReentrantAdvance`]: duplicate dismiss signal; ignored.
//! - [`TutorialError::Persistence`]: store failure; logged, treated as
//!   "not shown" on read and best-effort on write, never fatal to a run.

use std::fmt;
use std::io;

use crate::model::TargetId;

/// Failure raised by a [`FlagStore`](crate::host::FlagStore) implementation.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying file or device I/O failed.
    Io(io::Error),
    /// The persisted document was malformed or written by an incompatible
    /// format version.
    Format(String),
    /// A host-provided backend reported a failure of its own.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "flag store I/O failure: {err}"),
            Self::Format(detail) => write!(f, "flag store document invalid: {detail}"),
            Self::Backend(detail) => write!(f, "flag store backend failure: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(_) | Self::Backend(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Failure inside the tutorial engine or presenter.
#[derive(Debug)]
pub enum TutorialError {
    /// The step's target is missing, not attached, invisible, or zero-size.
    TargetUnavailable {
        /// The handle that failed to resolve to presentable geometry.
        target: TargetId,
    },
    /// The overlay node lost its attachment to the host surface.
    SurfaceDetached,
    /// The non-owning host surface handle no longer points at a live surface.
    SurfaceUnavailable,
    /// A dismiss signal arrived while an advance was already in flight.
    ReentrantAdvance,
    /// The flag store failed underneath a registry operation.
    Persistence(StoreError),
}

impl fmt::Display for TutorialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetUnavailable { target } => {
                write!(f, "target {target} is not presentable")
            }
            Self::SurfaceDetached => f.write_str("overlay is no longer attached to the surface"),
            Self::SurfaceUnavailable => f.write_str("host surface has been dropped"),
            Self::ReentrantAdvance => f.write_str("dismiss signaled while an advance is in flight"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl std::error::Error for TutorialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Persistence(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<StoreError> for TutorialError {
    fn from(err: StoreError) -> Self {
        Self::Persistence(err)
    }
}

/// Why an active run ended without completing.
///
/// Aborted tutorials leave the shown flag untouched and are always safe to
/// start again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbortReason {
    /// A new tutorial was started while this one was active.
    Superseded,
    /// The overlay detached and a reattachment attempt failed.
    SurfaceDetached,
    /// The host surface was dropped out from under the run.
    SurfaceUnavailable,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Superseded => "superseded by a new tutorial",
            Self::SurfaceDetached => "overlay detached and could not be reattached",
            Self::SurfaceUnavailable => "host surface dropped",
        };
        f.write_str(text)
    }
}
