#![forbid(unsafe_code)]

//! Non-owning handle to the host surface.
//!
//! The engine must never keep the host's screen alive past its own lifecycle,
//! so it holds a [`Weak`] reference and upgrades per operation. A dead handle
//! fails with [`TutorialError::SurfaceUnavailable`] instead of reattaching to
//! a stale screen.
//!
//! # Invariants
//! - The engine owns no strong reference to the surface between operations.
//! - Every surface-touching operation upgrades first; there is no cached
//!   `Rc` that could outlive the host.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::TutorialError;
use crate::host::HostSurface;

/// Weak handle to the surface the engine last attached to.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Weak<RefCell<dyn HostSurface>>,
}

impl SurfaceHandle {
    /// Downgrade a live surface into a non-owning handle.
    #[must_use]
    pub fn new(surface: &Rc<RefCell<dyn HostSurface>>) -> Self {
        Self {
            inner: Rc::downgrade(surface),
        }
    }

    /// Upgrade to a strong reference for the duration of one operation.
    pub fn upgrade(&self) -> Result<Rc<RefCell<dyn HostSurface>>, TutorialError> {
        self.inner.upgrade().ok_or(TutorialError::SurfaceUnavailable)
    }

    /// Whether the surface is still alive.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
