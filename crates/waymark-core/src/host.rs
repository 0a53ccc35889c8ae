#![forbid(unsafe_code)]

//! Trait seams implemented by the host application.
//!
//! The engine never touches a real widget tree, window, or preference system;
//! it sees the host exclusively through these three traits. All of them are
//! object-safe because the engine stores them as trait objects.
//!
//! # Example
//! ```ignore
//! struct FixedResolver(HashMap<TargetId, TargetSnapshot>);
//!
//! impl TargetResolver for FixedResolver {
//!     fn resolve(&self, target: &TargetId) -> Option<TargetSnapshot> {
//!         self.0.get(target).copied()
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{StoreError, TutorialError};
use crate::geometry::{Rect, Size};
use crate::model::TargetId;

/// What the host knows about a target at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetSnapshot {
    /// On-screen bounds in surface pixel coordinates.
    pub rect: Rect,
    /// Whether the element is currently part of the live widget tree.
    pub attached: bool,
    /// Whether the element is currently visible (not hidden or collapsed).
    pub visible: bool,
}

impl TargetSnapshot {
    /// Create a snapshot.
    #[must_use]
    pub const fn new(rect: Rect, attached: bool, visible: bool) -> Self {
        Self {
            rect,
            attached,
            visible,
        }
    }

    /// A snapshot for an element that is attached, visible, and laid out.
    #[must_use]
    pub const fn visible_at(rect: Rect) -> Self {
        Self::new(rect, true, true)
    }

    /// A step may be presented against this snapshot.
    ///
    /// Requires attachment, visibility, and a laid-out nonzero size. A
    /// zero-size element (not yet measured) is treated exactly like a missing
    /// one: the step is skipped, never retried.
    #[inline]
    pub const fn is_presentable(&self) -> bool {
        self.attached && self.visible && self.rect.width > 0 && self.rect.height > 0
    }
}

/// Resolves an opaque target handle to live geometry.
pub trait TargetResolver {
    /// Look up the target; `None` when no such element exists right now.
    fn resolve(&self, target: &TargetId) -> Option<TargetSnapshot>;
}

/// Identity of one overlay node, unique per presenter instance.
///
/// The host uses it to correlate attach/detach calls with whatever node it
/// actually created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for host-side bookkeeping and logs.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// The full-screen layer the engine attaches its overlay to.
pub trait HostSurface {
    /// Current size of the surface in pixels.
    fn surface_size(&self) -> Size;

    /// Attach the overlay node identified by `id` over all other content.
    fn attach_overlay(&mut self, id: OverlayId) -> Result<(), TutorialError>;

    /// Detach the overlay node if it is attached; detaching an unknown id is
    /// a no-op, not an error.
    fn detach_overlay(&mut self, id: OverlayId) -> Result<(), TutorialError>;

    /// Whether the overlay node is currently attached.
    ///
    /// Hosts that rebuild their view hierarchy (tab switches, theme changes)
    /// may drop the overlay without telling the engine; this is how the
    /// engine finds out.
    fn is_overlay_attached(&self, id: OverlayId) -> bool;
}

/// Persistent boolean flags that survive process restarts.
pub trait FlagStore {
    /// Read a flag; missing keys read as `Ok(false)`.
    fn get_bool(&self, key: &str) -> Result<bool, StoreError>;

    /// Write a flag.
    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError>;
}
