#![forbid(unsafe_code)]

//! Shown-flag registry.
//!
//! # Role
//! Tracks which tutorials have already run to completion so the engine can
//! refuse to replay them. One boolean per tutorial, keyed by
//! [`SHOWN_KEY_PREFIX`] plus the tutorial id, in whatever [`FlagStore`] the
//! host supplied.
//!
//! # Invariants
//! - A tutorial only becomes shown on completion; cancellation and aborts
//!   never write the flag.
//! - Read failures degrade to "not shown": a broken store means a tutorial
//!   may replay, never that it is lost.
//!
//! # Failure Modes
//! - [`mark_shown`](ShownRegistry::mark_shown) and
//!   [`reset`](ShownRegistry::reset) surface [`StoreError`] to the caller;
//!   the engine logs and carries on, hosts calling directly may retry.

use std::fmt;

use tracing::warn;
use waymark_core::{FlagStore, StoreError, TutorialId};

use crate::store::MemoryFlagStore;

/// Key prefix for per-tutorial shown flags.
///
/// The full key for tutorial `intro` is `tutorial_shown_intro`. Hosts that
/// share a store with other subsystems can rely on the prefix to namespace
/// these entries.
pub const SHOWN_KEY_PREFIX: &str = "tutorial_shown_";

/// Per-tutorial shown flags over a pluggable [`FlagStore`].
pub struct ShownRegistry {
    store: Box<dyn FlagStore>,
}

impl ShownRegistry {
    pub fn new(store: Box<dyn FlagStore>) -> Self {
        Self { store }
    }

    /// Registry over a fresh [`MemoryFlagStore`], for tests and previews.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryFlagStore::new()))
    }

    fn key(id: &TutorialId) -> String {
        format!("{SHOWN_KEY_PREFIX}{id}")
    }

    /// Whether `id` has already completed.
    ///
    /// A store read failure is logged and reported as `false`; replaying a
    /// tutorial beats silently suppressing one.
    pub fn has_shown(&self, id: &TutorialId) -> bool {
        match self.store.get_bool(&Self::key(id)) {
            Ok(shown) => shown,
            Err(err) => {
                warn!(tutorial = %id, error = %err, "shown-flag read failed, treating as not shown");
                false
            }
        }
    }

    /// Records that `id` ran to completion.
    pub fn mark_shown(&mut self, id: &TutorialId) -> Result<(), StoreError> {
        self.store.set_bool(&Self::key(id), true)
    }

    /// Clears the flag so `id` may run again.
    pub fn reset(&mut self, id: &TutorialId) -> Result<(), StoreError> {
        self.store.set_bool(&Self::key(id), false)
    }
}

impl fmt::Debug for ShownRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShownRegistry").finish_non_exhaustive()
    }
}
