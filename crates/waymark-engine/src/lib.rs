#![forbid(unsafe_code)]

//! Waymark Engine
//!
//! This crate provides the orchestration layer that ties together the core
//! model and the overlay renderer into a complete tutorial runtime.
//!
//! # Key Components
//!
//! - [`TutorialEngine`] - State machine driving one tutorial at a time
//! - [`EngineConfig`] - Settle and step-gap timing knobs
//! - [`ShownRegistry`] - Per-tutorial shown flags over a [`FlagStore`]
//! - [`MemoryFlagStore`] - Volatile store for tests and previews
//! - [`JsonFileStore`] - Durable store with atomic JSON snapshots
//!
//! # Role in Waymark
//! `waymark-engine` is the conductor. It consumes target lookups from the
//! host's [`TargetResolver`], drives an [`OverlayPresenter`] through each
//! step, and records completion through the [`ShownRegistry`] so a finished
//! tutorial never replays.
//!
//! # How it fits in the system
//! The engine is the only piece with a lifecycle: `waymark-core` defines
//! inert data and trait seams, `waymark-overlay` lays out a single step, and
//! this crate decides which step that is and when to move on.
//!
//! [`FlagStore`]: waymark_core::FlagStore
//! [`TargetResolver`]: waymark_core::TargetResolver
//! [`OverlayPresenter`]: waymark_overlay::OverlayPresenter

pub mod engine;
pub mod registry;
pub mod store;

pub use engine::{EngineConfig, TutorialEngine};
pub use registry::{SHOWN_KEY_PREFIX, ShownRegistry};
pub use store::{JsonFileStore, MemoryFlagStore};
