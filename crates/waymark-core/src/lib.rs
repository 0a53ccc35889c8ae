#![forbid(unsafe_code)]

//! Core: geometry, data model, host traits, and the error taxonomy.
//!
//! # Role in Waymark
//! `waymark-core` is the vocabulary layer. It owns the pixel-space geometry
//! types, the tutorial data model, the trait seams the host application
//! implements, and the shared error/event types the other crates speak.
//!
//! # Primary responsibilities
//! - **Geometry**: `Point`, `Size`, `Rect`, `Insets` in `i32` pixel space.
//! - **Model**: `Tutorial`, `Step`, and the opaque `TargetId` handle.
//! - **Host seams**: `TargetResolver`, `HostSurface`, `FlagStore`, and the
//!   non-owning `SurfaceHandle`.
//! - **Taxonomy**: `TutorialError`, `StoreError`, `AbortReason`,
//!   `TutorialEvent`.
//!
//! # How it fits in the system
//! The overlay crate (`waymark-overlay`) computes placement and draw commands
//! over these types; the engine crate (`waymark-engine`) drives the state
//! machine and talks to the host exclusively through the traits defined here.

pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod model;
pub mod surface;

pub use color::Rgba;
pub use error::{AbortReason, StoreError, TutorialError};
pub use event::TutorialEvent;
pub use geometry::{Insets, Point, Rect, Size};
pub use host::{FlagStore, HostSurface, OverlayId, TargetResolver, TargetSnapshot};
pub use model::{Step, TargetId, Tutorial, TutorialId};
pub use surface::SurfaceHandle;
