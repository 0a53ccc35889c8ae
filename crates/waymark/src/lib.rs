#![forbid(unsafe_code)]

//! Waymark public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users. It
//! re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use waymark_core::{
    AbortReason, FlagStore, HostSurface, Insets, OverlayId, Point, Rect, Rgba, Size, Step,
    StoreError, SurfaceHandle, TargetId, TargetResolver, TargetSnapshot, Tutorial, TutorialError,
    TutorialEvent, TutorialId,
};

// --- Overlay re-exports ----------------------------------------------------

pub use waymark_overlay::{
    DrawCommand, OverlayPresenter, OverlayTheme, PlacementMetrics, PlacementResult, PreferredSide,
    PresenterConfig, PresenterSignal, TapOutcome, TooltipLayout, TooltipMetrics, TooltipPhase,
    place, preferred_side_for,
};

// --- Engine re-exports -----------------------------------------------------

pub use waymark_engine::{
    EngineConfig, JsonFileStore, MemoryFlagStore, SHOWN_KEY_PREFIX, ShownRegistry, TutorialEngine,
};

// --- Result alias ----------------------------------------------------------

/// Standard result type for Waymark APIs.
pub type Result<T> = std::result::Result<T, TutorialError>;

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AbortReason, EngineConfig, FlagStore, HostSurface, OverlayId, Point, Rect, ShownRegistry,
        Size, Step, StoreError, TargetId, TargetResolver, TargetSnapshot, Tutorial, TutorialEngine,
        TutorialError, TutorialEvent, TutorialId,
    };

    pub use crate::{core, engine, overlay};
}

pub use waymark_core as core;
pub use waymark_engine as engine;
pub use waymark_overlay as overlay;
