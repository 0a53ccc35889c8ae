#![forbid(unsafe_code)]

//! Overlay: tooltip placement, scene drawing, and presentation.
//!
//! # Role in Waymark
//! `waymark-overlay` turns one validated step into pixels-to-be: it measures
//! the tooltip text, places the card against live target geometry, emits the
//! renderer-neutral draw commands for the dimmed backdrop / cutout hole /
//! dashed ring / card / arrow, and runs the enter/exit fades with
//! exactly-once dismissal.
//!
//! # Primary responsibilities
//! - **Placement**: ordered-fallback positioning under tight space
//!   constraints ([`placement::place`]).
//! - **Tooltip layout**: word wrap by Unicode display width, card and
//!   pointer-arrow geometry ([`tooltip`]).
//! - **Scene**: the [`scene::DrawCommand`] list a host rasterizes each frame.
//! - **Presentation**: [`presenter::OverlayPresenter`] fade phases, tap
//!   routing, dismiss guards, idempotent cleanup.
//!
//! # How it fits in the system
//! The engine (`waymark-engine`) owns a presenter per run, feeds it validated
//! target rects and step text, forwards pointer taps, and listens for the
//! dismissal signal from `tick` to advance the tutorial.

pub mod placement;
pub mod presenter;
pub mod scene;
pub mod tooltip;

pub use placement::{PlacementMetrics, PlacementResult, PreferredSide, place, preferred_side_for};
pub use presenter::{OverlayPresenter, PresenterConfig, PresenterSignal, TapOutcome, TooltipPhase};
pub use scene::{DrawCommand, OverlayTheme};
pub use tooltip::{ArrowGeometry, TooltipLayout, TooltipMetrics};
