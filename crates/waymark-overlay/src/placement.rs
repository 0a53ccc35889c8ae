#![forbid(unsafe_code)]

//! Tooltip placement against live target geometry.
//!
//! Placement is a pure function: target rect in, tooltip size in, screen size
//! in, `(x, y, above_target)` out. Nothing here is persisted; the result is
//! recomputed on every presentation.
//!
//! Vertical resolution is an ordered fallback chain, not a single heuristic:
//! targets near screen edges or with very little free space must still render
//! inside visible bounds, and degrading to "centered on screen" only when no
//! directional placement is usable preserves the directional hint whenever
//! physically possible.
//!
//! # Example
//! ```ignore
//! let metrics = PlacementMetrics::default();
//! let result = place(
//!     Rect::new(100, 900, 80, 40),
//!     Size::new(300, 150),
//!     Size::new(400, 1000),
//!     PreferredSide::Below,
//!     &metrics,
//! );
//! assert!(result.above_target);
//! ```

use waymark_core::{Rect, Size};

/// Which side of the target the caller would like the tooltip on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferredSide {
    /// Tooltip above the target.
    Above,
    /// Tooltip below the target.
    #[default]
    Below,
}

impl PreferredSide {
    /// The opposite side, for flip logic.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
        }
    }
}

/// Fixed spacing the placement math works with.
///
/// The horizontal clamp margin is a screen-edge inset plus a small slack so
/// cards never sit flush against the bezel; the vertical margin is the
/// target-to-card gap plus slack so the card clears the dashed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementMetrics {
    /// Base inset from the screen's left/right edges.
    pub screen_margin: i32,
    /// Extra horizontal slack on top of `screen_margin`.
    pub horizontal_slack: i32,
    /// Base gap between the target and the card.
    pub vertical_gap: i32,
    /// Extra vertical slack on top of `vertical_gap`.
    pub vertical_slack: i32,
    /// Minimum leftover space that still counts as a usable edge-pin spot.
    pub usable_threshold: i32,
}

impl Default for PlacementMetrics {
    fn default() -> Self {
        Self {
            screen_margin: 32,
            horizontal_slack: 15,
            vertical_gap: 16,
            vertical_slack: 10,
            usable_threshold: 50,
        }
    }
}

impl PlacementMetrics {
    /// Full horizontal clamp margin.
    #[inline]
    pub const fn horizontal_margin(&self) -> i32 {
        self.screen_margin + self.horizontal_slack
    }

    /// Full vertical target-to-card margin.
    #[inline]
    pub const fn vertical_margin(&self) -> i32 {
        self.vertical_gap + self.vertical_slack
    }
}

/// Where the tooltip's outer bounds landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementResult {
    /// Left edge of the tooltip bounds.
    pub x: i32,
    /// Top edge of the tooltip bounds.
    pub y: i32,
    /// The tooltip ended up entirely above the target; selects which edge of
    /// the card carries the pointer arrow.
    pub above_target: bool,
}

/// Pick the preferred side from the target's vertical screen position.
///
/// Targets whose top sits in the lower half of the screen prefer the tooltip
/// above them; everything else prefers below.
#[must_use]
pub fn preferred_side_for(target: Rect, screen: Size) -> PreferredSide {
    if target.y > screen.height / 2 {
        PreferredSide::Above
    } else {
        PreferredSide::Below
    }
}

/// Place a tooltip of `tooltip` size against `target` on a `screen`.
///
/// Horizontal: centered on the target's midpoint, clamped into
/// `[margin, screen.width - tooltip.width - margin]`. Vertical: the ordered
/// fallback chain, which tries the preferred side if it fits at all, then the
/// auto side if the space genuinely fits without clamping, then an edge pin
/// if a usable amount of space remains, then the screen center.
#[must_use]
pub fn place(
    target: Rect,
    tooltip: Size,
    screen: Size,
    preferred: PreferredSide,
    metrics: &PlacementMetrics,
) -> PlacementResult {
    let h_margin = metrics.horizontal_margin();
    let v_margin = metrics.vertical_margin();

    let x = clamp_x(
        target.center_x() - tooltip.width / 2,
        tooltip.width,
        screen.width,
        h_margin,
    );

    let space_below = screen.height - target.bottom() - v_margin - tooltip.height;
    let space_above = target.y - v_margin - tooltip.height;

    let below_y = target.bottom() + v_margin;
    let above_y = target.y - v_margin - tooltip.height;

    let y = if preferred == PreferredSide::Below && space_below >= 0 {
        below_y
    } else if preferred == PreferredSide::Above && space_above >= 0 {
        above_y
    } else if space_below >= tooltip.height {
        // Auto: fits below with room to spare.
        below_y
    } else if space_above >= tooltip.height {
        above_y
    } else if space_below > space_above && space_below > metrics.usable_threshold {
        // Pin to the bottom edge; the horizontal margin doubles as the
        // edge-pin inset so pinned cards keep the same visual breathing room.
        screen.height - tooltip.height - h_margin
    } else if space_above > metrics.usable_threshold {
        h_margin
    } else {
        (screen.height - tooltip.height) / 2
    };
    let y = y.max(0);

    PlacementResult {
        x,
        y,
        above_target: y + tooltip.height < target.y,
    }
}

/// Clamp an x position so the tooltip stays inside the screen margins.
///
/// A tooltip wider than the margin-bounded span inverts the clamp range; in
/// that case the overflow is split evenly by centering on the screen.
fn clamp_x(x: i32, width: i32, screen_width: i32, margin: i32) -> i32 {
    let min_x = margin;
    let max_x = screen_width - width - margin;
    if max_x < min_x {
        return (screen_width - width) / 2;
    }
    x.clamp(min_x, max_x)
}
