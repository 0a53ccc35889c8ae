#![forbid(unsafe_code)]

//! Geometric primitives in pixel space.
//!
//! Coordinates are `i32` with the origin at the host screen's top-left.
//! Signed arithmetic keeps intermediate placement math (which routinely dips
//! below zero near screen edges) free of wrap-around surprises; callers clamp
//! at the end, not at every subtraction.

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check whether either dimension is zero or negative.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// A rectangle for target bounds, tooltip cards, and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Horizontal midpoint.
    #[inline]
    pub const fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Vertical midpoint.
    #[inline]
    pub const fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// The rectangle's size.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Check if the rectangle has zero or negative area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Grow the rectangle outward by `amount` on every side.
    ///
    /// A negative `amount` shrinks instead; dimensions are floored at zero so
    /// over-shrinking yields an empty rectangle rather than an inverted one.
    #[inline]
    pub const fn inflate(&self, amount: i32) -> Rect {
        let width = self.width + amount * 2;
        let height = self.height + amount * 2;
        Rect {
            x: self.x - amount,
            y: self.y - amount,
            width: if width > 0 { width } else { 0 },
            height: if height > 0 { height } else { 0 },
        }
    }

    /// Shrink the rectangle inward by the given insets (floored at zero size).
    pub const fn inset(&self, insets: Insets) -> Rect {
        let width = self.width - insets.left - insets.right;
        let height = self.height - insets.top - insets.bottom;
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: if width > 0 { width } else { 0 },
            height: if height > 0 { height } else { 0 },
        }
    }
}

/// Per-side spacing for padding and margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Insets {
    /// Create insets with distinct values per side.
    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create uniform insets.
    #[inline]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Total horizontal spacing (left + right).
    #[inline]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total vertical spacing (top + bottom).
    #[inline]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

impl From<i32> for Insets {
    fn from(value: i32) -> Self {
        Self::uniform(value)
    }
}
