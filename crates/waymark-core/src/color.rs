#![forbid(unsafe_code)]

//! Color type for overlay draw commands.

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a color from channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Return the same color with its alpha multiplied by `factor`.
    ///
    /// `factor` is clamped to `[0.0, 1.0]` first, so fade math can hand in
    /// slightly-out-of-range interpolation values without wrapping.
    #[must_use]
    pub fn with_alpha_scaled(&self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let a = (f32::from(self.a) * factor).round() as u8;
        Self { a, ..*self }
    }
}
