#![forbid(unsafe_code)]

//! Renderer-neutral overlay drawing.
//!
//! The presenter emits a flat command list in paint order; the host rasterizes
//! it with whatever graphics stack it has. [`DrawCommand::HolePunch`] clears
//! pixels already painted by earlier commands (the dim layer), which is how
//! the highlight cutout works without the engine knowing about blend modes.

use waymark_core::{Point, Rect, Rgba, Size};

use crate::tooltip::{TooltipLayout, TooltipMetrics};

/// Full-screen dim: 60% black.
pub const DIM_COLOR: Rgba = Rgba::new(0x00, 0x00, 0x00, 0x99);
/// Card background.
pub const CARD_COLOR: Rgba = Rgba::opaque(0xFF, 0xFF, 0xFF);
/// Title and body text.
pub const TEXT_COLOR: Rgba = Rgba::opaque(0x33, 0x33, 0x33);

/// Fixed colors and highlight spacing for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayTheme {
    /// Translucent wash over everything that is not highlighted.
    pub dim_color: Rgba,
    /// How far the cutout hole extends past the target's bounds.
    pub highlight_padding: i32,
    /// Corner radius of the cutout hole.
    pub hole_corner_radius: i32,
    /// Distance between the hole and the dashed ring.
    pub ring_offset: i32,
    /// Ring stroke width.
    pub ring_stroke: i32,
    /// Dash-on length of the ring stroke.
    pub ring_dash_on: i32,
    /// Dash-off length of the ring stroke.
    pub ring_dash_off: i32,
    /// Ring stroke color.
    pub ring_color: Rgba,
    /// Tooltip card fill.
    pub card_color: Rgba,
    /// Tooltip card corner radius.
    pub card_corner_radius: i32,
    /// Title and message text color.
    pub text_color: Rgba,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            dim_color: DIM_COLOR,
            highlight_padding: 8,
            hole_corner_radius: 15,
            ring_offset: 10,
            ring_stroke: 4,
            ring_dash_on: 12,
            ring_dash_off: 12,
            ring_color: Rgba::opaque(0xFF, 0xFF, 0xFF),
            card_color: CARD_COLOR,
            card_corner_radius: 12,
            text_color: TEXT_COLOR,
        }
    }
}

/// One drawing operation, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill `bounds` with a translucent color.
    Dim { bounds: Rect, color: Rgba },
    /// Clear already-painted pixels inside a rounded rect (the cutout).
    HolePunch { rect: Rect, corner_radius: i32 },
    /// Stroke a dashed rounded-rect outline.
    DashedRing {
        rect: Rect,
        corner_radius: i32,
        stroke: i32,
        dash_on: i32,
        dash_off: i32,
        color: Rgba,
    },
    /// Fill a rounded rect.
    RoundedRect {
        rect: Rect,
        corner_radius: i32,
        fill: Rgba,
    },
    /// Fill a triangle.
    Triangle {
        a: Point,
        b: Point,
        c: Point,
        fill: Rgba,
    },
    /// Draw one line of text with its top-left at `origin`.
    Text {
        origin: Point,
        content: String,
        color: Rgba,
        bold: bool,
    },
}

/// Emit the dim layer and, when a target is highlighted, its cutout and ring.
pub fn push_backdrop(
    commands: &mut Vec<DrawCommand>,
    screen: Size,
    highlight: Option<Rect>,
    theme: &OverlayTheme,
) {
    commands.push(DrawCommand::Dim {
        bounds: Rect::from_size(screen),
        color: theme.dim_color,
    });

    if let Some(target) = highlight {
        let hole = target.inflate(theme.highlight_padding);
        commands.push(DrawCommand::HolePunch {
            rect: hole,
            corner_radius: theme.hole_corner_radius,
        });
        // The ring radius grows with the offset so its corners stay
        // concentric with the hole's.
        commands.push(DrawCommand::DashedRing {
            rect: hole.inflate(theme.ring_offset),
            corner_radius: theme.hole_corner_radius + theme.ring_offset,
            stroke: theme.ring_stroke,
            dash_on: theme.ring_dash_on,
            dash_off: theme.ring_dash_off,
            color: theme.ring_color,
        });
    }
}

/// Emit the tooltip card, arrow, and text at the given fade opacity.
pub fn push_tooltip(
    commands: &mut Vec<DrawCommand>,
    layout: &TooltipLayout,
    opacity: f32,
    theme: &OverlayTheme,
    metrics: &TooltipMetrics,
) {
    let card_fill = theme.card_color.with_alpha_scaled(opacity);
    let text_fill = theme.text_color.with_alpha_scaled(opacity);

    commands.push(DrawCommand::RoundedRect {
        rect: layout.card,
        corner_radius: theme.card_corner_radius,
        fill: card_fill,
    });
    commands.push(DrawCommand::Triangle {
        a: layout.arrow.tip,
        b: layout.arrow.base_left,
        c: layout.arrow.base_right,
        fill: card_fill,
    });

    let text_x = layout.card.x + metrics.card_padding;
    let mut text_y = layout.card.y + metrics.card_padding;

    for line in &layout.title_lines {
        commands.push(DrawCommand::Text {
            origin: Point::new(text_x, text_y),
            content: line.clone(),
            color: text_fill,
            bold: true,
        });
        text_y += metrics.line_height;
    }
    if !layout.title_lines.is_empty() && !layout.message_lines.is_empty() {
        text_y += metrics.title_gap;
    }
    for line in &layout.message_lines {
        commands.push(DrawCommand::Text {
            origin: Point::new(text_x, text_y),
            content: line.clone(),
            color: text_fill,
            bold: false,
        });
        text_y += metrics.line_height;
    }
}
