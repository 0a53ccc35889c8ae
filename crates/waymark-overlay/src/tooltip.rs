#![forbid(unsafe_code)]

//! Tooltip measurement and layout.
//!
//! The engine is renderer-agnostic, so text is measured with a fixed-advance
//! pixel metric over Unicode display width: wide (CJK) glyphs count two
//! columns, combining marks zero. Hosts with a real font stack can substitute
//! their own [`TooltipMetrics`] values after measuring a reference glyph.
//!
//! Layout happens in two phases matching the presentation flow: [`measure`]
//! before placement (the placement math needs the outer size), [`layout`]
//! after it (the arrow needs the final card position and side).

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use waymark_core::{Point, Rect, Size};

use crate::placement::PlacementResult;

/// Fixed-advance text metrics and card spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipMetrics {
    /// Horizontal advance of one text column, in pixels.
    pub char_width: i32,
    /// Line height, in pixels.
    pub line_height: i32,
    /// Card padding on every side.
    pub card_padding: i32,
    /// Gap between the title block and the message block.
    pub title_gap: i32,
    /// Fraction of the screen width the card may occupy.
    pub max_width_ratio: f32,
    /// Arrow base width.
    pub arrow_width: i32,
    /// Arrow height from base to tip.
    pub arrow_height: i32,
    /// Minimum distance between the arrow's edge and the card's corner.
    pub arrow_tip_inset: i32,
    /// Extra clearance between the card edge and the arrow strip.
    pub arrow_clearance: i32,
}

impl Default for TooltipMetrics {
    fn default() -> Self {
        Self {
            char_width: 8,
            line_height: 18,
            card_padding: 14,
            title_gap: 6,
            max_width_ratio: 0.85,
            arrow_width: 40,
            arrow_height: 20,
            arrow_tip_inset: 10,
            arrow_clearance: 4,
        }
    }
}

impl TooltipMetrics {
    /// Vertical strip reserved on each side of the card for the arrow.
    ///
    /// Both sides, because measurement runs before placement decides which
    /// side the arrow lands on; a symmetric reservation keeps the measured
    /// size side-independent.
    #[inline]
    pub const fn arrow_strip(&self) -> i32 {
        self.arrow_height + self.arrow_clearance
    }
}

/// Size information produced by [`measure`], consumed by [`layout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasuredTooltip {
    /// Outer bounds the placement math positions (card plus arrow strips).
    pub outer: Size,
    /// The card alone.
    pub card: Size,
    /// Title wrapped to the card width; empty when the title is empty.
    pub title_lines: Vec<String>,
    /// Message wrapped to the card width.
    pub message_lines: Vec<String>,
}

/// The pointer arrow as a filled triangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowGeometry {
    /// Apex of the triangle (the end pointing at the target).
    pub tip: Point,
    /// Base corner nearer the card's left edge.
    pub base_left: Point,
    /// Base corner nearer the card's right edge.
    pub base_right: Point,
    /// True when the arrow hangs under the card pointing down at the target.
    pub pointing_down: bool,
}

/// A fully positioned tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLayout {
    /// Outer bounds (hit-test region; taps inside are swallowed).
    pub bounds: Rect,
    /// The rounded card holding the text.
    pub card: Rect,
    /// The pointer arrow on the edge facing the target.
    pub arrow: ArrowGeometry,
    /// Wrapped title lines.
    pub title_lines: Vec<String>,
    /// Wrapped message lines.
    pub message_lines: Vec<String>,
}

impl TooltipLayout {
    /// Whether a tap lands inside the tooltip (card or arrow strip).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }
}

/// Measure a tooltip for the given step text on the given screen.
#[must_use]
pub fn measure(
    title: &str,
    message: &str,
    screen: Size,
    metrics: &TooltipMetrics,
) -> MeasuredTooltip {
    let max_card_width = (f64::from(screen.width) * f64::from(metrics.max_width_ratio)) as i32;
    let max_text_width = (max_card_width - metrics.card_padding * 2).max(metrics.char_width);
    let max_cols = (max_text_width / metrics.char_width).max(1) as usize;

    let title_lines = wrap_columns(title, max_cols);
    let message_lines = wrap_columns(message, max_cols);

    let widest_cols = title_lines
        .iter()
        .chain(message_lines.iter())
        .map(|line| line.width())
        .max()
        .unwrap_or(0);

    let text_width = (widest_cols as i32) * metrics.char_width;
    let card_width = (text_width + metrics.card_padding * 2).min(max_card_width);

    let line_count = title_lines.len() + message_lines.len();
    let mut card_height = (line_count as i32) * metrics.line_height + metrics.card_padding * 2;
    if !title_lines.is_empty() && !message_lines.is_empty() {
        card_height += metrics.title_gap;
    }

    MeasuredTooltip {
        outer: Size::new(card_width, card_height + metrics.arrow_strip() * 2),
        card: Size::new(card_width, card_height),
        title_lines,
        message_lines,
    }
}

/// Position a measured tooltip and derive its arrow.
///
/// `target_center_x` is where the arrow would ideally point; the tip is
/// clamped to stay within the card's horizontal extent (minus the corner
/// inset) even when a very wide target centers outside a narrow card.
#[must_use]
pub fn layout(
    placed: PlacementResult,
    measured: MeasuredTooltip,
    target_center_x: i32,
    metrics: &TooltipMetrics,
) -> TooltipLayout {
    let bounds = Rect::new(placed.x, placed.y, measured.outer.width, measured.outer.height);
    let card = Rect::new(
        bounds.x,
        bounds.y + metrics.arrow_strip(),
        measured.card.width,
        measured.card.height,
    );

    let half_arrow = metrics.arrow_width / 2;
    let min_tip = card.left() + half_arrow + metrics.arrow_tip_inset;
    let max_tip = card.right() - half_arrow - metrics.arrow_tip_inset;
    let tip_x = if max_tip < min_tip {
        card.center_x()
    } else {
        target_center_x.clamp(min_tip, max_tip)
    };

    let arrow = if placed.above_target {
        // Card sits above the target: arrow hangs off the bottom edge.
        ArrowGeometry {
            tip: Point::new(tip_x, card.bottom() + metrics.arrow_height),
            base_left: Point::new(tip_x - half_arrow, card.bottom()),
            base_right: Point::new(tip_x + half_arrow, card.bottom()),
            pointing_down: true,
        }
    } else {
        ArrowGeometry {
            tip: Point::new(tip_x, card.top() - metrics.arrow_height),
            base_left: Point::new(tip_x - half_arrow, card.top()),
            base_right: Point::new(tip_x + half_arrow, card.top()),
            pointing_down: false,
        }
    };

    TooltipLayout {
        bounds,
        card,
        arrow,
        title_lines: measured.title_lines,
        message_lines: measured.message_lines,
    }
}

/// Greedy word wrap to a column budget, measured in display width.
///
/// Words wider than the budget are hard-broken on grapheme boundaries so a
/// single long token (a URL, say) cannot push the card past the screen.
fn wrap_columns(text: &str, max_cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_cols = 0usize;

    for word in text.split_whitespace() {
        let word_cols = word.width();

        if word_cols > max_cols {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_cols = 0;
            }
            break_long_word(word, max_cols, &mut lines, &mut current, &mut current_cols);
            continue;
        }

        let needed = if current.is_empty() {
            word_cols
        } else {
            current_cols + 1 + word_cols
        };

        if needed > max_cols && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_cols = word_cols;
        } else {
            if !current.is_empty() {
                current.push(' ');
                current_cols += 1;
            }
            current.push_str(word);
            current_cols += word_cols;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split an over-wide word into grapheme chunks that fit the budget.
///
/// The last chunk is left in `current` so following words can share its line.
fn break_long_word(
    word: &str,
    max_cols: usize,
    lines: &mut Vec<String>,
    current: &mut String,
    current_cols: &mut usize,
) {
    for grapheme in word.graphemes(true) {
        let g_cols = grapheme.width();
        if *current_cols + g_cols > max_cols && !current.is_empty() {
            lines.push(std::mem::take(current));
            *current_cols = 0;
        }
        current.push_str(grapheme);
        *current_cols += g_cols;
    }
}
