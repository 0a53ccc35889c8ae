#![no_main]

use libfuzzer_sys::fuzz_target;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use waymark_core::{Rect, Size};
use waymark_overlay::placement::{PlacementMetrics, PreferredSide, place};
use waymark_overlay::tooltip::{TooltipMetrics, layout, measure};

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let screen = Size::new(i32::from(data[0]) * 8 + 16, i32::from(data[1]) * 8 + 16);
    let target = Rect::new(
        i32::from(data[2]) * 4,
        i32::from(data[3]) * 4,
        i32::from(data[4]),
        i32::from(data[5]),
    );
    let Ok(text) = std::str::from_utf8(&data[6..]) else {
        return;
    };
    if text.len() > 1024 {
        return;
    }
    // Split roughly in half on a char boundary to get a title and message.
    let mid = text
        .char_indices()
        .map(|(i, _)| i)
        .nth(text.chars().count() / 2)
        .unwrap_or(0);
    let (title, message) = text.split_at(mid);

    let metrics = TooltipMetrics::default();
    let measured = measure(title, message, screen, &metrics);

    // Wrapped lines respect the column budget derived from the screen. The
    // one exception is an indivisible grapheme cluster wider than the whole
    // budget, which wrap keeps on a line of its own.
    let max_card = (f64::from(screen.width) * f64::from(metrics.max_width_ratio)) as i32;
    let max_text = (max_card - metrics.card_padding * 2).max(metrics.char_width);
    let max_cols = (max_text / metrics.char_width).max(1) as usize;
    for line in measured
        .title_lines
        .iter()
        .chain(measured.message_lines.iter())
    {
        assert!(
            line.width() <= max_cols || line.graphemes(true).count() == 1,
            "line exceeds {} cols: {:?}",
            max_cols,
            line
        );
        assert!(!line.is_empty(), "wrap produced an empty line");
    }

    // The card never exceeds its width budget.
    assert!(
        measured.card.width <= max_card,
        "card {} wider than budget {}",
        measured.card.width,
        max_card
    );

    let placed = place(
        target,
        measured.outer,
        screen,
        PreferredSide::Below,
        &PlacementMetrics::default(),
    );
    let laid = layout(placed, measured, target.center_x(), &metrics);

    // Card sits inside the outer bounds below the arrow strip.
    assert_eq!(laid.card.y, laid.bounds.y + metrics.arrow_strip());
    assert_eq!(laid.bounds.width, laid.card.width);
    assert_eq!(laid.arrow.pointing_down, placed.above_target);

    // Arrow base sits flush on the card edge facing the target.
    if laid.arrow.pointing_down {
        assert_eq!(laid.arrow.base_left.y, laid.card.bottom());
        assert_eq!(laid.arrow.tip.y, laid.card.bottom() + metrics.arrow_height);
    } else {
        assert_eq!(laid.arrow.base_left.y, laid.card.top());
        assert_eq!(laid.arrow.tip.y, laid.card.top() - metrics.arrow_height);
    }
    assert_eq!(laid.arrow.base_left.y, laid.arrow.base_right.y);
});
