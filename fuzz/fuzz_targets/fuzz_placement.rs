#![no_main]

use libfuzzer_sys::fuzz_target;
use waymark_core::{Rect, Size};
use waymark_overlay::{PlacementMetrics, PreferredSide, place};

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let b = |i: usize| i32::from(data[i]);

    // Bounded dimensions keep the search dense around realistic layouts
    // while still covering degenerate zero and offscreen cases.
    let screen = Size::new(b(0) * 8 + 1, b(1) * 8 + 1);
    let target = Rect::new(b(2) * 8 - 512, b(3) * 8 - 512, b(4) * 4, b(5) * 4);
    let tooltip = Size::new(b(6) * 4 + 1, b(7) * 4 + 1);
    let preferred = if data[8] & 1 == 0 {
        PreferredSide::Below
    } else {
        PreferredSide::Above
    };

    let metrics = PlacementMetrics::default();
    let result = place(target, tooltip, screen, preferred, &metrics);

    // Never above the top edge.
    assert!(result.y >= 0, "y went negative: {}", result.y);

    // The above/below flag must agree with the final geometry.
    assert_eq!(
        result.above_target,
        result.y + tooltip.height < target.y,
        "flag disagrees with geometry"
    );

    // When the tooltip fits between the side margins it must respect them.
    let margin = metrics.horizontal_margin();
    if tooltip.width + margin * 2 <= screen.width {
        assert!(result.x >= margin, "x {} under left margin", result.x);
        assert!(
            result.x + tooltip.width + margin <= screen.width,
            "x {} over right margin",
            result.x
        );
    }
});
