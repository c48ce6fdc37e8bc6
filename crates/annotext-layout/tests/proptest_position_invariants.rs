//! Property-based invariant tests for overlay placement.
//!
//! 1. Determinism: identical requests give identical placements
//! 2. Docked overlays never cover the anchor on the docking axis
//! 3. The centered cross axis stays within the viewport clamp window
//! 4. Degenerate sizes always yield the origin placement
//! 5. Scrolling shifts the result by exactly the scroll offset

use annotext_layout::{
    AnchorRect, Axis, Edge, Placement, PositionPreferences, PositionRequest, ScrollOffset, Size,
    compute_position,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y)]
}

fn request_strategy() -> impl Strategy<Value = PositionRequest> {
    (
        (1u32..400, 1u32..300),
        (0u32..1200, 0u32..900, 1u32..300, 1u32..120),
        (200u32..1600, 200u32..1000),
        (0u32..2000, 0u32..2000),
        axis_strategy(),
        0u32..30,
    )
        .prop_map(|((tw, th), (ax, ay, aw, ah), (vw, vh), (sx, sy), axis, offset)| {
            PositionRequest {
                target: Size::new(f64::from(tw), f64::from(th)),
                anchor: AnchorRect::from_origin(
                    f64::from(ax),
                    f64::from(ay),
                    Size::new(f64::from(aw), f64::from(ah)),
                ),
                viewport: Size::new(f64::from(vw), f64::from(vh)),
                scroll: ScrollOffset::new(f64::from(sx), f64::from(sy)),
                preferences: PositionPreferences::new(axis, f64::from(offset)),
            }
        })
}

fn coord(placement: &Placement, axis: Axis) -> i64 {
    match axis {
        Axis::X => placement.left,
        Axis::Y => placement.top,
    }
}

// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn positioning_is_deterministic(req in request_strategy()) {
        prop_assert_eq!(compute_position(&req), compute_position(&req));
    }

    #[test]
    fn docked_overlay_clears_the_anchor(req in request_strategy()) {
        let placement = compute_position(&req);
        let Some(edge) = placement.edge else {
            return Ok(());
        };
        let axis = edge.axis();
        let scroll = req.scroll.along(axis);
        let gap = req.preferences.offset;
        let pos = coord(&placement, axis) as f64;
        let size = req.target.extent(axis);
        match edge {
            Edge::Left | Edge::Top => {
                prop_assert!(pos + size <= scroll + req.anchor.start(axis) - gap + 0.5);
                prop_assert!(pos >= scroll - 0.5);
            }
            Edge::Right | Edge::Bottom => {
                prop_assert!(pos >= scroll + req.anchor.end(axis) + gap - 0.5);
                prop_assert!(pos + size <= scroll + req.viewport.extent(axis) + 0.5);
            }
        }
    }

    #[test]
    fn centered_cross_axis_stays_in_window(req in request_strategy()) {
        let placement = compute_position(&req);
        let Some(edge) = placement.edge else {
            return Ok(());
        };
        let cross = edge.axis().cross();
        let scroll = req.scroll.along(cross);
        let gap = req.preferences.offset;
        let lower = scroll + gap;
        let upper = scroll + req.viewport.extent(cross) - req.target.extent(cross) - gap;
        let pos = coord(&placement, cross) as f64;
        if lower <= upper {
            prop_assert!(pos >= lower.floor() && pos <= upper.ceil());
        } else {
            prop_assert_eq!(pos, (lower + 0.5).floor());
        }
    }

    #[test]
    fn degenerate_target_yields_origin(req in request_strategy(), zero_width in any::<bool>()) {
        let mut req = req;
        if zero_width {
            req.target.width = 0.0;
        } else {
            req.target.height = 0.0;
        }
        prop_assert_eq!(compute_position(&req), Placement::ORIGIN);
    }

    #[test]
    fn scroll_translates_result(req in request_strategy(), dx in 0u32..500, dy in 0u32..500) {
        let base = compute_position(&req);
        let mut shifted = req;
        shifted.scroll.left += f64::from(dx);
        shifted.scroll.top += f64::from(dy);
        let moved = compute_position(&shifted);
        prop_assert_eq!(moved.edge, base.edge);
        prop_assert_eq!(moved.left - base.left, i64::from(dx));
        prop_assert_eq!(moved.top - base.top, i64::from(dy));
    }
}
