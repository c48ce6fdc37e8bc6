#![forbid(unsafe_code)]

//! Anchored overlay placement.
//!
//! [`compute_position`] docks a floating box (popup, tooltip) beside an
//! anchor without leaving the viewport:
//!
//! 1. On each axis, try *before* the anchor (left/top), then *after* it
//!    (right/bottom). A side is usable when the gap plus the target's extent
//!    fits between the anchor and the viewport edge.
//! 2. Keep the preferred axis if it docked, otherwise the other axis.
//! 3. Center the remaining axis on the anchor's midpoint, clamped so the box
//!    stays `offset` away from both viewport edges. If neither axis docked,
//!    center on the viewport instead and report no edge.
//!
//! Coordinates are page coordinates: the scroll offset is added to every
//! viewport-relative result.

use serde::{Deserialize, Serialize};

use crate::geometry::{AnchorRect, Axis, Edge, ScrollOffset, Size};

/// Default gap between the anchor and the overlay, in pixels.
pub const DEFAULT_OFFSET: f64 = 10.0;

/// Caller preferences for placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionPreferences {
    /// Axis tried first.
    pub preferred_axis: Axis,
    /// Gap kept between anchor and overlay, and between overlay and viewport
    /// edges when clamping.
    pub offset: f64,
}

impl Default for PositionPreferences {
    fn default() -> Self {
        Self {
            preferred_axis: Axis::X,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl PositionPreferences {
    pub const fn new(preferred_axis: Axis, offset: f64) -> Self {
        Self {
            preferred_axis,
            offset,
        }
    }
}

/// Everything the positioner looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRequest {
    /// Rendered size of the overlay being placed.
    pub target: Size,
    /// Anchor bounding box, viewport-relative.
    pub anchor: AnchorRect,
    pub viewport: Size,
    pub scroll: ScrollOffset,
    pub preferences: PositionPreferences,
}

/// Final overlay position in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub left: i64,
    pub top: i64,
    /// Anchor side the overlay docked against; `None` when it was centered
    /// on the viewport or positioning was skipped.
    pub edge: Option<Edge>,
}

impl Placement {
    /// Result for degenerate input: top-left corner, no edge.
    pub const ORIGIN: Self = Self {
        left: 0,
        top: 0,
        edge: None,
    };
}

/// A successful dock on one axis.
#[derive(Debug, Clone, Copy)]
struct Docked {
    axis: Axis,
    pos: f64,
    edge: Edge,
}

/// Place an overlay next to its anchor. Never fails; see the module docs.
pub fn compute_position(request: &PositionRequest) -> Placement {
    let prefs = request.preferences;
    let _span = tracing::debug_span!(
        "overlay_position",
        axis = ?prefs.preferred_axis,
        offset = prefs.offset
    )
    .entered();

    if request.target.is_degenerate() || request.anchor.size().is_degenerate() {
        tracing::trace!(message = "overlay.position.skipped", target = ?request.target);
        return Placement::ORIGIN;
    }

    let primary = prefs.preferred_axis;
    let docked = dock_on_axis(request, primary).or_else(|| dock_on_axis(request, primary.cross()));

    let (left, top, edge) = match docked {
        Some(docked) => {
            let cross = center_on_anchor(request, docked.axis.cross());
            match docked.axis {
                Axis::X => (docked.pos, cross, Some(docked.edge)),
                Axis::Y => (cross, docked.pos, Some(docked.edge)),
            }
        }
        None => (
            center_in_viewport(request, Axis::X),
            center_in_viewport(request, Axis::Y),
            None,
        ),
    };

    let placement = Placement {
        left: round_coord(left),
        top: round_coord(top),
        edge,
    };
    tracing::debug!(
        message = "overlay.position",
        left = placement.left,
        top = placement.top,
        edge = placement.edge.map_or("none", Edge::as_str)
    );
    placement
}

/// Try docking before the anchor, then after it.
fn dock_on_axis(request: &PositionRequest, axis: Axis) -> Option<Docked> {
    let offset = request.preferences.offset;
    let size = request.target.extent(axis);
    let scroll = request.scroll.along(axis);
    let start = request.anchor.start(axis);
    let end = request.anchor.end(axis);

    if start - offset >= size {
        return Some(Docked {
            axis,
            pos: scroll + start - offset - size,
            edge: axis.leading_edge(),
        });
    }
    if request.viewport.extent(axis) - end - offset >= size {
        return Some(Docked {
            axis,
            pos: scroll + end + offset,
            edge: axis.trailing_edge(),
        });
    }
    None
}

/// Center on the anchor midpoint, clamped to
/// `[scroll + offset, scroll + viewport - size - offset]`.
///
/// When the viewport is too small for both bounds the lower one wins.
fn center_on_anchor(request: &PositionRequest, axis: Axis) -> f64 {
    let offset = request.preferences.offset;
    let size = request.target.extent(axis);
    let scroll = request.scroll.along(axis);
    let anchor_extent = request.anchor.size().extent(axis);

    let centered = scroll + request.anchor.start(axis) + anchor_extent / 2.0 - size / 2.0;
    let upper = scroll + request.viewport.extent(axis) - size - offset;
    let lower = scroll + offset;
    clamp_low_wins(centered, lower, upper)
}

fn center_in_viewport(request: &PositionRequest, axis: Axis) -> f64 {
    request.scroll.along(axis) + request.viewport.extent(axis) / 2.0
        - request.target.extent(axis) / 2.0
}

/// `max(lower, min(value, upper))`, propagating NaN instead of hiding it.
fn clamp_low_wins(value: f64, lower: f64, upper: f64) -> f64 {
    if value.is_nan() || lower.is_nan() || upper.is_nan() {
        return f64::NAN;
    }
    value.min(upper).max(lower)
}

/// Round half up; anything non-finite becomes `0`.
fn round_coord(value: f64) -> i64 {
    if value.is_finite() {
        (value + 0.5).floor() as i64
    } else {
        0
    }
}
