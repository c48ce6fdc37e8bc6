#![forbid(unsafe_code)]

//! Popup and tooltip state.
//!
//! Both are positioned with [`compute_position`]; the popup prefers to sit
//! beside its span (x axis), the tooltip above or below it (y axis). The
//! placement is recomputed whenever the host knows the overlay's rendered
//! size, and again after a viewport resize.

use annotext_core::AnnotationId;
use annotext_layout::position::DEFAULT_OFFSET;
use annotext_layout::{
    AnchorRect, Axis, Edge, Placement, PositionPreferences, PositionRequest, ScrollOffset, Size,
    compute_position,
};
use serde::{Deserialize, Serialize};

fn place(
    axis: Axis,
    offset: f64,
    target: Size,
    anchor: AnchorRect,
    viewport: Size,
    scroll: ScrollOffset,
) -> Placement {
    compute_position(&PositionRequest {
        target,
        anchor,
        viewport,
        scroll,
        preferences: PositionPreferences::new(axis, offset),
    })
}

fn docked_class(prefix: &str, kind: &str, placement: Option<Placement>) -> Option<String> {
    let edge = placement?.edge?;
    Some(format!("{prefix}-{kind}-docked-{edge}"))
}

/// The editing popup for one annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub annotation_id: AnnotationId,
    /// Opened for an annotation created by the current selection.
    pub is_new: bool,
    pub readonly: bool,
    /// Gap to the anchor and to the viewport edges.
    pub offset: f64,
    #[serde(default)]
    placement: Option<Placement>,
}

impl Popup {
    /// Axis tried first when positioning.
    pub const PREFERRED_AXIS: Axis = Axis::X;

    pub fn new(annotation_id: AnnotationId, is_new: bool, readonly: bool) -> Self {
        Self {
            annotation_id,
            is_new,
            readonly,
            offset: DEFAULT_OFFSET,
            placement: None,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Position against `anchor` and remember the result.
    pub fn reposition(
        &mut self,
        target: Size,
        anchor: AnchorRect,
        viewport: Size,
        scroll: ScrollOffset,
    ) -> Placement {
        let placement = place(Self::PREFERRED_AXIS, self.offset, target, anchor, viewport, scroll);
        tracing::trace!(
            message = "popup.reposition",
            id = self.annotation_id.get(),
            left = placement.left,
            top = placement.top,
            edge = placement.edge.map(Edge::as_str)
        );
        self.placement = Some(placement);
        placement
    }

    /// Last computed placement; `None` until positioned.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn edge(&self) -> Option<Edge> {
        self.placement.and_then(|p| p.edge)
    }

    /// `{prefix}-popup-docked-{edge}`, or `None` when not docked.
    pub fn docked_class(&self, prefix: &str) -> Option<String> {
        docked_class(prefix, "popup", self.placement)
    }

    pub fn title(&self) -> &'static str {
        if self.is_new {
            "New Annotation"
        } else {
            "Edit Annotation"
        }
    }

    /// Label of the button that keeps the edit; readonly popups have none.
    pub fn confirm_label(&self) -> Option<&'static str> {
        match (self.readonly, self.is_new) {
            (true, _) => None,
            (false, true) => Some("Create"),
            (false, false) => Some("Update"),
        }
    }

    pub fn dismiss_label(&self) -> &'static str {
        if self.readonly { "Close" } else { "Cancel" }
    }

    /// Whether the popup offers deleting its annotation.
    pub fn can_delete(&self) -> bool {
        !self.readonly
    }
}

/// The read-only hover tooltip for one annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub annotation_id: AnnotationId,
    pub offset: f64,
    #[serde(default)]
    placement: Option<Placement>,
}

impl Tooltip {
    pub const PREFERRED_AXIS: Axis = Axis::Y;

    pub fn new(annotation_id: AnnotationId) -> Self {
        Self {
            annotation_id,
            offset: DEFAULT_OFFSET,
            placement: None,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn reposition(
        &mut self,
        target: Size,
        anchor: AnchorRect,
        viewport: Size,
        scroll: ScrollOffset,
    ) -> Placement {
        let placement = place(Self::PREFERRED_AXIS, self.offset, target, anchor, viewport, scroll);
        tracing::trace!(
            message = "tooltip.reposition",
            id = self.annotation_id.get(),
            left = placement.left,
            top = placement.top,
            edge = placement.edge.map(Edge::as_str)
        );
        self.placement = Some(placement);
        placement
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn edge(&self) -> Option<Edge> {
        self.placement.and_then(|p| p.edge)
    }

    /// `{prefix}-tooltip-docked-{edge}`, or `None` when not docked.
    pub fn docked_class(&self, prefix: &str) -> Option<String> {
        docked_class(prefix, "tooltip", self.placement)
    }
}
