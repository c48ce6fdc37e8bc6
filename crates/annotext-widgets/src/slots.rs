#![forbid(unsafe_code)]

//! The two overlay slots and their replacement rules.
//!
//! - Opening a popup destroys the previous popup and any tooltip.
//! - Hovering the annotation the tooltip already shows keeps it as is.
//! - Hovering another annotation drops the current tooltip first; a new one
//!   is only created when no popup is open and the annotation has something
//!   to show.

use annotext_core::{Annotation, AnnotationId};

use crate::overlay::{Popup, Tooltip};

/// Outcome of [`OverlaySlots::activate_tooltip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipActivation {
    /// A tooltip for the annotation now occupies the slot.
    Created,
    /// The slot already showed this annotation and was left untouched.
    Kept,
    /// No tooltip is shown: a popup is open or there is nothing to show.
    Suppressed,
}

/// Owned popup and tooltip state for one annotated text.
#[derive(Debug, Clone, Default)]
pub struct OverlaySlots {
    popup: Option<Popup>,
    tooltip: Option<Tooltip>,
}

impl OverlaySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut Popup> {
        self.popup.as_mut()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn tooltip_mut(&mut self) -> Option<&mut Tooltip> {
        self.tooltip.as_mut()
    }

    /// Annotation the open popup belongs to.
    pub fn popup_target(&self) -> Option<AnnotationId> {
        self.popup.as_ref().map(|p| p.annotation_id)
    }

    /// Show `popup`, destroying whatever popup and tooltip were open.
    /// Returns the replaced popup.
    pub fn open_popup(&mut self, popup: Popup) -> Option<Popup> {
        self.clear_tooltip();
        tracing::debug!(
            message = "overlay.popup.open",
            id = popup.annotation_id.get(),
            is_new = popup.is_new
        );
        self.popup.replace(popup)
    }

    pub fn close_popup(&mut self) -> Option<Popup> {
        let closed = self.popup.take();
        if let Some(popup) = &closed {
            tracing::debug!(message = "overlay.popup.close", id = popup.annotation_id.get());
        }
        closed
    }

    /// Hover over `annotation`'s span.
    pub fn activate_tooltip(&mut self, annotation: &Annotation, offset: f64) -> TooltipActivation {
        if self
            .tooltip
            .as_ref()
            .is_some_and(|t| t.annotation_id == annotation.id)
        {
            return TooltipActivation::Kept;
        }
        self.clear_tooltip();

        if self.popup.is_some() || !annotation.data.has_tooltip_content() {
            tracing::trace!(
                message = "overlay.tooltip.suppressed",
                id = annotation.id.get(),
                popup_open = self.popup.is_some()
            );
            return TooltipActivation::Suppressed;
        }

        tracing::debug!(message = "overlay.tooltip.open", id = annotation.id.get());
        self.tooltip = Some(Tooltip::new(annotation.id).with_offset(offset));
        TooltipActivation::Created
    }

    pub fn clear_tooltip(&mut self) -> Option<Tooltip> {
        let cleared = self.tooltip.take();
        if let Some(tooltip) = &cleared {
            tracing::trace!(message = "overlay.tooltip.close", id = tooltip.annotation_id.get());
        }
        cleared
    }

    /// Close both overlays.
    pub fn clear_all(&mut self) {
        self.close_popup();
        self.clear_tooltip();
    }

    pub fn is_empty(&self) -> bool {
        self.popup.is_none() && self.tooltip.is_none()
    }
}
