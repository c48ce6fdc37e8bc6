#![forbid(unsafe_code)]

//! The annotation session a host drives from its event loop.
//!
//! [`AnnotateText`] owns the text, the forest, the overlay slots and a queue
//! of [`AnnotateEvent`]s. The host renders [`AnnotateText::markup`], forwards
//! mouse events with whatever it knows about the selection and the span under
//! the pointer, positions overlays once their size is known, and drains the
//! event queue.

use annotext_core::{Annotation, AnnotationData, AnnotationId, store};
use annotext_layout::{AnchorRect, Placement, ScrollOffset, Size};
use annotext_text::{FragmentTree, Selection, SelectionError, map_selection, render_markup_with};
use annotext_widgets::{OverlaySlots, Popup, TooltipActivation};

use crate::config::AnnotateConfig;
use crate::error::Result;

/// What the host should hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotateEvent {
    /// A popup was closed with its annotation kept.
    Annotated(Annotation),
    /// An annotation and its descendants were removed.
    Deleted(Annotation),
    /// A selection could not become an annotation.
    Error(SelectionError),
}

/// Result of [`AnnotateText::handle_mouse_up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseUpOutcome {
    /// The selection became this annotation; its popup is open.
    Created(AnnotationId),
    /// The selection was rejected; an [`AnnotateEvent::Error`] is queued.
    Rejected(SelectionError),
    PopupOpened(AnnotationId),
    PopupClosed(AnnotationId),
    /// Click outside any annotation; both overlays are gone.
    Cleared,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct AnnotateText {
    text: String,
    char_len: usize,
    annotations: Vec<Annotation>,
    config: AnnotateConfig,
    overlays: OverlaySlots,
    events: Vec<AnnotateEvent>,
}

impl AnnotateText {
    /// Start a session. Fails on an invalid config or a forest that breaks
    /// the nesting rules for `text`.
    pub fn new(
        text: impl Into<String>,
        annotations: Vec<Annotation>,
        config: AnnotateConfig,
    ) -> Result<Self> {
        config.check()?;
        let text = text.into();
        let char_len = text.chars().count();
        store::validate(&annotations, char_len)?;
        store::reserve_ids(&annotations);
        tracing::debug!(
            message = "session.new",
            chars = char_len,
            roots = annotations.len(),
            readonly = config.readonly
        );
        Ok(Self {
            text,
            char_len,
            annotations,
            config,
            overlays: OverlaySlots::new(),
            events: Vec::new(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn into_annotations(self) -> Vec<Annotation> {
        self.annotations
    }

    pub fn config(&self) -> &AnnotateConfig {
        &self.config
    }

    pub fn overlays(&self) -> &OverlaySlots {
        &self.overlays
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        store::find_by_id(&self.annotations, id)
    }

    /// Data of one annotation, for popup edits.
    pub fn data_mut(&mut self, id: AnnotationId) -> Option<&mut AnnotationData> {
        store::find_by_id_mut(&mut self.annotations, id).map(|a| &mut a.data)
    }

    /// Replace the text. The current forest must still fit it.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let char_len = text.chars().count();
        store::validate(&self.annotations, char_len)?;
        self.text = text;
        self.char_len = char_len;
        Ok(())
    }

    /// Replace the forest, closing any overlay that pointed into the old one.
    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) -> Result<()> {
        store::validate(&annotations, self.char_len)?;
        store::reserve_ids(&annotations);
        self.annotations = annotations;
        self.overlays.clear_all();
        Ok(())
    }

    /// Current markup; empty text renders to an empty string.
    pub fn markup(&self) -> String {
        if self.text.is_empty() {
            return String::new();
        }
        render_markup_with(&self.text, &self.annotations, &self.config.markup)
    }

    /// The text runs the current markup splits into.
    pub fn fragments(&self) -> FragmentTree {
        FragmentTree::build(&self.text, &self.annotations)
    }

    /// Mouse released over the text.
    ///
    /// `target` is the annotation whose span is directly under the pointer,
    /// if any.
    pub fn handle_mouse_up<S>(&mut self, selection: &mut S, target: Option<AnnotationId>) -> MouseUpOutcome
    where
        S: Selection + ?Sized,
    {
        let collapsed = selection.range().is_none_or(|r| r.is_collapsed());
        let outcome = match (collapsed, target) {
            (false, _) if self.config.readonly || !self.config.popups => MouseUpOutcome::Ignored,
            (false, _) => self.create_from_selection(selection),
            (true, Some(id)) if self.config.popups => self.toggle_popup(id),
            (true, Some(_)) => MouseUpOutcome::Ignored,
            (true, None) => {
                self.overlays.clear_all();
                MouseUpOutcome::Cleared
            }
        };
        tracing::debug!(message = "session.mouse_up", outcome = ?outcome);
        outcome
    }

    fn create_from_selection<S>(&mut self, selection: &mut S) -> MouseUpOutcome
    where
        S: Selection + ?Sized,
    {
        match map_selection(selection, &mut self.annotations) {
            Ok(annotation) => {
                let id = annotation.id;
                let popup = Popup::new(id, true, self.config.readonly).with_offset(self.config.offset);
                self.overlays.clear_all();
                self.overlays.open_popup(popup);
                MouseUpOutcome::Created(id)
            }
            Err(err) => {
                self.events.push(AnnotateEvent::Error(err));
                MouseUpOutcome::Rejected(err)
            }
        }
    }

    fn toggle_popup(&mut self, id: AnnotationId) -> MouseUpOutcome {
        if self.overlays.popup_target() == Some(id) {
            self.overlays.close_popup();
            return MouseUpOutcome::PopupClosed(id);
        }
        if self.annotation(id).is_none() {
            return MouseUpOutcome::Ignored;
        }
        let popup = Popup::new(id, false, self.config.readonly).with_offset(self.config.offset);
        self.overlays.clear_all();
        self.overlays.open_popup(popup);
        MouseUpOutcome::PopupOpened(id)
    }

    /// Pointer entered the span of `id`.
    pub fn handle_mouse_enter(&mut self, id: AnnotationId) -> TooltipActivation {
        if !self.config.tooltips {
            return TooltipActivation::Suppressed;
        }
        match store::find_by_id(&self.annotations, id) {
            Some(annotation) => self.overlays.activate_tooltip(annotation, self.config.offset),
            None => {
                self.overlays.clear_tooltip();
                TooltipActivation::Suppressed
            }
        }
    }

    /// Pointer left an annotation span.
    pub fn handle_mouse_leave(&mut self) {
        self.overlays.clear_tooltip();
    }

    /// Close the popup keeping its annotation, and queue
    /// [`AnnotateEvent::Annotated`].
    pub fn close_popup(&mut self) -> Option<AnnotationId> {
        let popup = self.overlays.close_popup()?;
        let id = popup.annotation_id;
        if let Some(annotation) = store::find_by_id(&self.annotations, id) {
            self.events.push(AnnotateEvent::Annotated(annotation.clone()));
        }
        Some(id)
    }

    /// Delete the popup's annotation with its descendants, close the popup,
    /// and queue [`AnnotateEvent::Deleted`]. Readonly popups cannot delete.
    pub fn reject_popup(&mut self) -> Option<Annotation> {
        let popup = self.overlays.popup()?;
        if !popup.can_delete() {
            return None;
        }
        let id = popup.annotation_id;
        self.overlays.close_popup();
        let removed = store::delete(&mut self.annotations, id)?;
        self.events.push(AnnotateEvent::Deleted(removed.clone()));
        Some(removed)
    }

    /// Place the open popup next to its span.
    pub fn position_popup(
        &mut self,
        target: Size,
        anchor: AnchorRect,
        viewport: Size,
        scroll: ScrollOffset,
    ) -> Option<Placement> {
        let popup = self.overlays.popup_mut()?;
        Some(popup.reposition(target, anchor, viewport, scroll))
    }

    /// Place the shown tooltip next to its span.
    pub fn position_tooltip(
        &mut self,
        target: Size,
        anchor: AnchorRect,
        viewport: Size,
        scroll: ScrollOffset,
    ) -> Option<Placement> {
        let tooltip = self.overlays.tooltip_mut()?;
        Some(tooltip.reposition(target, anchor, viewport, scroll))
    }

    /// Docked-edge class for the open popup, using the markup class prefix.
    pub fn popup_class(&self) -> Option<String> {
        self.overlays.popup()?.docked_class(&self.config.markup.class_prefix)
    }

    pub fn tooltip_class(&self) -> Option<String> {
        self.overlays.tooltip()?.docked_class(&self.config.markup.class_prefix)
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<AnnotateEvent> {
        std::mem::take(&mut self.events)
    }
}
