#![forbid(unsafe_code)]

//! Turning a selection inside rendered markup into a new annotation.
//!
//! Rendering splits text into separate runs around every span, and a host
//! reports selection offsets relative to the run they fall in. A run that
//! follows a span starts exactly where that span ends (in the shared
//! container coordinates), so the mapper shifts the run-local offsets by the
//! preceding sibling's `end_index`. A run with no preceding sibling starts at
//! `0` and needs no shift.
//!
//! Every structural surprise is a distinct [`SelectionError`]; nothing is
//! guessed and nothing is retried.

use annotext_core::store::{find_by_id, find_by_id_mut};
use annotext_core::{Annotation, AnnotationDraft, AnnotationId};
use thiserror::Error;

use crate::selection::{EnclosingElement, Selection, SiblingElement};

/// Why a selection could not become an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no text selected")]
    NoTextSelected,

    #[error("selection starts and ends in different text runs")]
    PartialNodeSelected,

    #[error("selection touches an element that carries no annotation id")]
    IllegalSelection,

    #[error("parent annotation {id} not found")]
    ParentNotFound { id: AnnotationId },

    #[error("sibling annotation {id} not found")]
    SiblingNotFound { id: AnnotationId },
}

impl SelectionError {
    /// Stable code for host error channels.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoTextSelected => "NO_TEXT_SELECTED",
            Self::PartialNodeSelected => "PARTIAL_NODE_SELECTED",
            Self::IllegalSelection => "ILLEGAL_SELECTION",
            Self::ParentNotFound { .. } => "PARENT_NOT_FOUND",
            Self::SiblingNotFound { .. } => "SIBLING_NOT_FOUND",
        }
    }
}

/// Create an annotation from the current selection and append it to the
/// forest.
///
/// The new node goes into the children of the annotation whose span encloses
/// the selected run, or into the top level when the run is not inside a span.
/// On success the selection is cleared and the inserted node is returned; on
/// failure neither the forest nor the selection is touched.
pub fn map_selection<'f, S>(
    selection: &mut S,
    forest: &'f mut Vec<Annotation>,
) -> Result<&'f Annotation, SelectionError>
where
    S: Selection + ?Sized,
{
    let _span = tracing::debug_span!("selection_map").entered();

    let result = resolve(selection, forest);
    let (parent, range) = match result {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::debug!(message = "selection.rejected", code = err.code());
            return Err(err);
        }
    };

    let annotation = Annotation::create(AnnotationDraft::spanning(range));
    let collection: &'f mut Vec<Annotation> = match parent {
        Some(id) => match find_by_id_mut(forest, id) {
            Some(node) => &mut node.children,
            None => return Err(SelectionError::ParentNotFound { id }),
        },
        None => forest,
    };

    tracing::debug!(
        message = "selection.mapped",
        id = annotation.id.get(),
        parent = parent.map(AnnotationId::get),
        start = annotation.start_index,
        end = annotation.end_index
    );

    let index = collection.len();
    collection.push(annotation);
    selection.clear();

    let collection: &'f Vec<Annotation> = collection;
    Ok(&collection[index])
}

/// Validate the selection and work out where the new node goes.
fn resolve<S>(
    selection: &S,
    forest: &[Annotation],
) -> Result<(Option<AnnotationId>, std::ops::Range<usize>), SelectionError>
where
    S: Selection + ?Sized,
{
    let range = match selection.range() {
        Some(range) if !range.is_collapsed() => range,
        _ => return Err(SelectionError::NoTextSelected),
    };
    if !range.is_single_container() {
        return Err(SelectionError::PartialNodeSelected);
    }
    let container = range.start.container;

    let (parent, siblings) = match selection.enclosing_element(container) {
        EnclosingElement::Block => (None, forest),
        EnclosingElement::Span {
            annotation_id: None,
        } => return Err(SelectionError::IllegalSelection),
        EnclosingElement::Span {
            annotation_id: Some(id),
        } => {
            let parent = find_by_id(forest, id).ok_or(SelectionError::ParentNotFound { id })?;
            (Some(id), parent.children.as_slice())
        }
    };

    let base = if siblings.is_empty() {
        0
    } else {
        match selection.previous_sibling(container) {
            None => 0,
            Some(SiblingElement {
                annotation_id: None,
            }) => return Err(SelectionError::IllegalSelection),
            Some(SiblingElement {
                annotation_id: Some(id),
            }) => find_by_id(forest, id)
                .and_then(|sibling| sibling.end_index)
                .ok_or(SelectionError::SiblingNotFound { id })?,
        }
    };

    let (low, high) = if range.start.offset <= range.end.offset {
        (range.start.offset, range.end.offset)
    } else {
        (range.end.offset, range.start.offset)
    };
    Ok((parent, base + low..base + high))
}
