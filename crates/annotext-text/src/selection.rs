#![forbid(unsafe_code)]

//! The seam between a live text selection and the mapper.
//!
//! A host (browser bridge, terminal UI, test) describes the selection in the
//! terms its layout engine uses: which text run each boundary sits in, the
//! offset inside that run, and what surrounds the run. The mapper only ever
//! looks at the start boundary's surroundings, because a selection it accepts
//! never leaves its starting run.

use annotext_core::AnnotationId;
use serde::{Deserialize, Serialize};

/// Opaque identity of a rendered text run, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u64);

/// One end of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub container: ContainerId,
    /// Offset in chars from the start of the container's text.
    pub offset: usize,
}

impl Boundary {
    pub const fn new(container: ContainerId, offset: usize) -> Self {
        Self { container, offset }
    }
}

/// Start and end of a selection, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: Boundary,
    pub end: Boundary,
}

impl SelectionRange {
    /// Selection of `start..end` within a single container.
    pub const fn within(container: ContainerId, start: usize, end: usize) -> Self {
        Self {
            start: Boundary::new(container, start),
            end: Boundary::new(container, end),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_container(&self) -> bool {
        self.start.container == self.end.container
    }
}

/// The element directly enclosing a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EnclosingElement {
    /// Not an annotation span: the run belongs to the root text.
    Block,
    /// An annotation span. `annotation_id` is `None` when the span carries no
    /// readable id attribute.
    Span { annotation_id: Option<AnnotationId> },
}

impl EnclosingElement {
    /// Span whose id comes from a raw attribute value; missing or
    /// unparseable values leave the id unset.
    pub fn span_from_attribute(value: Option<&str>) -> Self {
        Self::Span {
            annotation_id: value.and_then(|v| v.parse().ok()),
        }
    }
}

/// The node rendered immediately before a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingElement {
    /// `None` when the sibling is not an annotation span or has no id.
    pub annotation_id: Option<AnnotationId>,
}

impl SiblingElement {
    pub const fn annotation(id: AnnotationId) -> Self {
        Self {
            annotation_id: Some(id),
        }
    }

    pub fn from_attribute(value: Option<&str>) -> Self {
        Self {
            annotation_id: value.and_then(|v| v.parse().ok()),
        }
    }
}

/// A live selection the mapper can read and clear.
pub trait Selection {
    /// The selected range, or `None` when nothing is selected.
    fn range(&self) -> Option<SelectionRange>;

    /// What encloses `container`.
    fn enclosing_element(&self, container: ContainerId) -> EnclosingElement;

    /// The node rendered immediately before `container`, if any.
    fn previous_sibling(&self, container: ContainerId) -> Option<SiblingElement>;

    /// Drop the selection. Called once a selection has been turned into an
    /// annotation.
    fn clear(&mut self);
}

/// A selection described up front, e.g. deserialized from a host bridge.
///
/// `enclosing` and `previous_sibling` describe the start container; they
/// are returned for whatever container is asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSelection {
    pub range: Option<SelectionRange>,
    pub enclosing: EnclosingElement,
    #[serde(default)]
    pub previous_sibling: Option<SiblingElement>,
}

impl StaticSelection {
    /// Nothing selected.
    pub const fn empty() -> Self {
        Self {
            range: None,
            enclosing: EnclosingElement::Block,
            previous_sibling: None,
        }
    }

    /// `start..end` inside one run of the root text with no preceding span.
    pub const fn within(container: ContainerId, start: usize, end: usize) -> Self {
        Self {
            range: Some(SelectionRange::within(container, start, end)),
            enclosing: EnclosingElement::Block,
            previous_sibling: None,
        }
    }

    #[must_use]
    pub fn inside_span(mut self, annotation_id: Option<AnnotationId>) -> Self {
        self.enclosing = EnclosingElement::Span { annotation_id };
        self
    }

    #[must_use]
    pub fn after(mut self, sibling: SiblingElement) -> Self {
        self.previous_sibling = Some(sibling);
        self
    }

    pub fn is_cleared(&self) -> bool {
        self.range.is_none()
    }
}

impl Selection for StaticSelection {
    fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    fn enclosing_element(&self, _container: ContainerId) -> EnclosingElement {
        self.enclosing
    }

    fn previous_sibling(&self, _container: ContainerId) -> Option<SiblingElement> {
        self.previous_sibling
    }

    fn clear(&mut self) {
        self.range = None;
    }
}
