#![forbid(unsafe_code)]

//! The annotation node.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::data::AnnotationData;
use crate::id::AnnotationId;

/// A tagged, indexed span of text, possibly containing nested annotations.
///
/// `start_index..end_index` is half-open and expressed in the container's
/// local coordinates: the root text for top-level nodes, the parent's
/// interval for children. Both indices are `None` until the node has been
/// placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default = "AnnotationId::next")]
    pub id: AnnotationId,
    #[serde(default)]
    pub start_index: Option<usize>,
    #[serde(default)]
    pub end_index: Option<usize>,
    /// Free-form tag, only used to name markup classes.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: AnnotationData,
    #[serde(default)]
    pub children: Vec<Annotation>,
}

/// Partial annotation used by [`Annotation::create`].
///
/// Every field left as `None` takes the default: unset indices, empty type,
/// `{points: 0}` data, no children. The id is never part of a draft; it is
/// always allocated at creation.
#[derive(Debug, Clone, Default)]
pub struct AnnotationDraft {
    pub start_index: Option<usize>,
    pub end_index: Option<usize>,
    pub kind: Option<String>,
    pub data: Option<AnnotationData>,
    pub children: Option<Vec<Annotation>>,
}

impl AnnotationDraft {
    /// Draft covering `range` in container-local coordinates.
    pub fn spanning(range: Range<usize>) -> Self {
        Self {
            start_index: Some(range.start),
            end_index: Some(range.end),
            ..Self::default()
        }
    }
}

impl Default for Annotation {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotation {
    /// Allocate a fresh id and fill every field with its default.
    pub fn new() -> Self {
        Self::create(AnnotationDraft::default())
    }

    /// Allocate a fresh id, apply defaults, then overlay the draft's fields.
    pub fn create(draft: AnnotationDraft) -> Self {
        let annotation = Self {
            id: AnnotationId::next(),
            start_index: draft.start_index,
            end_index: draft.end_index,
            kind: draft.kind.unwrap_or_default(),
            data: draft.data.unwrap_or_default(),
            children: draft.children.unwrap_or_default(),
        };
        tracing::trace!(
            message = "annotation.create",
            id = annotation.id.get(),
            start = ?annotation.start_index,
            end = ?annotation.end_index
        );
        annotation
    }

    #[must_use]
    pub fn with_range(mut self, range: Range<usize>) -> Self {
        self.start_index = Some(range.start);
        self.end_index = Some(range.end);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: AnnotationData) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Annotation>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// The local interval, if both indices are set.
    pub fn range(&self) -> Option<Range<usize>> {
        match (self.start_index, self.end_index) {
            (Some(start), Some(end)) => Some(start..end),
            _ => None,
        }
    }

    /// Length of the local interval; `0` when unset or inverted.
    pub fn len(&self) -> usize {
        self.range().map_or(0, |r| r.end.saturating_sub(r.start))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let a = Annotation::new();
        assert_eq!(a.start_index, None);
        assert_eq!(a.end_index, None);
        assert_eq!(a.kind, "");
        assert_eq!(a.data, AnnotationData::default());
        assert!(a.children.is_empty());
        assert!(a.range().is_none());
    }

    #[test]
    fn create_overlays_draft_fields() {
        let mut data = AnnotationData::default();
        data.set_comment("typo");
        let a = Annotation::create(AnnotationDraft {
            kind: Some("red".into()),
            data: Some(data.clone()),
            ..AnnotationDraft::spanning(2..6)
        });
        assert_eq!(a.range(), Some(2..6));
        assert_eq!(a.kind, "red");
        assert_eq!(a.data, data);
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn each_creation_gets_a_new_id() {
        let a = Annotation::new();
        let b = Annotation::new();
        assert_ne!(a.id, b.id);
        assert!(b.id > a.id);
    }

    #[test]
    fn inverted_range_has_zero_len() {
        let a = Annotation::new().with_range(5..2);
        assert_eq!(a.len(), 0);
        assert!(a.is_empty());
    }

    #[test]
    fn deserializes_host_payload() {
        let json = r#"{
            "id": 12,
            "startIndex": 0,
            "endIndex": 5,
            "type": "green",
            "data": {"points": 2, "comment": "good"},
            "children": [{"id": 13, "startIndex": 1, "endIndex": 3}]
        }"#;
        let a: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(a.id, AnnotationId::from_raw(12));
        assert_eq!(a.kind, "green");
        assert_eq!(a.data.comment(), Some("good"));
        assert_eq!(a.children[0].range(), Some(1..3));
        assert_eq!(a.children[0].data.points(), 0.0);
    }

    #[test]
    fn serializes_with_host_field_names() {
        let a = Annotation::new().with_range(1..4).with_kind("x");
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(value["startIndex"], 1);
        assert_eq!(value["endIndex"], 4);
        assert_eq!(value["type"], "x");
        assert_eq!(value["data"]["points"], 0);
    }
}
