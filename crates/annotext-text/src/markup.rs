#![forbid(unsafe_code)]

//! Span markup for annotated text.
//!
//! # Algorithm
//!
//! Per sibling group, annotations are stably sorted by end index and visited
//! from the largest end down. For each one:
//!
//! 1. insert the closing marker at `end + offset`
//! 2. render its children with `offset + start` as their base
//! 3. insert the opening marker at `start + offset`
//!
//! Every insertion lands at or after every position not yet visited, so the
//! remaining indices stay valid without any bookkeeping. Children keep
//! parent-relative indices; the accumulated `offset` is the only place
//! absolute positions exist.
//!
//! Indices count chars (Unicode scalar values). Positions past the end of
//! the text are clamped to its original length before insertion. Input is
//! otherwise trusted: overlapping siblings produce malformed markup, not an
//! error.

use annotext_core::Annotation;
use serde::{Deserialize, Serialize};

/// Marker closing every annotation span.
pub const CLOSING_MARKER: &str = "</span>";

/// Naming used in the emitted span markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Prefix of every class name on the span.
    pub class_prefix: String,
    /// Attribute carrying the annotation id.
    pub id_attribute: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            class_prefix: "annotate-text".to_string(),
            id_attribute: "data-annotation-id".to_string(),
        }
    }
}

impl MarkupConfig {
    /// Opening marker for an annotation:
    /// `<span class="{p}-annotation {p}-{id} {p}-type-{type}" {attr}="{id}">`.
    pub fn opening_marker(&self, annotation: &Annotation) -> String {
        let prefix = &self.class_prefix;
        let id = annotation.id;
        format!(
            "<span class=\"{prefix}-annotation {prefix}-{id} {prefix}-type-{kind}\" {attr}=\"{id}\">",
            kind = class_token(&annotation.kind),
            attr = self.id_attribute,
        )
    }
}

/// Render with the default [`MarkupConfig`].
pub fn render_markup(text: &str, forest: &[Annotation]) -> String {
    render_markup_with(text, forest, &MarkupConfig::default())
}

/// Embed span markers for every annotation in `forest` into `text`.
///
/// An empty forest returns the text unchanged. Annotations whose indices are
/// unset are skipped together with their children. Indices past the end of
/// the text are clamped to it.
pub fn render_markup_with(text: &str, forest: &[Annotation], config: &MarkupConfig) -> String {
    let _span = tracing::debug_span!("markup_render", roots = forest.len()).entered();

    let mut out = text.to_string();
    for insertion in plan(forest, text.chars().count(), config) {
        insert_at(&mut out, insertion.at, &insertion.marker);
    }
    out
}

/// One marker insertion, as a char index into the text mutated so far.
struct Insertion {
    at: usize,
    marker: String,
}

/// Every marker insertion the renderer performs, in order.
fn plan(forest: &[Annotation], text_len: usize, config: &MarkupConfig) -> Vec<Insertion> {
    let mut out = Vec::new();
    plan_level(&mut out, forest, 0, text_len, config);
    out
}

fn plan_level(
    out: &mut Vec<Insertion>,
    level: &[Annotation],
    index_offset: usize,
    text_len: usize,
    config: &MarkupConfig,
) {
    let mut placed: Vec<(&Annotation, usize, usize)> = Vec::with_capacity(level.len());
    for annotation in level {
        match (annotation.start_index, annotation.end_index) {
            (Some(start), Some(end)) => placed.push((annotation, start, end)),
            _ => tracing::trace!(message = "markup.skip_unplaced", id = annotation.id.get()),
        }
    }
    placed.sort_by_key(|&(_, _, end)| end);

    for &(annotation, start, end) in placed.iter().rev() {
        out.push(Insertion {
            at: end.saturating_add(index_offset).min(text_len),
            marker: CLOSING_MARKER.to_string(),
        });
        if annotation.has_children() {
            let child_offset = start.saturating_add(index_offset);
            plan_level(out, &annotation.children, child_offset, text_len, config);
        }
        out.push(Insertion {
            at: start.saturating_add(index_offset).min(text_len),
            marker: config.opening_marker(annotation),
        });
    }
}

/// Insert `marker` before the char at `char_index`, or at the end if the
/// index is past it.
fn insert_at(text: &mut String, char_index: usize, marker: &str) {
    text.insert_str(byte_offset(text, char_index), marker);
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Reduce an annotation type to something safe inside a class attribute.
fn class_token(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Undo [`render_markup_with`] for the same `forest` and `config`.
///
/// Only the markers the renderer inserted are removed, in reverse order of
/// insertion; marker-like text that was already in the input stays. Returns
/// `None` when `markup` does not carry this forest's markers where the
/// renderer would have put them.
pub fn strip_markup(markup: &str, forest: &[Annotation], config: &MarkupConfig) -> Option<String> {
    let marker_chars: usize = plan(forest, usize::MAX, config)
        .iter()
        .map(|insertion| insertion.marker.chars().count())
        .sum();
    let text_len = markup.chars().count().checked_sub(marker_chars)?;

    let mut out = markup.to_string();
    for insertion in plan(forest, text_len, config).iter().rev() {
        let start = byte_offset(&out, insertion.at);
        let end = start + insertion.marker.len();
        if out.get(start..end) != Some(insertion.marker.as_str()) {
            tracing::debug!(message = "markup.strip_mismatch", at = insertion.at);
            return None;
        }
        out.replace_range(start..end, "");
    }
    Some(out)
}
