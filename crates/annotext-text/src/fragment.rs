#![forbid(unsafe_code)]

//! The run structure a layout engine builds from rendered markup.
//!
//! Parsing the output of [`render_markup`](crate::markup::render_markup)
//! yields a tree of span elements and text runs: one span per annotation,
//! text runs for whatever lies between spans, and no empty runs.
//! [`FragmentTree`] builds that tree straight from the forest, so a host
//! without a DOM (a terminal UI, a test) can turn absolute char offsets into
//! the run-local [`Selection`] the mapper expects.

use std::ops::Range;

use annotext_core::{Annotation, AnnotationId};

use crate::selection::{
    Boundary, ContainerId, EnclosingElement, Selection, SelectionRange, SiblingElement,
};

const ROOT: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FragmentKind {
    Root,
    Span { annotation_id: AnnotationId },
    /// Absolute char range of the run.
    Text { chars: Range<usize> },
}

#[derive(Debug, Clone)]
struct Fragment {
    kind: FragmentKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Span/text-run tree for one `(text, forest)` pair.
#[derive(Debug, Clone)]
pub struct FragmentTree {
    text: String,
    char_len: usize,
    nodes: Vec<Fragment>,
}

impl FragmentTree {
    /// Build the tree the rendered markup would produce.
    ///
    /// Nodes with unset indices are left out, as the renderer leaves them out.
    /// Indices past the end of their container are clamped to it.
    pub fn build(text: &str, forest: &[Annotation]) -> Self {
        let char_len = text.chars().count();
        let mut tree = Self {
            text: text.to_string(),
            char_len,
            nodes: vec![Fragment {
                kind: FragmentKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        };
        tree.build_level(ROOT, forest, 0..char_len);
        tracing::trace!(message = "fragment.build", nodes = tree.nodes.len(), chars = char_len);
        tree
    }

    fn build_level(&mut self, parent: usize, level: &[Annotation], extent: Range<usize>) {
        let mut placed: Vec<(&Annotation, Range<usize>)> = level
            .iter()
            .filter_map(|a| a.range().map(|r| (a, r)))
            .collect();
        placed.sort_by_key(|(_, r)| r.start);

        let mut cursor = extent.start;
        for (annotation, local) in placed {
            let start = (extent.start + local.start).min(extent.end);
            let end = (extent.start + local.end).clamp(start, extent.end);
            if start > cursor {
                self.push(parent, FragmentKind::Text { chars: cursor..start });
            }
            let span = self.push(
                parent,
                FragmentKind::Span {
                    annotation_id: annotation.id,
                },
            );
            self.build_level(span, &annotation.children, start..end);
            cursor = cursor.max(end);
        }
        if cursor < extent.end {
            self.push(parent, FragmentKind::Text { chars: cursor..extent.end });
        }
    }

    fn push(&mut self, parent: usize, kind: FragmentKind) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Fragment {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    /// Number of chars in the underlying text.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Text runs in document order, with their absolute char ranges.
    pub fn text_runs(&self) -> impl Iterator<Item = (ContainerId, Range<usize>)> + '_ {
        let mut order = Vec::new();
        self.collect_runs(ROOT, &mut order);
        order.into_iter()
    }

    fn collect_runs(&self, node: usize, out: &mut Vec<(ContainerId, Range<usize>)>) {
        for &child in &self.nodes[node].children {
            match &self.nodes[child].kind {
                FragmentKind::Text { chars } => out.push((container(child), chars.clone())),
                _ => self.collect_runs(child, out),
            }
        }
    }

    /// The text of a run, or `None` if `id` is not a text run of this tree.
    pub fn text_of(&self, id: ContainerId) -> Option<&str> {
        match &self.node(id)?.kind {
            FragmentKind::Text { chars } => Some(self.slice_chars(chars.clone())),
            _ => None,
        }
    }

    /// The span element rendered for an annotation.
    pub fn span_of(&self, annotation: AnnotationId) -> Option<ContainerId> {
        self.nodes
            .iter()
            .position(|n| n.kind == FragmentKind::Span { annotation_id: annotation })
            .map(container)
    }

    /// Select the absolute char range `start..end`.
    ///
    /// Each boundary resolves to the run holding it. `start == end`, or a
    /// start at or past the end of the text, gives an empty selection.
    pub fn select(&self, start: usize, end: usize) -> FragmentSelection<'_> {
        let end = end.min(self.char_len);
        let range = if start < end {
            match (self.run_starting_at(start), self.run_ending_at(end)) {
                (Some(first), Some(last)) => Some(SelectionRange { start: first, end: last }),
                _ => None,
            }
        } else {
            None
        };
        FragmentSelection { tree: self, range }
    }

    /// Boundary for a selection starting before char `pos`.
    fn run_starting_at(&self, pos: usize) -> Option<Boundary> {
        self.text_runs()
            .find(|(_, chars)| chars.start <= pos && pos < chars.end)
            .map(|(id, chars)| Boundary::new(id, pos - chars.start))
    }

    /// Boundary for a selection ending after char `pos - 1`.
    fn run_ending_at(&self, pos: usize) -> Option<Boundary> {
        self.text_runs()
            .find(|(_, chars)| chars.start < pos && pos <= chars.end)
            .map(|(id, chars)| Boundary::new(id, pos - chars.start))
    }

    fn node(&self, id: ContainerId) -> Option<&Fragment> {
        usize::try_from(id.0).ok().and_then(|i| self.nodes.get(i))
    }

    fn slice_chars(&self, chars: Range<usize>) -> &str {
        let byte_at = |pos: usize| {
            self.text
                .char_indices()
                .nth(pos)
                .map_or(self.text.len(), |(b, _)| b)
        };
        &self.text[byte_at(chars.start)..byte_at(chars.end)]
    }

    fn enclosing(&self, id: ContainerId) -> EnclosingElement {
        let parent = self.node(id).and_then(|n| n.parent).map(|p| &self.nodes[p].kind);
        match parent {
            Some(FragmentKind::Span { annotation_id }) => EnclosingElement::Span {
                annotation_id: Some(*annotation_id),
            },
            _ => EnclosingElement::Block,
        }
    }

    fn previous(&self, id: ContainerId) -> Option<SiblingElement> {
        let index = usize::try_from(id.0).ok()?;
        let parent = self.nodes.get(index)?.parent?;
        let siblings = &self.nodes[parent].children;
        let at = siblings.iter().position(|&c| c == index)?;
        let before = *siblings.get(at.checked_sub(1)?)?;
        Some(match self.nodes[before].kind {
            FragmentKind::Span { annotation_id } => SiblingElement::annotation(annotation_id),
            _ => SiblingElement { annotation_id: None },
        })
    }
}

fn container(index: usize) -> ContainerId {
    ContainerId(index as u64)
}

/// A selection over a [`FragmentTree`].
#[derive(Debug, Clone)]
pub struct FragmentSelection<'a> {
    tree: &'a FragmentTree,
    range: Option<SelectionRange>,
}

impl FragmentSelection<'_> {
    pub fn is_cleared(&self) -> bool {
        self.range.is_none()
    }

    /// Text covered by the selection when it lies in one run.
    pub fn selected_text(&self) -> Option<&str> {
        let range = self.range?;
        if !range.is_single_container() {
            return None;
        }
        let run = self.tree.text_of(range.start.container)?;
        let start = run.char_indices().nth(range.start.offset).map_or(run.len(), |(b, _)| b);
        let end = run.char_indices().nth(range.end.offset).map_or(run.len(), |(b, _)| b);
        run.get(start..end)
    }
}

impl Selection for FragmentSelection<'_> {
    fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    fn enclosing_element(&self, container: ContainerId) -> EnclosingElement {
        self.tree.enclosing(container)
    }

    fn previous_sibling(&self, container: ContainerId) -> Option<SiblingElement> {
        self.tree.previous(container)
    }

    fn clear(&mut self) {
        self.range = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(tree: &FragmentTree) -> Vec<String> {
        tree.text_runs()
            .filter_map(|(id, _)| tree.text_of(id).map(str::to_string))
            .collect()
    }

    #[test]
    fn plain_text_is_one_run() {
        let tree = FragmentTree::build("hello world", &[]);
        assert_eq!(runs(&tree), vec!["hello world"]);
        let sel = tree.select(0, 5);
        assert_eq!(sel.selected_text(), Some("hello"));
        assert_eq!(sel.enclosing_element(sel.range().unwrap().start.container), EnclosingElement::Block);
    }

    #[test]
    fn runs_split_around_spans() {
        let a = Annotation::new().with_range(0..5);
        let tree = FragmentTree::build("hello world", &[a.clone()]);
        assert_eq!(runs(&tree), vec!["hello", " world"]);
        assert!(tree.span_of(a.id).is_some());
    }

    #[test]
    fn touching_spans_leave_no_empty_run() {
        let a = Annotation::new().with_range(0..2);
        let b = Annotation::new().with_range(2..4);
        let tree = FragmentTree::build("abcd", &[b, a]);
        assert_eq!(runs(&tree), vec!["ab", "cd"]);
    }

    #[test]
    fn selection_after_span_reports_local_offsets() {
        let a = Annotation::new().with_range(0..5);
        let tree = FragmentTree::build("hello world", &[a.clone()]);
        let sel = tree.select(6, 9);
        let range = sel.range().unwrap();
        assert_eq!(range.start.offset, 1);
        assert_eq!(range.end.offset, 4);
        assert_eq!(sel.selected_text(), Some("wor"));
        assert_eq!(
            sel.previous_sibling(range.start.container),
            Some(SiblingElement::annotation(a.id))
        );
    }

    #[test]
    fn selection_inside_span_reports_enclosing_id() {
        let a = Annotation::new().with_range(6..11);
        let tree = FragmentTree::build("hello world", &[a.clone()]);
        let sel = tree.select(7, 9);
        let range = sel.range().unwrap();
        assert_eq!(range.start.offset, 1);
        assert_eq!(
            sel.enclosing_element(range.start.container),
            EnclosingElement::Span {
                annotation_id: Some(a.id)
            }
        );
        assert_eq!(sel.previous_sibling(range.start.container), None);
    }

    #[test]
    fn selection_across_span_spans_two_runs() {
        let a = Annotation::new().with_range(2..4);
        let tree = FragmentTree::build("abcdef", &[a]);
        let sel = tree.select(1, 5);
        assert!(!sel.range().unwrap().is_single_container());
        assert_eq!(sel.selected_text(), None);
    }

    #[test]
    fn empty_or_out_of_range_selection() {
        let tree = FragmentTree::build("abc", &[]);
        assert!(tree.select(1, 1).range().is_none());
        assert!(tree.select(5, 9).range().is_none());
        assert_eq!(tree.select(1, 99).selected_text(), Some("bc"));
    }

    #[test]
    fn multibyte_runs() {
        let a = Annotation::new().with_range(1..3);
        let tree = FragmentTree::build("añob", &[a]);
        assert_eq!(runs(&tree), vec!["a", "ño", "b"]);
        assert_eq!(tree.char_len(), 4);
    }

    #[test]
    fn clear_drops_range() {
        let tree = FragmentTree::build("abc", &[]);
        let mut sel = tree.select(0, 2);
        sel.clear();
        assert!(sel.is_cleared());
    }
}
