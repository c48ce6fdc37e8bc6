#![forbid(unsafe_code)]

//! Structural operations over an annotation forest.
//!
//! A forest is a plain `Vec<Annotation>` (or slice of one): the ordered
//! top-level annotations, each owning its children. Every lookup here is a
//! top-down depth-first walk; parents come before their children and earlier
//! siblings before later ones.
//!
//! None of these functions re-validate sibling ordering or overlap. Callers
//! that accept forests from outside should run [`validate`] once at the
//! boundary.

use std::collections::HashSet;
use std::ops::Range;

use thiserror::Error;

use crate::annotation::Annotation;
use crate::id::AnnotationId;

/// Find an annotation anywhere in the forest.
pub fn find_by_id(forest: &[Annotation], id: AnnotationId) -> Option<&Annotation> {
    for annotation in forest {
        if annotation.id == id {
            return Some(annotation);
        }
        if let Some(found) = find_by_id(&annotation.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_by_id`].
pub fn find_by_id_mut(forest: &mut [Annotation], id: AnnotationId) -> Option<&mut Annotation> {
    for annotation in forest.iter_mut() {
        if annotation.id == id {
            return Some(annotation);
        }
        if let Some(found) = find_by_id_mut(&mut annotation.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove an annotation and its whole subtree.
///
/// The match's descendants are dropped deepest first, then the match itself
/// is taken out of its containing sequence and returned (with no children
/// left). Returns `None` when the id is not in the forest.
pub fn delete(forest: &mut Vec<Annotation>, id: AnnotationId) -> Option<Annotation> {
    for i in 0..forest.len() {
        if forest[i].id == id {
            let mut removed = forest.remove(i);
            clear_descendants(&mut removed);
            tracing::debug!(message = "annotation.delete", id = id.get());
            return Some(removed);
        }
        if let Some(removed) = delete(&mut forest[i].children, id) {
            return Some(removed);
        }
    }
    None
}

fn clear_descendants(node: &mut Annotation) {
    while let Some(mut child) = node.children.pop() {
        clear_descendants(&mut child);
        tracing::trace!(message = "annotation.drop_descendant", id = child.id.get());
    }
}

/// Absolute interval of an annotation over the root text.
///
/// Each level contributes its start to the base offset of the level below.
/// Returns `None` if the id is absent or the node (or an ancestor) has unset
/// indices.
pub fn absolute_range(forest: &[Annotation], id: AnnotationId) -> Option<Range<usize>> {
    absolute_range_from(forest, id, 0)
}

fn absolute_range_from(level: &[Annotation], id: AnnotationId, base: usize) -> Option<Range<usize>> {
    for annotation in level {
        let range = annotation.range();
        if annotation.id == id {
            return range.map(|r| base + r.start..base + r.end);
        }
        if let Some(r) = range
            && let Some(found) = absolute_range_from(&annotation.children, id, base + r.start)
        {
            return Some(found);
        }
    }
    None
}

/// Pre-order iterator over every node, paired with its depth (roots are `0`).
pub fn iter_preorder(forest: &[Annotation]) -> Preorder<'_> {
    Preorder {
        stack: vec![forest.iter()],
    }
}

/// Iterator returned by [`iter_preorder`].
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<std::slice::Iter<'a, Annotation>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Annotation);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            match self.stack[depth].next() {
                Some(node) => {
                    if !node.children.is_empty() {
                        self.stack.push(node.children.iter());
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Advance the process id counter past every id in the forest.
pub fn reserve_ids(forest: &[Annotation]) {
    if let Some(max) = iter_preorder(forest).map(|(_, a)| a.id).max() {
        AnnotationId::reserve_through(max);
    }
}

/// Structural problems found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("annotation {id} has no start/end index")]
    UnsetIndices { id: AnnotationId },

    #[error("annotation {id} starts after it ends ({start} > {end})")]
    InvertedRange {
        id: AnnotationId,
        start: usize,
        end: usize,
    },

    #[error("annotation {id} ends at {end}, past its container length {extent}")]
    OutOfBounds {
        id: AnnotationId,
        end: usize,
        extent: usize,
    },

    #[error("sibling annotations {first} and {second} overlap")]
    OverlappingSiblings {
        first: AnnotationId,
        second: AnnotationId,
    },

    #[error("annotation id {id} appears more than once")]
    DuplicateId { id: AnnotationId },
}

/// Check the forest invariants against a root text of `text_len` chars.
///
/// - every node has both indices and `start <= end <= container length`
/// - siblings do not overlap (touching ends are fine)
/// - ids are unique across the whole forest
pub fn validate(forest: &[Annotation], text_len: usize) -> Result<(), StructureError> {
    let mut seen = HashSet::new();
    for (_, annotation) in iter_preorder(forest) {
        if !seen.insert(annotation.id) {
            return Err(StructureError::DuplicateId { id: annotation.id });
        }
    }
    validate_level(forest, text_len)
}

fn validate_level(level: &[Annotation], extent: usize) -> Result<(), StructureError> {
    let mut placed = Vec::with_capacity(level.len());
    for annotation in level {
        let id = annotation.id;
        let Some(range) = annotation.range() else {
            return Err(StructureError::UnsetIndices { id });
        };
        if range.start > range.end {
            return Err(StructureError::InvertedRange {
                id,
                start: range.start,
                end: range.end,
            });
        }
        if range.end > extent {
            return Err(StructureError::OutOfBounds {
                id,
                end: range.end,
                extent,
            });
        }
        validate_level(&annotation.children, range.end - range.start)?;
        placed.push((range, id));
    }

    placed.sort_by_key(|(range, _)| (range.start, range.end));
    for pair in placed.windows(2) {
        let (ref left, first) = pair[0];
        let (ref right, second) = pair[1];
        if right.start < left.end {
            return Err(StructureError::OverlappingSiblings { first, second });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn node(range: Range<usize>) -> Annotation {
        Annotation::new().with_range(range)
    }

    /// `[a:0..5 [b:1..3 [c:0..1]], d:6..9]`
    fn sample() -> (Vec<Annotation>, [AnnotationId; 4]) {
        let c = node(0..1);
        let b = node(1..3).with_children([c.clone()]);
        let a = node(0..5).with_children([b.clone()]);
        let d = node(6..9);
        let ids = [a.id, b.id, c.id, d.id];
        (vec![a, d], ids)
    }

    #[test]
    fn find_by_id_reaches_every_depth() {
        let (forest, ids) = sample();
        for id in ids {
            assert_eq!(find_by_id(&forest, id).map(|a| a.id), Some(id));
        }
        assert!(find_by_id(&forest, AnnotationId::from_raw(u64::MAX)).is_none());
    }

    #[test]
    fn find_by_id_mut_allows_edit() {
        let (mut forest, [_, b, _, _]) = sample();
        find_by_id_mut(&mut forest, b).unwrap().kind = "edited".into();
        assert_eq!(find_by_id(&forest, b).unwrap().kind, "edited");
    }

    #[test]
    fn delete_removes_subtree() {
        let (mut forest, [a, b, c, d]) = sample();
        let removed = delete(&mut forest, a).unwrap();
        assert_eq!(removed.id, a);
        assert!(removed.children.is_empty());
        assert!(find_by_id(&forest, b).is_none());
        assert!(find_by_id(&forest, c).is_none());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, d);
    }

    #[test]
    fn delete_nested_keeps_parent() {
        let (mut forest, [a, b, c, _]) = sample();
        delete(&mut forest, b).unwrap();
        assert!(find_by_id(&forest, a).unwrap().children.is_empty());
        assert!(find_by_id(&forest, c).is_none());
    }

    #[traced_test]
    #[test]
    fn delete_logs_removed_id() {
        let (mut forest, [a, ..]) = sample();
        delete(&mut forest, a);
        assert!(logs_contain("annotation.delete"));
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let (mut forest, _) = sample();
        let before = forest.clone();
        assert!(delete(&mut forest, AnnotationId::from_raw(u64::MAX)).is_none());
        assert_eq!(forest, before);
    }

    #[test]
    fn absolute_range_sums_parent_starts() {
        let (forest, [a, b, c, d]) = sample();
        assert_eq!(absolute_range(&forest, a), Some(0..5));
        assert_eq!(absolute_range(&forest, b), Some(1..3));
        assert_eq!(absolute_range(&forest, c), Some(1..2));
        assert_eq!(absolute_range(&forest, d), Some(6..9));
    }

    #[test]
    fn absolute_range_of_unset_node_is_none() {
        let loose = Annotation::new();
        let id = loose.id;
        assert_eq!(absolute_range(&[loose], id), None);
    }

    #[test]
    fn preorder_visits_parents_first() {
        let (forest, [a, b, c, d]) = sample();
        let order: Vec<_> = iter_preorder(&forest).map(|(depth, n)| (depth, n.id)).collect();
        assert_eq!(order, vec![(0, a), (1, b), (2, c), (0, d)]);
    }

    #[test]
    fn reserve_ids_moves_counter_past_forest() {
        let foreign = Annotation {
            id: AnnotationId::from_raw(AnnotationId::next().get() + 500),
            ..Annotation::new()
        };
        let max = foreign.id;
        reserve_ids(&[foreign]);
        assert!(AnnotationId::next() > max);
    }

    #[test]
    fn validate_accepts_sample() {
        let (forest, _) = sample();
        assert_eq!(validate(&forest, 9), Ok(()));
    }

    #[test]
    fn validate_accepts_touching_siblings() {
        let forest = vec![node(0..3), node(3..3), node(3..6)];
        assert_eq!(validate(&forest, 6), Ok(()));
    }

    #[test]
    fn validate_rejects_overlap_regardless_of_order() {
        let late = node(4..8);
        let early = node(0..5);
        let (late_id, early_id) = (late.id, early.id);
        let err = validate(&[late, early], 10).unwrap_err();
        assert_eq!(
            err,
            StructureError::OverlappingSiblings {
                first: early_id,
                second: late_id
            }
        );
    }

    #[test]
    fn validate_rejects_child_past_parent() {
        let child = node(2..7);
        let child_id = child.id;
        let forest = vec![node(0..5).with_children([child])];
        assert_eq!(
            validate(&forest, 10),
            Err(StructureError::OutOfBounds {
                id: child_id,
                end: 7,
                extent: 5
            })
        );
    }

    #[test]
    fn validate_rejects_unset_and_inverted() {
        let loose = Annotation::new();
        let id = loose.id;
        assert_eq!(validate(&[loose], 3), Err(StructureError::UnsetIndices { id }));

        let inverted = node(4..1);
        let id = inverted.id;
        assert_eq!(
            validate(&[inverted], 5),
            Err(StructureError::InvertedRange { id, start: 4, end: 1 })
        );
    }

    #[test]
    fn validate_rejects_duplicate_ids_across_levels() {
        let child = node(0..1);
        let mut twin = node(3..4);
        twin.id = child.id;
        let forest = vec![node(0..2).with_children([child.clone()]), twin];
        assert_eq!(
            validate(&forest, 5),
            Err(StructureError::DuplicateId { id: child.id })
        );
    }

    #[test]
    fn error_messages_name_the_ids() {
        let err = StructureError::OutOfBounds {
            id: AnnotationId::from_raw(4),
            end: 9,
            extent: 5,
        };
        assert_eq!(err.to_string(), "annotation 4 ends at 9, past its container length 5");
    }
}
