#![forbid(unsafe_code)]

//! Deterministic forest construction for property tests.
//!
//! Proptest strategies hand over a byte vector; [`forest_from_seeds`] turns it
//! into a well-formed forest (non-overlapping siblings, children inside their
//! parent, every node at least one char wide) so tests can shrink on plain
//! bytes.

use crate::annotation::Annotation;

/// Build a valid forest over a container of `len` chars.
///
/// Seeds are consumed in pairs (gap, width) per node, depth first. `depth`
/// bounds nesting; `0` yields a flat forest.
pub fn forest_from_seeds(len: usize, seeds: &[u8], depth: u32) -> Vec<Annotation> {
    let mut seeds = seeds.iter().copied();
    build_level(len, &mut seeds, depth)
}

fn build_level(len: usize, seeds: &mut impl Iterator<Item = u8>, depth: u32) -> Vec<Annotation> {
    let mut level = Vec::new();
    let mut cursor = 0;
    while cursor < len {
        let (Some(gap), Some(width)) = (seeds.next(), seeds.next()) else {
            break;
        };
        let start = cursor + usize::from(gap % 4);
        if start >= len {
            break;
        }
        let end = (start + 1 + usize::from(width % 7)).min(len);
        let mut node = Annotation::new()
            .with_range(start..end)
            .with_kind(format!("k{}", width % 3));
        if depth > 0 {
            node.children = build_level(end - start, seeds, depth - 1);
        }
        level.push(node);
        cursor = end;
    }
    level
}
