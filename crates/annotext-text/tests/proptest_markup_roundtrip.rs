//! Property-based invariant tests for span rendering.
//!
//! 1. Stripping the markers from rendered markup gives back the text, even
//!    when the text itself contains marker-like substrings
//! 2. Every span wraps exactly the chars of its annotation's absolute range
//! 3. Spans open and close in properly nested order
//! 4. An empty forest renders the text unchanged

use std::collections::HashMap;
use std::ops::Range;

use annotext_core::store::{absolute_range, iter_preorder};
use annotext_core::testing::forest_from_seeds;
use annotext_core::{Annotation, AnnotationId};
use annotext_text::markup::CLOSING_MARKER;
use annotext_text::{MarkupConfig, render_markup, strip_markup};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn annotated_text() -> impl Strategy<Value = (String, Vec<Annotation>)> {
    (
        "[a-zé ]{1,40}",
        prop::collection::vec(any::<u8>(), 0..64),
        0u32..3,
    )
        .prop_map(|(text, seeds, depth)| {
            let forest = forest_from_seeds(text.chars().count(), &seeds, depth);
            (text, forest)
        })
}

/// Text built from fragments that look like the renderer's own markers.
fn marker_like_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(CLOSING_MARKER.to_string()),
            Just("<span class=\"annotate-text-annotation ".to_string()),
            Just("data-annotation-id=\"7\">".to_string()),
            "[a-zé </>\"]{1,4}",
        ],
        1..10,
    )
    .prop_map(|parts| parts.concat())
}

fn annotated_marker_like_text() -> impl Strategy<Value = (String, Vec<Annotation>)> {
    (
        marker_like_text(),
        prop::collection::vec(any::<u8>(), 0..64),
        0u32..3,
    )
        .prop_map(|(text, seeds, depth)| {
            let forest = forest_from_seeds(text.chars().count(), &seeds, depth);
            (text, forest)
        })
}

/// Plain-char ranges of every span, keyed by the id attribute.
///
/// Fails with `None` if a closing marker has no matching opening marker.
fn parse_spans(markup: &str) -> Option<HashMap<AnnotationId, Range<usize>>> {
    let config = MarkupConfig::default();
    let id_attr = format!("{}=\"", config.id_attribute);
    let mut spans = HashMap::new();
    let mut open: Vec<(AnnotationId, usize)> = Vec::new();
    let mut plain = 0usize;
    let mut rest = markup;
    while !rest.is_empty() {
        if rest.starts_with("<span ") {
            let at = rest.find(&id_attr)? + id_attr.len();
            let close = at + rest[at..].find('"')?;
            let id: AnnotationId = rest[at..close].parse().ok()?;
            open.push((id, plain));
            rest = &rest[close + rest[close..].find('>')? + 1..];
        } else if let Some(tail) = rest.strip_prefix(CLOSING_MARKER) {
            let (id, start) = open.pop()?;
            spans.insert(id, start..plain);
            rest = tail;
        } else {
            let ch = rest.chars().next()?;
            plain += 1;
            rest = &rest[ch.len_utf8()..];
        }
    }
    open.is_empty().then_some(spans)
}

// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn strip_recovers_text((text, forest) in annotated_text()) {
        let markup = render_markup(&text, &forest);
        prop_assert_eq!(
            strip_markup(&markup, &forest, &MarkupConfig::default()),
            Some(text)
        );
    }

    #[test]
    fn strip_keeps_marker_like_text((text, forest) in annotated_marker_like_text()) {
        let markup = render_markup(&text, &forest);
        prop_assert_eq!(
            strip_markup(&markup, &forest, &MarkupConfig::default()),
            Some(text)
        );
    }

    #[test]
    fn spans_wrap_absolute_ranges((text, forest) in annotated_text()) {
        let markup = render_markup(&text, &forest);
        let spans = parse_spans(&markup);
        prop_assert!(spans.is_some(), "unbalanced markup: {}", markup);
        let spans = spans.unwrap_or_default();
        prop_assert_eq!(spans.len(), iter_preorder(&forest).count());
        for (_, node) in iter_preorder(&forest) {
            prop_assert_eq!(spans.get(&node.id).cloned(), absolute_range(&forest, node.id));
        }
    }

    #[test]
    fn marker_counts_balance((text, forest) in annotated_text()) {
        let markup = render_markup(&text, &forest);
        let opens = markup.matches("<span ").count();
        let closes = markup.matches(CLOSING_MARKER).count();
        prop_assert_eq!(opens, closes);
        prop_assert_eq!(opens, iter_preorder(&forest).count());
    }

    #[test]
    fn empty_forest_is_identity(text in "[a-zé <>]{0,40}") {
        prop_assert_eq!(render_markup(&text, &[]), text);
    }
}
