#![forbid(unsafe_code)]

//! Process-wide annotation identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of an annotation node.
///
/// Ids are drawn from a single counter shared by the whole process. They are
/// handed out in increasing order and never reused, so uniqueness holds
/// across every forest, not only within one sibling group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(u64);

impl AnnotationId {
    /// Allocate the next unused id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw id, e.g. one parsed back out of rendered markup.
    ///
    /// This does not reserve anything; see [`AnnotationId::reserve_through`].
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Make sure `id` and everything below it is never issued by [`next`].
    ///
    /// Used when a forest arrives from outside the process with ids already
    /// assigned.
    ///
    /// [`next`]: AnnotationId::next
    pub fn reserve_through(id: AnnotationId) {
        NEXT_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AnnotationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
