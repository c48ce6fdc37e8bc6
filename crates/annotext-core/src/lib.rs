#![forbid(unsafe_code)]

//! Core: annotation nodes, identity, and forest operations.
//!
//! # Role in annotext
//! `annotext-core` is the data layer. It owns the [`Annotation`] node, the
//! process-wide id counter, and the structural operations (lookup, delete,
//! validation) that every other crate performs over a forest.
//!
//! # Coordinate spaces
//! A node's `start_index`/`end_index` are local to its container: the root
//! text for top-level nodes, the parent's interval otherwise. Nothing in
//! this crate stores absolute offsets; [`store::absolute_range`] derives them
//! on demand by walking down from the roots.
//!
//! # Parent links
//! Nodes never point back at their parent. Parent identity is recovered by
//! top-down search, so restructuring the forest cannot leave a stale link.

pub mod annotation;
pub mod data;
pub mod id;
pub mod store;

pub use annotation::{Annotation, AnnotationDraft};
pub use data::AnnotationData;
pub use id::AnnotationId;
pub use store::StructureError;

#[cfg(feature = "test-helpers")]
pub mod testing;
