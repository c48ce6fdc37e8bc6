#![forbid(unsafe_code)]

//! Text: markup rendering and selection mapping over annotated text.
//!
//! # Pipeline
//! - [`markup::render_markup`] turns `(text, forest)` into a string with one
//!   span marker pair per annotation, nested the way the forest is.
//! - A host displays that markup. Its layout engine splits the text into runs
//!   around every span; [`fragment::FragmentTree`] models the same split for
//!   hosts without a DOM.
//! - When the user selects part of one run, [`mapper::map_selection`] turns
//!   the run-local offsets back into container-local indices and appends a
//!   new annotation in the right place.
//!
//! The [`selection::Selection`] trait is the seam between the mapper and
//! whatever owns the live selection.

pub mod fragment;
pub mod mapper;
pub mod markup;
pub mod selection;

pub use fragment::{FragmentSelection, FragmentTree};
pub use mapper::{SelectionError, map_selection};
pub use markup::{MarkupConfig, render_markup, render_markup_with, strip_markup};
pub use selection::{
    Boundary, ContainerId, EnclosingElement, Selection, SelectionRange, SiblingElement,
    StaticSelection,
};
