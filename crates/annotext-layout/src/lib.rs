#![forbid(unsafe_code)]

//! Geometry and anchored placement for floating overlays.
//!
//! Everything here is pure: the same [`PositionRequest`] always produces the
//! same [`Placement`]. Hosts call [`compute_position`] once the overlay's real
//! rendered size is known, and again whenever the viewport resizes.

pub mod geometry;
pub mod position;

pub use geometry::{AnchorRect, Axis, Edge, ScrollOffset, Size};
pub use position::{Placement, PositionPreferences, PositionRequest, compute_position};
