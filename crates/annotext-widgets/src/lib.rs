#![forbid(unsafe_code)]

//! Overlays: the popup and tooltip shown over annotation spans.
//!
//! At most one popup and one tooltip exist at a time. [`OverlaySlots`] owns
//! both and applies the replacement rules; [`Popup`] and [`Tooltip`] carry
//! what the host needs to draw them and remember where they were last
//! placed.

pub mod overlay;
pub mod slots;

pub use overlay::{Popup, Tooltip};
pub use slots::{OverlaySlots, TooltipActivation};
