#![forbid(unsafe_code)]

//! Nested text annotations.
//!
//! `annotext` ties the layers together behind one session type,
//! [`AnnotateText`]:
//!
//! - [`annotext_core`]: annotation nodes, ids, forest operations
//! - [`annotext_text`]: span markup, fragment runs, selection mapping
//! - [`annotext_layout`]: anchored overlay placement
//! - [`annotext_widgets`]: popup and tooltip slots
//!
//! # Example
//!
//! ```
//! use annotext::{AnnotateConfig, AnnotateText, MouseUpOutcome};
//!
//! let mut session = AnnotateText::new("hello world", Vec::new(), AnnotateConfig::default())?;
//! let tree = session.fragments();
//! let mut selection = tree.select(0, 5);
//! let outcome = session.handle_mouse_up(&mut selection, None);
//! assert!(matches!(outcome, MouseUpOutcome::Created(_)));
//! assert!(session.markup().contains("hello</span>"));
//! # Ok::<(), annotext::Error>(())
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod session;

pub use config::{AnnotateConfig, ConfigError};
pub use error::{Error, Result};
pub use session::{AnnotateEvent, AnnotateText, MouseUpOutcome};

pub use annotext_core::{
    Annotation, AnnotationData, AnnotationDraft, AnnotationId, StructureError, store,
};
pub use annotext_layout::{AnchorRect, Axis, Edge, Placement, ScrollOffset, Size};
pub use annotext_text::{
    FragmentSelection, FragmentTree, MarkupConfig, Selection, SelectionError, StaticSelection,
};
pub use annotext_widgets::{OverlaySlots, Popup, Tooltip, TooltipActivation};
