#![forbid(unsafe_code)]

//! Geometric primitives in viewport pixels.

use serde::{Deserialize, Serialize};

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along one axis.
    #[inline]
    pub const fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// True unless both extents are finite and strictly positive.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
    }
}

/// Bounding box of the anchor element, in viewport coordinates.
///
/// Edges rather than origin plus size, matching what layout engines report
/// for client rects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl AnchorRect {
    #[inline]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from origin and size.
    #[inline]
    pub fn from_origin(left: f64, top: f64, size: Size) -> Self {
        Self::new(left, top, left + size.width, top + size.height)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Leading edge coordinate on an axis (left or top).
    #[inline]
    pub const fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Trailing edge coordinate on an axis (right or bottom).
    #[inline]
    pub const fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }
}

/// Page scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    #[inline]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    #[inline]
    pub const fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }
}

/// Placement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left/right of the anchor.
    #[default]
    X,
    /// Above/below the anchor.
    Y,
}

impl Axis {
    #[inline]
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Edge reached by docking before the anchor on this axis.
    #[inline]
    pub const fn leading_edge(self) -> Edge {
        match self {
            Self::X => Edge::Left,
            Self::Y => Edge::Top,
        }
    }

    /// Edge reached by docking after the anchor on this axis.
    #[inline]
    pub const fn trailing_edge(self) -> Edge {
        match self {
            Self::X => Edge::Right,
            Self::Y => Edge::Bottom,
        }
    }
}

/// Side of the anchor an overlay docked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Top | Self::Bottom => Axis::Y,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
