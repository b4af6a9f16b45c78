//! Handle, geometry and event types shared across the provider boundary

use serde::{Deserialize, Serialize};

/// Opaque reference to a located element.
///
/// Handles are owned by the document provider and stay valid only for one
/// resolution cycle: the underlying element may be replaced at any time, so
/// callers re-resolve instead of caching.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Reference to a nested, independently addressable sub-document.
///
/// A frame has its own coordinate space; the provider translates it into
/// top-level coordinates via [`DocumentProvider::frame_offset`].
///
/// [`DocumentProvider::frame_offset`]: crate::DocumentProvider::frame_offset
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameRef(pub String);

impl FrameRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A point in top-level viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector addition, used to apply frame offsets.
    pub fn offset_by(self, other: Point) -> Point {
        Point {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// An element's bounding box, relative to its document's viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometric center, the pointer travel target for this element.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// Top-level viewport dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the rect lies fully inside the visible viewport.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.y >= 0.0
            && rect.x >= 0.0
            && rect.y + rect.height <= self.height
            && rect.x + rect.width <= self.width
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Event kinds the engine dispatches through the provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DomEvent {
    /// Native click on the element.
    Click,

    /// Move input focus to the element.
    Focus,

    /// Value-change notification after a programmatic value set.
    ///
    /// `force_reactive` tags the event so frameworks that track the previous
    /// value internally still pick up the synthetic update.
    Input { force_reactive: bool },

    /// Committed-change notification, fired after `Input`.
    Change,
}

/// One option of a select control.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// The option's `value` attribute.
    pub value: String,

    /// The option's visible label text.
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
