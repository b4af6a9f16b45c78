//! The document provider capability trait

use async_trait::async_trait;

use crate::types::{DomEvent, ElementHandle, FrameRef, Point, Rect, SelectOption, Viewport};

/// Capability interface implemented by whatever owns the document: the top
/// document itself, a nested frame's document, or a test double.
///
/// Contract notes:
/// - Absence is represented as `None` or an empty collection, never an
///   error. Timeout semantics live above this boundary, in the engine's
///   wait layer.
/// - `query_all` returns matches in document order.
/// - Geometry is viewport-relative; nested-frame coordinates are translated
///   through `frame_offset`.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// All elements matching `selector`, in document order, optionally
    /// scoped to a nested frame's document.
    async fn query_all(&self, selector: &str, frame: Option<&FrameRef>) -> Vec<ElementHandle>;

    /// The element's bounding box, or `None` if the handle went stale.
    async fn bounding_box(&self, handle: ElementHandle) -> Option<Rect>;

    /// Translation from a frame's local coordinates to top-level
    /// coordinates.
    async fn frame_offset(&self, frame: &FrameRef) -> Point;

    /// Top-level viewport dimensions.
    async fn viewport(&self) -> Viewport;

    /// Request a smooth scroll bringing the element into view. Scrolling is
    /// asynchronous on real documents and has no completion signal.
    async fn scroll_into_view(&self, handle: ElementHandle);

    /// Dispatch an event to the element.
    async fn dispatch(&self, handle: ElementHandle, event: DomEvent);

    // Read accessors -------------------------------------------------------

    /// Rendered text content.
    async fn text(&self, handle: ElementHandle) -> Option<String>;

    /// Inner HTML.
    async fn html(&self, handle: ElementHandle) -> Option<String>;

    /// A single attribute value.
    async fn attribute(&self, handle: ElementHandle, name: &str) -> Option<String>;

    /// All attributes as name/value pairs.
    async fn attributes(&self, handle: ElementHandle) -> Vec<(String, String)>;

    /// The element's class list.
    async fn class_list(&self, handle: ElementHandle) -> Vec<String>;

    /// Current value of a form control.
    async fn value(&self, handle: ElementHandle) -> Option<String>;

    /// Checked state of a checkbox/radio control.
    async fn checked(&self, handle: ElementHandle) -> Option<bool>;

    /// Options of a select control, in document order.
    async fn options(&self, handle: ElementHandle) -> Vec<SelectOption>;

    /// Selected option ordinal of a select control.
    async fn selected_index(&self, handle: ElementHandle) -> Option<usize>;

    // Write accessors ------------------------------------------------------

    /// Replace rendered text content.
    async fn set_text(&self, handle: ElementHandle, text: &str);

    /// Replace inner HTML.
    async fn set_html(&self, handle: ElementHandle, html: &str);

    /// Set one attribute, adding it when absent.
    async fn set_attribute(&self, handle: ElementHandle, name: &str, value: &str);

    /// Set several attributes at once. Attributes not named keep their
    /// values.
    async fn set_attributes(&self, handle: ElementHandle, attributes: &[(&str, &str)]);

    /// Remove one attribute.
    async fn remove_attribute(&self, handle: ElementHandle, name: &str);

    /// Remove several attributes at once.
    async fn remove_attributes(&self, handle: ElementHandle, names: &[&str]);

    /// Add a class to the element's class list.
    async fn add_class(&self, handle: ElementHandle, class: &str);

    /// Remove a class from the element's class list.
    async fn remove_class(&self, handle: ElementHandle, class: &str);

    /// Replace the whole class list.
    async fn set_class_list(&self, handle: ElementHandle, classes: &[&str]);

    /// Remove every class from the element.
    async fn clear_class_list(&self, handle: ElementHandle);

    /// Assign a form control's value. Emits no notifications; the engine
    /// dispatches `Input`/`Change` itself.
    async fn set_value(&self, handle: ElementHandle, value: &str);

    /// Set the selected option ordinal of a select control.
    async fn set_selected_index(&self, handle: ElementHandle, index: usize);
}
