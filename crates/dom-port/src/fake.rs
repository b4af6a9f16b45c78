//! In-memory document provider for tests
//!
//! `FakeDom` trades selector parsing for declaration: each element lists the
//! selector strings it matches. Geometry can be scripted per element so
//! tests can simulate layout shifts between measurements, and every
//! dispatched event is recorded for assertions.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::provider::DocumentProvider;
use crate::types::{DomEvent, ElementHandle, FrameRef, Point, Rect, SelectOption, Viewport};

/// Declaration of one fake element.
#[derive(Clone, Debug)]
pub struct FakeElement {
    selectors: Vec<String>,
    frame: Option<FrameRef>,
    text: String,
    html: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    value: String,
    checkbox: bool,
    checked: bool,
    options: Vec<SelectOption>,
    selected_index: Option<usize>,
    rect: Rect,
}

impl FakeElement {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selectors: vec![selector.into()],
            frame: None,
            text: String::new(),
            html: String::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
            value: String::new(),
            checkbox: false,
            checked: false,
            options: Vec::new(),
            selected_index: None,
            rect: Rect::new(100.0, 100.0, 80.0, 20.0),
        }
    }

    /// Declare an additional selector this element matches.
    pub fn matching(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    pub fn in_frame(mut self, frame: FrameRef) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Mark the element as a checkbox. Clicks toggle its checked state.
    pub fn checkbox(mut self, checked: bool) -> Self {
        self.checkbox = true;
        self.checked = checked;
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self.selected_index = Some(0);
        self
    }

    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

struct Entry {
    id: u64,
    element: FakeElement,
    rect_script: VecDeque<Rect>,
    rect_queries: u64,
    removed: bool,
}

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    next_id: u64,
    viewport: Option<Viewport>,
    frame_offsets: Vec<(FrameRef, Point)>,
    events: Vec<(ElementHandle, DomEvent)>,
    scrolled: Vec<ElementHandle>,
}

/// In-memory provider; cheap to clone behind an `Arc`.
#[derive(Default)]
pub struct FakeDom {
    inner: Mutex<Inner>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element at the end of the document.
    pub fn insert(&self, element: FakeElement) -> ElementHandle {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.push(Entry {
            id,
            element,
            rect_script: VecDeque::new(),
            rect_queries: 0,
            removed: false,
        });
        ElementHandle(id)
    }

    /// Remove an element from the document. Its handle goes stale.
    pub fn remove(&self, handle: ElementHandle) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == handle.0) {
            entry.removed = true;
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.lock().viewport = Some(viewport);
    }

    pub fn set_frame_offset(&self, frame: FrameRef, offset: Point) {
        self.inner.lock().frame_offsets.push((frame, offset));
    }

    pub fn set_text(&self, handle: ElementHandle, text: impl Into<String>) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == handle.0) {
            entry.element.text = text.into();
        }
    }

    pub fn set_rect(&self, handle: ElementHandle, rect: Rect) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == handle.0) {
            entry.element.rect = rect;
        }
    }

    /// Queue rects to be served by successive `bounding_box` calls. When the
    /// queue drains, the last served rect sticks.
    pub fn script_rects(&self, handle: ElementHandle, rects: impl IntoIterator<Item = Rect>) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.iter_mut().find(|e| e.id == handle.0) {
            entry.rect_script.extend(rects);
        }
    }

    /// How many times `bounding_box` was asked about this element.
    pub fn rect_queries(&self, handle: ElementHandle) -> u64 {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .find(|e| e.id == handle.0)
            .map(|e| e.rect_queries)
            .unwrap_or(0)
    }

    /// All dispatched events in dispatch order.
    pub fn events(&self) -> Vec<(ElementHandle, DomEvent)> {
        self.inner.lock().events.clone()
    }

    /// Events dispatched to one element, in dispatch order.
    pub fn events_for(&self, handle: ElementHandle) -> Vec<DomEvent> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, e)| *e)
            .collect()
    }

    /// Elements that received a scroll-into-view request.
    pub fn scrolled(&self) -> Vec<ElementHandle> {
        self.inner.lock().scrolled.clone()
    }

    pub fn checked_state(&self, handle: ElementHandle) -> Option<bool> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .find(|e| e.id == handle.0 && !e.removed)
            .map(|e| e.element.checked)
    }

    pub fn value_of(&self, handle: ElementHandle) -> Option<String> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .find(|e| e.id == handle.0 && !e.removed)
            .map(|e| e.element.value.clone())
    }

    fn with_entry<T>(&self, handle: ElementHandle, f: impl FnOnce(&Entry) -> T) -> Option<T> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .find(|e| e.id == handle.0 && !e.removed)
            .map(f)
    }

    fn with_entry_mut<T>(
        &self,
        handle: ElementHandle,
        f: impl FnOnce(&mut Entry) -> T,
    ) -> Option<T> {
        let mut inner = self.inner.lock();
        inner
            .entries
            .iter_mut()
            .find(|e| e.id == handle.0 && !e.removed)
            .map(f)
    }
}

fn upsert_attribute(attributes: &mut Vec<(String, String)>, name: &str, value: &str) {
    match attributes.iter().position(|(n, _)| n == name) {
        Some(i) => attributes[i].1 = value.to_string(),
        None => attributes.push((name.to_string(), value.to_string())),
    }
}

#[async_trait]
impl DocumentProvider for FakeDom {
    async fn query_all(&self, selector: &str, frame: Option<&FrameRef>) -> Vec<ElementHandle> {
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .filter(|e| !e.removed)
            .filter(|e| e.element.frame.as_ref() == frame)
            .filter(|e| e.element.selectors.iter().any(|s| s == selector))
            .map(|e| ElementHandle(e.id))
            .collect()
    }

    async fn bounding_box(&self, handle: ElementHandle) -> Option<Rect> {
        self.with_entry_mut(handle, |entry| {
            entry.rect_queries += 1;
            if let Some(next) = entry.rect_script.pop_front() {
                entry.element.rect = next;
            }
            entry.element.rect
        })
    }

    async fn frame_offset(&self, frame: &FrameRef) -> Point {
        let inner = self.inner.lock();
        inner
            .frame_offsets
            .iter()
            .find(|(f, _)| f == frame)
            .map(|(_, p)| *p)
            .unwrap_or_default()
    }

    async fn viewport(&self) -> Viewport {
        self.inner.lock().viewport.unwrap_or_default()
    }

    async fn scroll_into_view(&self, handle: ElementHandle) {
        self.inner.lock().scrolled.push(handle);
    }

    async fn dispatch(&self, handle: ElementHandle, event: DomEvent) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner
            .entries
            .iter_mut()
            .find(|e| e.id == handle.0 && !e.removed)
        {
            if entry.element.checkbox && event == DomEvent::Click {
                entry.element.checked = !entry.element.checked;
            }
        }
        inner.events.push((handle, event));
    }

    async fn text(&self, handle: ElementHandle) -> Option<String> {
        self.with_entry(handle, |e| e.element.text.clone())
    }

    async fn html(&self, handle: ElementHandle) -> Option<String> {
        self.with_entry(handle, |e| e.element.html.clone())
    }

    async fn attribute(&self, handle: ElementHandle, name: &str) -> Option<String> {
        self.with_entry(handle, |e| {
            e.element
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        })
        .flatten()
    }

    async fn attributes(&self, handle: ElementHandle) -> Vec<(String, String)> {
        self.with_entry(handle, |e| e.element.attributes.clone())
            .unwrap_or_default()
    }

    async fn class_list(&self, handle: ElementHandle) -> Vec<String> {
        self.with_entry(handle, |e| e.element.classes.clone())
            .unwrap_or_default()
    }

    async fn value(&self, handle: ElementHandle) -> Option<String> {
        self.with_entry(handle, |e| e.element.value.clone())
    }

    async fn checked(&self, handle: ElementHandle) -> Option<bool> {
        self.with_entry(handle, |e| e.element.checked)
    }

    async fn options(&self, handle: ElementHandle) -> Vec<SelectOption> {
        self.with_entry(handle, |e| e.element.options.clone())
            .unwrap_or_default()
    }

    async fn selected_index(&self, handle: ElementHandle) -> Option<usize> {
        self.with_entry(handle, |e| e.element.selected_index)
            .flatten()
    }

    async fn set_text(&self, handle: ElementHandle, text: &str) {
        self.with_entry_mut(handle, |e| e.element.text = text.to_string());
    }

    async fn set_html(&self, handle: ElementHandle, html: &str) {
        self.with_entry_mut(handle, |e| e.element.html = html.to_string());
    }

    async fn set_attribute(&self, handle: ElementHandle, name: &str, value: &str) {
        self.with_entry_mut(handle, |e| upsert_attribute(&mut e.element.attributes, name, value));
    }

    async fn set_attributes(&self, handle: ElementHandle, attributes: &[(&str, &str)]) {
        self.with_entry_mut(handle, |e| {
            for (name, value) in attributes {
                upsert_attribute(&mut e.element.attributes, name, value);
            }
        });
    }

    async fn remove_attribute(&self, handle: ElementHandle, name: &str) {
        self.with_entry_mut(handle, |e| {
            e.element.attributes.retain(|(n, _)| n != name);
        });
    }

    async fn remove_attributes(&self, handle: ElementHandle, names: &[&str]) {
        self.with_entry_mut(handle, |e| {
            e.element.attributes.retain(|(n, _)| !names.contains(&n.as_str()));
        });
    }

    async fn add_class(&self, handle: ElementHandle, class: &str) {
        self.with_entry_mut(handle, |e| {
            if !e.element.classes.iter().any(|c| c == class) {
                e.element.classes.push(class.to_string());
            }
        });
    }

    async fn remove_class(&self, handle: ElementHandle, class: &str) {
        self.with_entry_mut(handle, |e| {
            e.element.classes.retain(|c| c != class);
        });
    }

    async fn set_class_list(&self, handle: ElementHandle, classes: &[&str]) {
        self.with_entry_mut(handle, |e| {
            e.element.classes = classes.iter().map(|c| c.to_string()).collect();
        });
    }

    async fn clear_class_list(&self, handle: ElementHandle) {
        self.with_entry_mut(handle, |e| e.element.classes.clear());
    }

    async fn set_value(&self, handle: ElementHandle, value: &str) {
        self.with_entry_mut(handle, |e| e.element.value = value.to_string());
    }

    async fn set_selected_index(&self, handle: ElementHandle, index: usize) {
        self.with_entry_mut(handle, |e| {
            if index < e.element.options.len() {
                e.element.selected_index = Some(index);
                e.element.value = e.element.options[index].value.clone();
            }
        });
    }
}

impl FakeDom {
    /// Class list of an element, for assertions.
    pub fn classes_of(&self, handle: ElementHandle) -> Vec<String> {
        self.with_entry(handle, |e| e.element.classes.clone())
            .unwrap_or_default()
    }

    /// Selected option ordinal, for assertions.
    pub fn selected_of(&self, handle: ElementHandle) -> Option<usize> {
        self.with_entry(handle, |e| e.element.selected_index)
            .flatten()
    }
}
