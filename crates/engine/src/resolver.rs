//! Element resolution: selector-or-handle plus ordinal index to a handle

use std::sync::Arc;

use pagepilot_dom_port::{DocumentProvider, ElementHandle, FrameRef};

/// What an operation targets: a selector query or an already-located
/// element. Handles pass through resolution unchanged so a found element
/// can be re-used without a second query.
#[derive(Clone, Debug)]
pub enum Target {
    Selector(String),
    Handle(ElementHandle),
}

impl Target {
    /// Short description for error messages and logs.
    pub fn describe(&self) -> String {
        match self {
            Target::Selector(s) => s.clone(),
            Target::Handle(h) => format!("element #{}", h.0),
        }
    }

    /// Whether a selector target is empty or blank.
    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, Target::Selector(s) if s.trim().is_empty())
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<ElementHandle> for Target {
    fn from(handle: ElementHandle) -> Self {
        Target::Handle(handle)
    }
}

/// Turns targets into concrete element handles.
///
/// Resolution has no side effects, never blocks and never fails: absence
/// (including an out-of-range index) is `None`. Timeout semantics live in
/// the wait engine, which calls this once per poll cycle.
#[derive(Clone)]
pub struct Resolver {
    provider: Arc<dyn DocumentProvider>,
}

impl Resolver {
    pub fn new(provider: Arc<dyn DocumentProvider>) -> Self {
        Self { provider }
    }

    /// Resolve a target to the match at `index`, scoped to `frame`.
    pub async fn resolve(
        &self,
        target: &Target,
        index: usize,
        frame: Option<&FrameRef>,
    ) -> Option<ElementHandle> {
        match target {
            Target::Handle(handle) => Some(*handle),
            Target::Selector(selector) => {
                let matches = self.provider.query_all(selector, frame).await;
                matches.get(index).copied()
            }
        }
    }

    /// Total number of matches for a selector, used by quorum checks.
    pub async fn count(&self, selector: &str, frame: Option<&FrameRef>) -> usize {
        self.provider.query_all(selector, frame).await.len()
    }
}
