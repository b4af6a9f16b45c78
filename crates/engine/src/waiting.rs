//! Deadline-bounded polling waits
//!
//! Polling is used instead of native mutation observation because reliable
//! cross-frame, cross-navigation change notification is not guaranteed by
//! the host; a bounded poll applies uniformly to "element appears",
//! "element's text updates" and "element count changes". Every wait either
//! returns its match before the deadline or fails with a timeout error,
//! never a partial result.

use std::sync::Arc;

use pagepilot_dom_port::{DocumentProvider, ElementHandle, FrameRef};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::EngineError;
use crate::resolver::{Resolver, Target};
use crate::types::{QuorumMatch, QuorumSpec, WaitPolicy};

pub(crate) struct WaitEngine {
    provider: Arc<dyn DocumentProvider>,
    resolver: Resolver,
    cancel: CancellationToken,
}

impl WaitEngine {
    pub fn new(provider: Arc<dyn DocumentProvider>, cancel: CancellationToken) -> Self {
        let resolver = Resolver::new(provider.clone());
        Self {
            provider,
            resolver,
            cancel,
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Poll until the target resolves; fail once elapsed time reaches the
    /// policy deadline.
    pub async fn await_element(
        &self,
        target: &Target,
        index: usize,
        frame: Option<&FrameRef>,
        policy: WaitPolicy,
    ) -> Result<ElementHandle, EngineError> {
        if target.is_blank() {
            return Err(EngineError::MissingArgument("selector".to_string()));
        }

        let deadline = Instant::now() + policy.timeout;
        loop {
            if self.cancel.is_cancelled() {
                return Err(EngineError::Cancelled(target.describe()));
            }

            if let Some(handle) = self.resolver.resolve(target, index, frame).await {
                return Ok(handle);
            }

            if Instant::now() >= deadline {
                warn!(
                    selector = %target.describe(),
                    timeout_ms = policy.timeout.as_millis() as u64,
                    "element wait timed out"
                );
                return Err(EngineError::not_found(target.describe()));
            }

            sleep(policy.retry_interval).await;
        }
    }

    /// Speculative probe: a not-found timeout becomes `false` instead of an
    /// error. Cancellation still surfaces.
    pub async fn element_exists(
        &self,
        target: &Target,
        index: usize,
        frame: Option<&FrameRef>,
        policy: WaitPolicy,
    ) -> Result<bool, EngineError> {
        match self.await_element(target, index, frame, policy).await {
            Ok(_) => Ok(true),
            Err(EngineError::ElementNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Poll until the target's rendered text contains `text`.
    ///
    /// The element is re-resolved on every cycle; a wait can therefore ride
    /// out the element being replaced while its text updates.
    pub async fn await_text(
        &self,
        target: &Target,
        index: usize,
        frame: Option<&FrameRef>,
        text: &str,
        policy: WaitPolicy,
    ) -> Result<ElementHandle, EngineError> {
        if target.is_blank() {
            return Err(EngineError::MissingArgument("selector".to_string()));
        }
        if text.is_empty() {
            return Err(EngineError::MissingArgument("text".to_string()));
        }

        let deadline = Instant::now() + policy.timeout;
        loop {
            if self.cancel.is_cancelled() {
                return Err(EngineError::Cancelled(target.describe()));
            }

            if let Some(handle) = self.resolver.resolve(target, index, frame).await {
                let rendered = self.provider.text(handle).await.unwrap_or_default();
                if rendered.contains(text) {
                    return Ok(handle);
                }
            }

            if Instant::now() >= deadline {
                warn!(
                    selector = %target.describe(),
                    text = text,
                    "text wait timed out"
                );
                return Err(EngineError::text_not_found(target.describe(), text));
            }

            sleep(policy.retry_interval).await;
        }
    }

    /// Multi-selector quorum wait.
    ///
    /// Each cycle re-queries the document fresh: selectors may match
    /// different elements across polls when the DOM is replaced underneath
    /// the wait.
    pub async fn await_elements(
        &self,
        selectors: &[String],
        spec: &QuorumSpec,
        frame: Option<&FrameRef>,
        policy: WaitPolicy,
    ) -> Result<QuorumMatch, EngineError> {
        if selectors.is_empty() || selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(EngineError::MissingArgument("selectors".to_string()));
        }

        let unique: Vec<&String> = dedup(selectors);
        let deadline = Instant::now() + policy.timeout;

        loop {
            if self.cancel.is_cancelled() {
                return Err(EngineError::Cancelled(selectors.join(", ")));
            }

            let snapshot = self.snapshot(&unique, spec, frame).await;
            if satisfied(spec, &snapshot, unique.len()) {
                debug!(
                    matched = snapshot.handles.len(),
                    selectors = snapshot.selectors.len(),
                    "quorum satisfied"
                );
                let selected = spec
                    .index
                    .and_then(|i| snapshot.handles.get(i).copied());
                return Ok(QuorumMatch {
                    handles: snapshot.handles,
                    selectors: snapshot.selectors,
                    selected,
                });
            }

            if Instant::now() >= deadline {
                warn!(
                    selectors = %selectors.join(", "),
                    timeout_ms = policy.timeout.as_millis() as u64,
                    "quorum wait timed out"
                );
                return Err(EngineError::NoMatchingElements {
                    selectors: selectors.to_vec(),
                });
            }

            sleep(policy.retry_interval).await;
        }
    }

    /// One poll cycle: the de-duplicated matching elements and the
    /// selectors (input order) that matched at least one element.
    async fn snapshot(
        &self,
        unique: &[&String],
        spec: &QuorumSpec,
        frame: Option<&FrameRef>,
    ) -> QuorumMatch {
        let mut handles: Vec<ElementHandle> = Vec::new();
        let mut matched_selectors: Vec<String> = Vec::new();

        for selector in unique {
            let mut any = false;
            for handle in self.provider.query_all(selector, frame).await {
                if let Some(needle) = &spec.text {
                    let rendered = self.provider.text(handle).await.unwrap_or_default();
                    if !rendered.contains(needle.as_str()) {
                        continue;
                    }
                }
                any = true;
                if !handles.contains(&handle) {
                    handles.push(handle);
                }
            }
            if any {
                matched_selectors.push((*selector).clone());
            }
        }

        QuorumMatch {
            handles,
            selectors: matched_selectors,
            selected: None,
        }
    }
}

fn dedup(selectors: &[String]) -> Vec<&String> {
    let mut unique: Vec<&String> = Vec::new();
    for s in selectors {
        if !unique.contains(&s) {
            unique.push(s);
        }
    }
    unique
}

fn satisfied(spec: &QuorumSpec, snapshot: &QuorumMatch, selector_count: usize) -> bool {
    if spec.present {
        let base = if spec.match_all {
            snapshot.selectors.len() == selector_count
        } else {
            !snapshot.selectors.is_empty()
        };
        let count_ok = spec.count.map_or(true, |c| snapshot.handles.len() == c);
        let index_ok = spec.index.map_or(true, |i| snapshot.handles.len() > i);
        base && count_ok && index_ok
    } else if spec.match_all {
        snapshot.handles.is_empty()
    } else {
        snapshot.selectors.len() < selector_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagepilot_dom_port::{FakeDom, FakeElement};
    use std::time::Duration;

    fn wait_engine(dom: &Arc<FakeDom>) -> WaitEngine {
        WaitEngine::new(dom.clone(), CancellationToken::new())
    }

    fn policy(timeout_ms: u64, interval_ms: u64) -> WaitPolicy {
        WaitPolicy::new(
            Duration::from_millis(interval_ms),
            Duration::from_millis(timeout_ms),
        )
    }

    #[tokio::test]
    async fn returns_immediately_when_present() {
        let dom = Arc::new(FakeDom::new());
        let handle = dom.insert(FakeElement::new("#ready"));
        let waits = wait_engine(&dom);

        let found = waits
            .await_element(&Target::from("#ready"), 0, None, policy(1000, 200))
            .await
            .unwrap();
        assert_eq!(found, handle);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_respects_lower_and_upper_bound() {
        let dom = Arc::new(FakeDom::new());
        let waits = wait_engine(&dom);

        let start = Instant::now();
        let err = waits
            .await_element(&Target::from("#never"), 0, None, policy(1000, 200))
            .await
            .unwrap_err();
        let elapsed = start.elapsed();

        assert_eq!(err, EngineError::not_found("#never"));
        assert!(elapsed >= Duration::from_millis(1000), "failed too early");
        assert!(elapsed <= Duration::from_millis(1200), "failed too late");
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_once_element_appears() {
        let dom = Arc::new(FakeDom::new());
        let waits = wait_engine(&dom);

        let insert_dom = dom.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(600)).await;
            insert_dom.insert(FakeElement::new("#late"));
        });

        let found = waits
            .await_element(&Target::from("#late"), 0, None, policy(3000, 200))
            .await;
        assert!(found.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn exists_converts_timeout_to_false() {
        let dom = Arc::new(FakeDom::new());
        let waits = wait_engine(&dom);

        let exists = waits
            .element_exists(&Target::from("#ghost"), 0, None, policy(400, 200))
            .await
            .unwrap();
        assert!(!exists);

        dom.insert(FakeElement::new("#real"));
        let exists = waits
            .element_exists(&Target::from("#real"), 0, None, policy(400, 200))
            .await
            .unwrap();
        assert!(exists);
    }

    #[tokio::test(start_paused = true)]
    async fn text_wait_follows_updates() {
        let dom = Arc::new(FakeDom::new());
        let handle = dom.insert(FakeElement::new("#status").with_text("loading"));
        let waits = wait_engine(&dom);

        let update_dom = dom.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(400)).await;
            update_dom.set_text(handle, "loading done");
        });

        let found = waits
            .await_text(&Target::from("#status"), 0, None, "done", policy(3000, 200))
            .await
            .unwrap();
        assert_eq!(found, handle);
    }

    #[tokio::test(start_paused = true)]
    async fn text_wait_times_out_with_text_in_error() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new("#status").with_text("loading"));
        let waits = wait_engine(&dom);

        let err = waits
            .await_text(&Target::from("#status"), 0, None, "done", policy(400, 200))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::text_not_found("#status", "done"));
    }

    #[tokio::test]
    async fn blank_selector_fails_before_polling() {
        let dom = Arc::new(FakeDom::new());
        let waits = wait_engine(&dom);

        let err = waits
            .await_element(&Target::from("   "), 0, None, policy(1000, 200))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::MissingArgument("selector".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_beats_the_deadline() {
        let dom = Arc::new(FakeDom::new());
        let cancel = CancellationToken::new();
        let waits = WaitEngine::new(dom.clone(), cancel.clone());

        let canceller = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(300)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let err = waits
            .await_element(&Target::from("#never"), 0, None, policy(10_000, 200))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Cancelled(_)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn quorum_match_all_waits_for_every_selector() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new("a.foo"));
        let waits = wait_engine(&dom);

        let selectors = vec!["a.foo".to_string(), "b.bar".to_string()];

        // not satisfied yet: .bar is missing
        let insert_dom = dom.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(800)).await;
            insert_dom.insert(FakeElement::new("b.bar"));
        });

        let start = Instant::now();
        let matched = waits
            .await_elements(&selectors, &QuorumSpec::all_present(), None, policy(5000, 200))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(800));
        assert_eq!(matched.selectors, selectors);
        assert_eq!(matched.handles.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn absence_wait_resolves_when_matches_vanish() {
        let dom = Arc::new(FakeDom::new());
        let first = dom.insert(FakeElement::new(".spinner"));
        let second = dom.insert(FakeElement::new(".spinner"));
        let waits = wait_engine(&dom);

        let remove_dom = dom.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(400)).await;
            remove_dom.remove(first);
            sleep(Duration::from_millis(400)).await;
            remove_dom.remove(second);
        });

        let selectors = vec![".spinner".to_string()];
        let start = Instant::now();
        let matched = waits
            .await_elements(&selectors, &QuorumSpec::all_absent(), None, policy(5000, 200))
            .await
            .unwrap();

        // only once both elements are gone
        assert!(start.elapsed() >= Duration::from_millis(800));
        assert!(matched.handles.is_empty());
        assert!(matched.selectors.is_empty());
    }

    #[tokio::test]
    async fn quorum_count_must_match_exactly() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new(".item"));
        dom.insert(FakeElement::new(".item"));
        let waits = wait_engine(&dom);

        let selectors = vec![".item".to_string()];
        let matched = waits
            .await_elements(
                &selectors,
                &QuorumSpec::all_present().with_count(2),
                None,
                policy(400, 100),
            )
            .await
            .unwrap();
        assert_eq!(matched.handles.len(), 2);

        let err = waits
            .await_elements(
                &selectors,
                &QuorumSpec::all_present().with_count(3),
                None,
                policy(400, 100),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::NoMatchingElements {
                selectors: selectors.clone()
            }
        );
        assert_eq!(err.to_string(), "No matching elements found");
    }

    #[tokio::test]
    async fn quorum_index_selects_ordinal() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new(".item"));
        let second = dom.insert(FakeElement::new(".item"));
        let waits = wait_engine(&dom);

        let matched = waits
            .await_elements(
                &[".item".to_string()],
                &QuorumSpec::all_present().with_index(1),
                None,
                policy(400, 100),
            )
            .await
            .unwrap();
        assert_eq!(matched.selected, Some(second));
    }

    #[tokio::test]
    async fn quorum_text_filter_gates_matches() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new(".label").with_text("alpha"));
        dom.insert(FakeElement::new(".label").with_text("beta"));
        let waits = wait_engine(&dom);

        let matched = waits
            .await_elements(
                &[".label".to_string()],
                &QuorumSpec::all_present().with_text("beta"),
                None,
                policy(400, 100),
            )
            .await
            .unwrap();
        assert_eq!(matched.handles.len(), 1);

        let err = waits
            .await_elements(
                &[".label".to_string()],
                &QuorumSpec::all_present().with_text("gamma"),
                None,
                policy(400, 100),
            )
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn quorum_any_mode_accepts_partial_matches() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new(".present"));
        let waits = wait_engine(&dom);

        let selectors = vec![".present".to_string(), ".missing".to_string()];
        let matched = waits
            .await_elements(
                &selectors,
                &QuorumSpec::any_present(),
                None,
                policy(400, 100),
            )
            .await
            .unwrap();
        assert_eq!(matched.selectors, vec![".present".to_string()]);
    }

    #[tokio::test]
    async fn quorum_preserves_caller_selector_order() {
        let dom = Arc::new(FakeDom::new());
        dom.insert(FakeElement::new(".one"));
        dom.insert(FakeElement::new(".two"));
        let waits = wait_engine(&dom);

        let forward = vec![".one".to_string(), ".two".to_string()];
        let matched = waits
            .await_elements(&forward, &QuorumSpec::all_present(), None, policy(400, 100))
            .await
            .unwrap();
        assert_eq!(matched.selectors, forward);

        let reverse = vec![".two".to_string(), ".one".to_string()];
        let matched = waits
            .await_elements(&reverse, &QuorumSpec::all_present(), None, policy(400, 100))
            .await
            .unwrap();
        assert_eq!(matched.selectors, reverse);
    }
}
