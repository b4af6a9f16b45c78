//! Engine instance: owns the pointer state and the cancellation token

use std::sync::Arc;

use pagepilot_dom_port::{DocumentProvider, ElementHandle, Point};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::errors::EngineError;
use crate::pointer::{NullPointerSink, PointerController, PointerSink};
use crate::resolver::Target;
use crate::types::{EngineConfig, QuorumMatch, QuorumSpec, WaitOpts, WaitPolicy};
use crate::waiting::WaitEngine;

/// The element interaction engine.
///
/// One instance per document session. Pointer position is instance state
/// behind an async mutex, so concurrent pointer actions on the same engine
/// serialize rather than interleave their travel. All waits and actions
/// observe the instance's cancellation token at their poll boundaries.
pub struct Engine {
    pub(crate) provider: Arc<dyn DocumentProvider>,
    pub(crate) waits: WaitEngine,
    pub(crate) pointer: Mutex<PointerController>,
    pub(crate) config: EngineConfig,
    pub(crate) cancel: CancellationToken,
}

impl Engine {
    pub fn new(provider: Arc<dyn DocumentProvider>) -> Self {
        Self::with_sink(provider, EngineConfig::default(), Arc::new(NullPointerSink))
    }

    pub fn with_config(provider: Arc<dyn DocumentProvider>, config: EngineConfig) -> Self {
        Self::with_sink(provider, config, Arc::new(NullPointerSink))
    }

    /// Attach a presentation layer that renders pointer travel and pulses.
    pub fn with_sink(
        provider: Arc<dyn DocumentProvider>,
        config: EngineConfig,
        sink: Arc<dyn PointerSink>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let waits = WaitEngine::new(provider.clone(), cancel.clone());
        let pointer = Mutex::new(PointerController::new(config.tempo.pointer_travel, sink));
        Self {
            provider,
            waits,
            pointer,
            config,
            cancel,
        }
    }

    /// Token shared by every wait and action on this instance. Cancelling it
    /// makes in-flight operations fail with [`EngineError::Cancelled`] at
    /// their next poll boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn wait_policy(&self, requested: Option<WaitPolicy>) -> WaitPolicy {
        requested.unwrap_or(self.config.short_wait)
    }

    // Waits ----------------------------------------------------------------

    /// Wait for a single element to appear.
    pub async fn await_element(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let target = target.into();
        self.waits
            .await_element(
                &target,
                opts.index,
                opts.frame.as_ref(),
                self.wait_policy(opts.policy),
            )
            .await
    }

    /// Whether the target appears within the wait deadline. The only
    /// speculative probe; absence is `false`, not an error.
    pub async fn element_exists(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<bool, EngineError> {
        let target = target.into();
        self.waits
            .element_exists(
                &target,
                opts.index,
                opts.frame.as_ref(),
                self.wait_policy(opts.policy),
            )
            .await
    }

    /// Wait until the target's rendered text contains `text`.
    pub async fn await_text(
        &self,
        target: impl Into<Target>,
        text: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let target = target.into();
        self.waits
            .await_text(
                &target,
                opts.index,
                opts.frame.as_ref(),
                text,
                self.wait_policy(opts.policy),
            )
            .await
    }

    /// Multi-selector quorum wait (see [`QuorumSpec`] for the satisfaction
    /// rules).
    pub async fn await_elements<I, S>(
        &self,
        selectors: I,
        spec: &QuorumSpec,
        opts: WaitOpts,
    ) -> Result<QuorumMatch, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selectors: Vec<String> = selectors.into_iter().map(Into::into).collect();
        self.waits
            .await_elements(
                &selectors,
                spec,
                opts.frame.as_ref(),
                self.wait_policy(opts.policy),
            )
            .await
    }

    // Pointer --------------------------------------------------------------

    /// Move the pointer to `point`. Suspends until the travel animation has
    /// fully played; with animation off the position commits immediately.
    pub async fn move_to(&self, point: Point, animate: bool) {
        let animate = animate && self.config.animations;
        self.pointer.lock().await.move_to(point, animate).await;
    }

    /// Move the pointer to the visual center of the viewport.
    pub async fn home(&self, animate: bool) {
        let center = self.provider.viewport().await.center();
        info!(x = center.x, y = center.y, "pointer homing");
        self.move_to(center, animate).await;
    }

    /// The engine's believed pointer position, updated only after completed
    /// moves.
    pub async fn pointer_position(&self) -> Point {
        self.pointer.lock().await.position()
    }
}
