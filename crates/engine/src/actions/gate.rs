//! The stability gate: pointer travel with moved-target detection
//!
//! Clicking a target reliably while the page is still laying out means the
//! element can shift between "measured" and "arrived". The gate measures the
//! target's center, travels there, settles, and re-measures; a coordinate
//! mismatch discards the attempt and restarts with a freshly resolved
//! element. Handles are never carried across attempts because the underlying
//! element may have been replaced outright.

use pagepilot_dom_port::{ElementHandle, FrameRef, Point};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::ActionOpts;

impl Engine {
    /// Resolve the target, bring it on-screen, and travel the pointer to it,
    /// retrying while the element keeps moving. Returns the handle the
    /// pointer verifiably rests on, after playing the click-affordance
    /// pulse.
    ///
    /// Steps:
    /// 1. Await the element under the action's wait policy.
    /// 2. If its box is not fully inside the viewport, request a smooth
    ///    scroll-into-view and settle (scrolling has no completion signal).
    /// 3. Up to `max_retries` attempts: re-resolve, measure the center
    ///    (frame offset applied), animate the pointer there, settle,
    ///    re-measure. A mismatch or a stale box burns one attempt.
    /// 4. Stable coordinates: play the pulse and return the handle.
    pub(crate) async fn settle_on_target(
        &self,
        target: &Target,
        opts: &ActionOpts,
        action_id: &str,
    ) -> Result<ElementHandle, EngineError> {
        let policy = self.wait_policy(opts.policy);
        let budget = opts.retry.unwrap_or(self.config.retry_budget);
        let tempo = self.config.tempo;
        let frame = opts.frame.as_ref();

        let handle = self
            .waits
            .await_element(target, opts.index, frame, policy)
            .await?;

        let viewport = self.provider.viewport().await;
        if let Some(rect) = self.provider.bounding_box(handle).await {
            if !viewport.contains(&rect) {
                debug!(
                    action_id = %action_id,
                    target = %target.describe(),
                    "target off-screen, scrolling into view"
                );
                self.provider.scroll_into_view(handle).await;
                sleep(tempo.scroll_settle).await;
            }
        }

        let mut attempts = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return Err(EngineError::Cancelled(target.describe()));
            }

            let handle = self
                .waits
                .resolver()
                .resolve(target, opts.index, frame)
                .await
                .ok_or_else(|| EngineError::not_found(target.describe()))?;

            if let Some(before) = self.measure(handle, frame).await {
                self.pointer.lock().await.move_to(before, true).await;
                sleep(tempo.pre_action_settle).await;

                if self.measure(handle, frame).await == Some(before) {
                    self.pointer.lock().await.pulse(tempo.click_pulse).await;
                    return Ok(handle);
                }
            }

            attempts += 1;
            if attempts >= budget.max_retries {
                warn!(
                    action_id = %action_id,
                    target = %target.describe(),
                    attempts = attempts,
                    "target never held still, giving up"
                );
                return Err(EngineError::TargetUnstable(target.describe()));
            }
            debug!(
                action_id = %action_id,
                attempt = attempts,
                "target moved during pointer travel, retrying"
            );
        }
    }

    /// The element's center in top-level coordinates, or `None` when the
    /// handle went stale mid-attempt.
    async fn measure(&self, handle: ElementHandle, frame: Option<&FrameRef>) -> Option<Point> {
        let center = self.provider.bounding_box(handle).await?.center();
        match frame {
            Some(frame) => Some(center.offset_by(self.provider.frame_offset(frame).await)),
            None => Some(center),
        }
    }
}
