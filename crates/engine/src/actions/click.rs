//! Click action

use pagepilot_dom_port::{DomEvent, ElementHandle};
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::ActionOpts;

impl Engine {
    /// Click the target.
    ///
    /// Animated clicks travel the pointer under the stability gate before
    /// dispatching; instant clicks dispatch as soon as the element resolves.
    pub async fn click(
        &self,
        target: impl Into<Target>,
        opts: ActionOpts,
    ) -> Result<ElementHandle, EngineError> {
        let target = target.into();
        let action_id = Uuid::new_v4();
        let animate = opts.animate && self.config.animations;
        info!(
            action_id = %action_id,
            target = %target.describe(),
            animate = animate,
            "click"
        );

        let handle = if animate {
            self.settle_on_target(&target, &opts, &action_id.to_string())
                .await?
        } else {
            self.waits
                .await_element(
                    &target,
                    opts.index,
                    opts.frame.as_ref(),
                    self.wait_policy(opts.policy),
                )
                .await?
        };

        self.provider.dispatch(handle, DomEvent::Click).await;
        if animate {
            sleep(self.config.tempo.post_click).await;
        }
        Ok(handle)
    }
}
