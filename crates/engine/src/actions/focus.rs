//! Focus action

use pagepilot_dom_port::{DomEvent, ElementHandle};
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::ActionOpts;

impl Engine {
    /// Move input focus to the target, with the same stability protection
    /// as [`Engine::click`].
    pub async fn focus(
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
            "focus"
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

        self.provider.dispatch(handle, DomEvent::Focus).await;
        if animate {
            sleep(self.config.tempo.post_focus).await;
        }
        Ok(handle)
    }
}
