//! Fill action: focus, assign a value, notify the page

use pagepilot_dom_port::{DomEvent, ElementHandle};
use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::ActionOpts;

impl Engine {
    /// Fill a form control with `value`.
    ///
    /// Steps:
    /// 1. Resolve the target (through the stability gate when animated).
    /// 2. Focus the control (animated fills only) and assign the value
    ///    directly; instant fills skip focus and set the value right away.
    /// 3. Dispatch `Input` with the reactive-framework override, then
    ///    `Change`. Both fire even with animation off; pages listening for
    ///    either must observe the update.
    ///
    /// An empty `value` is a legitimate fill (clearing the control).
    pub async fn fill(
        &self,
        target: impl Into<Target>,
        value: &str,
        opts: ActionOpts,
    ) -> Result<ElementHandle, EngineError> {
        let target = target.into();
        let action_id = Uuid::new_v4();
        let animate = opts.animate && self.config.animations;
        info!(
            action_id = %action_id,
            target = %target.describe(),
            chars = value.len(),
            animate = animate,
            "fill"
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

        if animate {
            self.provider.dispatch(handle, DomEvent::Focus).await;
        }
        self.provider.set_value(handle, value).await;
        if animate {
            sleep(self.config.tempo.post_fill).await;
        }
        self.provider
            .dispatch(handle, DomEvent::Input { force_reactive: true })
            .await;
        self.provider.dispatch(handle, DomEvent::Change).await;
        Ok(handle)
    }
}
