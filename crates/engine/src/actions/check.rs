//! Check action: drive a checkbox to a desired state

use pagepilot_dom_port::ElementHandle;
use tracing::{debug, info};

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::ActionOpts;

impl Engine {
    /// Bring a checkbox/radio control to `desired`.
    ///
    /// Idempotent: a control already in the desired state is left untouched
    /// and no click is attempted. Otherwise the control is clicked through
    /// the normal click protocol, which toggles it.
    pub async fn check(
        &self,
        target: impl Into<Target>,
        desired: bool,
        opts: ActionOpts,
    ) -> Result<ElementHandle, EngineError> {
        let target = target.into();
        info!(target = %target.describe(), desired = desired, "check");

        let handle = self
            .waits
            .await_element(
                &target,
                opts.index,
                opts.frame.as_ref(),
                self.wait_policy(opts.policy),
            )
            .await?;

        let current = self.provider.checked(handle).await.unwrap_or(false);
        if current == desired {
            debug!(target = %target.describe(), "already in desired state");
            return Ok(handle);
        }

        self.click(handle, opts).await
    }
}
