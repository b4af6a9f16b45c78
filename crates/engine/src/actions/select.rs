//! Select action: choose an option by value, ordinal or label

use pagepilot_dom_port::{DomEvent, ElementHandle, SelectOption};
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::{ActionOpts, SelectOpts};

impl Engine {
    /// Select an option of a select control.
    ///
    /// Exactly one selection mode is expected; supplying none fails with
    /// [`EngineError::InvalidSelection`] before any DOM interaction. When a
    /// supplied criterion matches no option the selection is left unchanged;
    /// `Change` still fires so listeners observe the attempt.
    pub async fn select(
        &self,
        target: impl Into<Target>,
        selection: SelectOpts,
        opts: ActionOpts,
    ) -> Result<ElementHandle, EngineError> {
        if selection.value.is_none() && selection.index.is_none() && selection.label.is_none() {
            return Err(EngineError::InvalidSelection);
        }

        let target = target.into();
        let action_id = Uuid::new_v4();
        let animate = opts.animate && self.config.animations;
        info!(
            action_id = %action_id,
            target = %target.describe(),
            animate = animate,
            "select"
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

        let options = self.provider.options(handle).await;
        match matching_ordinal(&options, &selection) {
            Some(ordinal) => {
                self.provider.set_selected_index(handle, ordinal).await;
            }
            None => {
                debug!(
                    action_id = %action_id,
                    target = %target.describe(),
                    "no option matched the selection, leaving control unchanged"
                );
            }
        }
        if animate {
            sleep(self.config.tempo.post_select).await;
        }
        self.provider.dispatch(handle, DomEvent::Change).await;
        Ok(handle)
    }
}

/// Which option the selection refers to. Value wins over index wins over
/// label when several modes are supplied.
fn matching_ordinal(options: &[SelectOption], selection: &SelectOpts) -> Option<usize> {
    if let Some(value) = &selection.value {
        options.iter().position(|o| o.value == *value)
    } else if let Some(index) = selection.index {
        (index < options.len()).then_some(index)
    } else if let Some(label) = &selection.label {
        options.iter().position(|o| o.label == *label)
    } else {
        None
    }
}
