//! DOM read/write accessors
//!
//! Thin pass-throughs to the provider, fronted by an element wait so a
//! caller reading from a page that is still rendering gets the same
//! deadline semantics as every other operation.

use pagepilot_dom_port::{ElementHandle, FrameRef};

use crate::engine::Engine;
use crate::errors::EngineError;
use crate::resolver::Target;
use crate::types::WaitOpts;

impl Engine {
    async fn awaited(
        &self,
        target: impl Into<Target>,
        opts: &WaitOpts,
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

    /// Rendered text content of the target.
    pub async fn get_text(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<String, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        Ok(self.provider.text(handle).await.unwrap_or_default())
    }

    /// Inner HTML of the target.
    pub async fn get_html(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<String, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        Ok(self.provider.html(handle).await.unwrap_or_default())
    }

    /// Replace the target's rendered text content.
    pub async fn set_text(
        &self,
        target: impl Into<Target>,
        text: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.set_text(handle, text).await;
        Ok(handle)
    }

    /// Replace the target's inner HTML.
    pub async fn set_html(
        &self,
        target: impl Into<Target>,
        html: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.set_html(handle, html).await;
        Ok(handle)
    }

    /// A single attribute value, `None` when the attribute is absent.
    pub async fn get_attribute(
        &self,
        target: impl Into<Target>,
        name: &str,
        opts: WaitOpts,
    ) -> Result<Option<String>, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        Ok(self.provider.attribute(handle, name).await)
    }

    /// All attributes of the target as name/value pairs.
    pub async fn get_attributes(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<Vec<(String, String)>, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        Ok(self.provider.attributes(handle).await)
    }

    /// Set one attribute on the target, adding it when absent.
    pub async fn set_attribute(
        &self,
        target: impl Into<Target>,
        name: &str,
        value: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.set_attribute(handle, name, value).await;
        Ok(handle)
    }

    /// Set several attributes at once; attributes not named keep their
    /// values.
    pub async fn set_attributes(
        &self,
        target: impl Into<Target>,
        attributes: &[(&str, &str)],
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.set_attributes(handle, attributes).await;
        Ok(handle)
    }

    /// Remove one attribute from the target.
    pub async fn remove_attribute(
        &self,
        target: impl Into<Target>,
        name: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.remove_attribute(handle, name).await;
        Ok(handle)
    }

    /// Remove several attributes from the target at once.
    pub async fn remove_attributes(
        &self,
        target: impl Into<Target>,
        names: &[&str],
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.remove_attributes(handle, names).await;
        Ok(handle)
    }

    /// The target's class list.
    pub async fn get_class_list(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<Vec<String>, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        Ok(self.provider.class_list(handle).await)
    }

    /// Replace the target's whole class list.
    pub async fn set_class_list(
        &self,
        target: impl Into<Target>,
        classes: &[&str],
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.set_class_list(handle, classes).await;
        Ok(handle)
    }

    /// Remove every class from the target.
    pub async fn clear_class_list(
        &self,
        target: impl Into<Target>,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.clear_class_list(handle).await;
        Ok(handle)
    }

    /// Add a class to the target's class list.
    pub async fn add_class(
        &self,
        target: impl Into<Target>,
        class: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.add_class(handle, class).await;
        Ok(handle)
    }

    /// Remove a class from the target's class list.
    pub async fn remove_class(
        &self,
        target: impl Into<Target>,
        class: &str,
        opts: WaitOpts,
    ) -> Result<ElementHandle, EngineError> {
        let handle = self.awaited(target, &opts).await?;
        self.provider.remove_class(handle, class).await;
        Ok(handle)
    }

    /// How many elements currently match `selector`. A point-in-time count;
    /// zero is a valid answer, not an error.
    pub async fn element_count(
        &self,
        selector: &str,
        frame: Option<&FrameRef>,
    ) -> Result<usize, EngineError> {
        if selector.trim().is_empty() {
            return Err(EngineError::MissingArgument("selector".to_string()));
        }
        Ok(self.waits.resolver().count(selector, frame).await)
    }
}
