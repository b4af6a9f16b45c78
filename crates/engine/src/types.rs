//! Configuration types for engine operations
//!
//! Every operation takes an explicit options struct with documented
//! defaults; nothing is ambient except the engine-level [`EngineConfig`].

use std::time::Duration;

use pagepilot_dom_port::{ElementHandle, FrameRef};
use serde::{Deserialize, Serialize};

/// Timeout policy for a polling wait.
///
/// Two named presets exist: [`WaitPolicy::short`] for fast UI feedback
/// (existence checks, accessor waits) and [`WaitPolicy::long`] for
/// page-load-dependent waits. An operation given no policy falls back to a
/// named default, never to "wait forever".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Spacing between poll cycles.
    pub retry_interval: Duration,

    /// Absolute deadline, measured from wait start.
    pub timeout: Duration,
}

impl WaitPolicy {
    pub fn new(retry_interval: Duration, timeout: Duration) -> Self {
        Self {
            retry_interval,
            timeout,
        }
    }

    /// Fast UI feedback: 200ms polls, 3s deadline.
    pub fn short() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_secs(3))
    }

    /// Page-load-dependent waits: 200ms polls, 30s deadline.
    pub fn long() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_secs(30))
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::short()
    }
}

/// Success condition for a multi-selector quorum wait.
///
/// The default spec waits for every selector in the set to match at least
/// one element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumSpec {
    /// Wait for elements to be present (`true`) or absent (`false`).
    pub present: bool,

    /// With `present`: every selector must match at least one element;
    /// otherwise one match across the set suffices. Inverted for absence
    /// waits: `true` waits for zero matching elements, `false` for fewer
    /// matching selectors than the set holds.
    pub match_all: bool,

    /// Total matched-element count must equal exactly this value.
    pub count: Option<usize>,

    /// Require at least `index + 1` matched elements; the element at this
    /// ordinal is reported as the selected match.
    pub index: Option<usize>,

    /// Substring an element's rendered text must contain before it counts
    /// as a match.
    pub text: Option<String>,
}

impl Default for QuorumSpec {
    fn default() -> Self {
        Self {
            present: true,
            match_all: true,
            count: None,
            index: None,
            text: None,
        }
    }
}

impl QuorumSpec {
    /// Presence wait over the whole selector set.
    pub fn all_present() -> Self {
        Self::default()
    }

    /// Presence wait satisfied by any one selector.
    pub fn any_present() -> Self {
        Self {
            match_all: false,
            ..Self::default()
        }
    }

    /// Absence wait: resolves once no selector matches anything.
    pub fn all_absent() -> Self {
        Self {
            present: false,
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Retry budget for the stability-gated action protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryBudget {
    /// How many times a moved target may be re-measured before the action
    /// fails with `TargetUnstable`.
    pub max_retries: u32,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Timing profile for pointer travel and settle delays.
///
/// Settle delays approximate completion of operations (scrolling, layout)
/// that expose no reliable completion signal. Disabling animation on an
/// action skips every delay in this profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempo {
    /// Duration of an animated pointer move.
    pub pointer_travel: Duration,

    /// Settle after pointer arrival, before re-measuring coordinates.
    pub pre_action_settle: Duration,

    /// Settle after requesting a smooth scroll-into-view.
    pub scroll_settle: Duration,

    /// Duration of the click-affordance pulse.
    pub click_pulse: Duration,

    /// UI settle after a dispatched click.
    pub post_click: Duration,

    /// UI settle after moving focus.
    pub post_focus: Duration,

    /// Settle between assigning a value and dispatching notifications.
    pub post_fill: Duration,

    /// Settle between mutating a selection and dispatching `Change`.
    pub post_select: Duration,
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            pointer_travel: Duration::from_millis(300),
            pre_action_settle: Duration::from_millis(250),
            scroll_settle: Duration::from_millis(500),
            click_pulse: Duration::from_millis(200),
            post_click: Duration::from_millis(500),
            post_focus: Duration::from_millis(300),
            post_fill: Duration::from_millis(200),
            post_select: Duration::from_millis(200),
        }
    }
}

/// Engine-level configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default policy for element waits and accessor waits.
    pub short_wait: WaitPolicy,

    /// Policy for page-load-dependent waits; callers opt in per operation.
    pub long_wait: WaitPolicy,

    /// Default retry budget for stability-gated actions.
    pub retry_budget: RetryBudget,

    /// Timing profile for pointer travel and settle delays.
    pub tempo: Tempo,

    /// Global animation switch. When off, every action skips pointer
    /// travel, pulses and settle delays regardless of per-call flags.
    pub animations: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_wait: WaitPolicy::short(),
            long_wait: WaitPolicy::long(),
            retry_budget: RetryBudget::default(),
            tempo: Tempo::default(),
            animations: true,
        }
    }
}

/// Options for wait operations and accessors.
#[derive(Clone, Debug, Default)]
pub struct WaitOpts {
    /// Ordinal of the match to return when the selector matches several
    /// elements.
    pub index: usize,

    /// Nested frame to scope the query to.
    pub frame: Option<FrameRef>,

    /// Overrides the engine's short-wait default.
    pub policy: Option<WaitPolicy>,
}

impl WaitOpts {
    pub fn index(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn in_frame(frame: FrameRef) -> Self {
        Self {
            frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn with_policy(policy: WaitPolicy) -> Self {
        Self {
            policy: Some(policy),
            ..Self::default()
        }
    }
}

/// Options for pointer actions.
#[derive(Clone, Debug)]
pub struct ActionOpts {
    /// Ordinal of the match to act on.
    pub index: usize,

    /// Nested frame the target lives in; its offset is applied to the
    /// pointer travel coordinates.
    pub frame: Option<FrameRef>,

    /// Per-call animation flag, combined with the engine's global switch.
    pub animate: bool,

    /// Overrides the engine's short-wait default for the resolution wait.
    pub policy: Option<WaitPolicy>,

    /// Overrides the engine's default retry budget.
    pub retry: Option<RetryBudget>,
}

impl Default for ActionOpts {
    fn default() -> Self {
        Self {
            index: 0,
            frame: None,
            animate: true,
            policy: None,
            retry: None,
        }
    }
}

impl ActionOpts {
    /// Perform the action without pointer travel or settle delays.
    pub fn instant() -> Self {
        Self {
            animate: false,
            ..Self::default()
        }
    }

    pub fn in_frame(frame: FrameRef) -> Self {
        Self {
            frame: Some(frame),
            ..Self::default()
        }
    }

    pub(crate) fn wait_opts(&self) -> WaitOpts {
        WaitOpts {
            index: self.index,
            frame: self.frame.clone(),
            policy: self.policy,
        }
    }
}

/// Selection criteria for `select`. Exactly one of the three modes must be
/// supplied; `value` wins over `index` wins over `label` if several are.
#[derive(Clone, Debug, Default)]
pub struct SelectOpts {
    /// Select the option whose `value` attribute equals this string.
    pub value: Option<String>,

    /// Select the option at this ordinal.
    pub index: Option<usize>,

    /// Select the first option whose visible label is a case-sensitive
    /// exact match.
    pub label: Option<String>,
}

impl SelectOpts {
    pub fn by_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn by_index(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn by_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }
}

/// Result of a satisfied quorum wait: the de-duplicated matched elements,
/// the selectors that matched (input order preserved), and the element at
/// the requested ordinal when [`QuorumSpec::index`] was set. An absence
/// wait resolves with empty sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuorumMatch {
    pub handles: Vec<ElementHandle>,
    pub selectors: Vec<String>,
    pub selected: Option<ElementHandle>,
}
