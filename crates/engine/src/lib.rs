//! Element interaction engine
//!
//! Drives a simulated human operator inside a web document:
//! - Selector resolution with explicit ordinal indexing
//! - Deadline-bounded polling waits, including multi-selector quorum waits
//! - A pointer controller that animates visible travel between targets
//! - A stability-gated action protocol (click/focus/fill/select/check) that
//!   retries when the target element shifts mid-interaction
//!
//! All targeting is selector- or handle-based; the document itself is only
//! reachable through the [`DocumentProvider`] capability boundary.
//!
//! [`DocumentProvider`]: pagepilot_dom_port::DocumentProvider

mod accessors;
mod actions;
mod engine;
pub mod errors;
mod pointer;
mod resolver;
pub mod types;
mod waiting;

pub use engine::Engine;
pub use errors::EngineError;
pub use pointer::{NullPointerSink, PointerSink};
pub use resolver::{Resolver, Target};
pub use types::*;
