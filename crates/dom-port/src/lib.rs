//! Document provider boundary for the element interaction engine
//!
//! This crate defines the capability interface the engine uses to touch a
//! web document:
//! - Opaque element handles and frame references
//! - Viewport-relative geometry types
//! - The [`DocumentProvider`] trait (query, measure, dispatch, accessors)
//! - An in-memory [`FakeDom`] provider for tests

pub mod fake;
mod provider;
mod types;

pub use fake::{FakeDom, FakeElement};
pub use provider::*;
pub use types::*;
