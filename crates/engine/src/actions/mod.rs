//! Stability-gated pointer actions
//!
//! Each action resolves its target through the wait engine, travels the
//! pointer there under the stability gate, then commits the native action
//! and its settle delay. Disabling animation (per call or engine-wide)
//! bypasses the gate entirely and acts immediately after resolution.

mod check;
mod click;
mod fill;
mod focus;
mod gate;
mod select;
