//! Browser DOM layer for the duopane markdown editor.
//!
//! Implements the core's `RenderHost` and `StorageBackend` over the DOM and
//! `localStorage`, and wires browser events and timers into an `Editor`.
//! It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `host`: the outer frame, both iframe surfaces and the utility bar
//! - `storage`: `localStorage` backend with an availability probe
//! - `controller`: `BrowserEditor`, the editor plus its DOM listeners and timers
//!
//! # Re-exports
//!
//! This crate re-exports `duopane-core` for convenience, so consumers
//! only need to depend on `duopane-browser`.

// Re-export core crate
pub use duopane_core;
pub use duopane_core::*;

pub mod controller;
pub mod host;
pub mod storage;

pub use controller::{BrowserEditor, InnerEditor};
pub use host::BrowserHost;
pub use storage::LocalStorageBackend;
