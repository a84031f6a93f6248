//! Page behavior for a single-page portfolio: scroll reveals, animated
//! counters, navigation highlighting, theme persistence, the contact form,
//! and a handful of visual flourishes.
//!
//! Everything outside `browser` and `frontend` is plain Rust and runs in
//! native tests; those two modules only exist on `wasm32`.

pub mod coalesce;
pub mod config;
pub mod contact;
pub mod counter;
pub mod flourish;
pub mod log;
pub mod mail;
pub mod nav;
pub mod reveal;
pub mod theme;
pub mod typing;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
pub mod frontend;
