//! RingDial Application
//!
//! Application shells for RingDial pickers: a scripted native demo that
//! writes markup, and browser bindings that mount pickers into the DOM.

mod demo;

pub use demo::{DEMO_PICKERS, DEMO_SIDE, Demo, DemoError, on_circle};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{RadialValuePicker, run_wasm};
