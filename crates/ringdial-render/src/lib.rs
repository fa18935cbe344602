//! RingDial Render Library
//!
//! Renderer abstraction and implementations for RingDial pickers.
//! [`SvgRenderer`] writes static markup; the Vello implementation builds a
//! GPU scene.

mod renderer;
pub mod svg;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{PickerSlot, RenderModel, RenderResult, Renderer, RendererError};
pub use svg::{READOUT_CONTAINER_CLASS, SvgRenderer};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{ReadoutLabel, VelloRenderer};
