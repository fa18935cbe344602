//! RingDial Core Library
//!
//! Platform-agnostic geometry, state and interaction model for radial value
//! pickers. Nothing in this crate touches a rendering environment: pickers
//! produce [`RenderCommand`]s that adapters apply.

pub mod config;
pub mod container;
pub mod geometry;
pub mod input;
pub mod picker;
pub mod render;
pub mod subscription;

pub use config::{ConfigError, ConfigResult, PickerColor, PickerConfig, ValidatedConfig};
pub use container::{Container, Dispatch, DrawingSurface, ReadoutArea};
pub use geometry::{ArcPath, ValueRange, PROGRESS_EPSILON, START_ANGLE};
pub use input::{PointerEvent, PointerKind, RawPointer, SurfaceMapping, extract_position};
pub use picker::{DragPhase, EventOutcome, Part, PickerId, PickerState, RadialPicker};
pub use render::{PickerVisuals, RenderCommand, format_value};
pub use subscription::{DragSubscription, InputSurface};
