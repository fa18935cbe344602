//! egui integration for RingDial pickers.
//!
//! - **Dial**: [`RadialDial`], a widget that drives a [`RadialPicker`] from
//!   egui pointer input and paints it
//! - **Colors**: conversions from picker colors to egui colors
//!
//! [`RadialPicker`]: ringdial_core::RadialPicker

pub mod colors;
pub mod dial;

pub use colors::{arc_color32, color32, shadow_color32};
pub use dial::{RadialDial, surface_mapping, to_point, to_pos2, view_side};

/// Standard sizing constants used by the dial.
pub mod sizing {
    /// Smallest side the dial allocates when space is tight.
    pub const MIN_SIDE: f32 = 96.0;
    /// Default side when the caller gives none.
    pub const DEFAULT_SIDE: f32 = 240.0;
    /// Readout font size relative to the dial side.
    pub const READOUT_SCALE: f32 = 0.16;
    /// Largest angle, in radians, between two arc sample points.
    pub const ARC_SAMPLE_STEP: f64 = 0.05;
}

/// Standard colors used by the dial.
pub mod theme {
    use egui::Color32;

    /// Track color (middle of the markup gradient)
    pub const TRACK: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
}
