//! Picker colors as egui colors.

use egui::Color32;
use ringdial_core::PickerColor;
use ringdial_core::render::style;

/// Opaque egui color for a picker color.
pub fn color32(color: PickerColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// The translucent color used for the progress arc.
pub fn arc_color32(color: PickerColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha(style::ARC_OPACITY))
}

/// The faint color used for the track shadow.
pub fn shadow_color32() -> Color32 {
    Color32::from_rgba_unmultiplied(0xbb, 0xbb, 0xbb, alpha(style::SHADOW_OPACITY))
}

fn alpha(opacity: f64) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}
