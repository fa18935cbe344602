//! Render commands: the pure output of a picker.
//!
//! [`PickerVisuals`] is decided once when a picker is mounted; a
//! [`RenderCommand`] is produced for every value change and carries the
//! handle position, arc and readout together so adapters update all three at
//! once.

use kurbo::{Point, Size};
use serde::Serialize;

use crate::config::PickerColor;
use crate::geometry::ArcPath;
use crate::picker::{PickerId, PickerState};

/// Cosmetic constants shared by all adapters.
pub mod style {
    /// Track gradient, top-left to bottom-right.
    pub const TRACK_GRADIENT: [&str; 2] = ["#eee", "#ccc"];
    /// Drop shadow under the track.
    pub const SHADOW_COLOR: &str = "#bbb";
    pub const SHADOW_OPACITY: f64 = 0.4;
    pub const SHADOW_STD_DEVIATION: f64 = 3.0;
    /// Opacity of the progress arc stroke.
    pub const ARC_OPACITY: f64 = 0.7;
    /// Track stroke width bounds and scale relative to the container.
    pub const TRACK_WIDTH_MIN: f64 = 6.0;
    pub const TRACK_WIDTH_MAX: f64 = 25.0;
    /// Handle radius bounds.
    pub const HANDLE_RADIUS_MIN: f64 = 8.0;
    pub const HANDLE_RADIUS_MAX: f64 = 30.0;
    pub const SIZE_FACTOR: f64 = 0.03;
    /// Readout text.
    pub const READOUT_FONT_FAMILY: &str = "Arial, sans-serif";
    pub const READOUT_FONT_SIZE: &str = "3rem";
}

/// Per-instance visuals decided at mount time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerVisuals {
    pub picker: PickerId,
    pub color: PickerColor,
    pub center: Point,
    pub radius: f64,
    pub track_width: f64,
    pub handle_radius: f64,
    /// Id of the track gradient, unique per instance.
    pub gradient_id: String,
    /// Id of the drop shadow filter, unique per instance.
    pub filter_id: String,
    /// Readout width in `ch` units.
    pub readout_width_ch: usize,
}

impl PickerVisuals {
    pub fn new(picker: PickerId, state: &PickerState, color: PickerColor, container: Size) -> Self {
        let scaled = (container.width * style::SIZE_FACTOR).min(container.height * style::SIZE_FACTOR);
        let suffix = picker.simple();

        Self {
            picker,
            color,
            center: state.center(),
            radius: state.radius(),
            track_width: scaled.min(style::TRACK_WIDTH_MAX).max(style::TRACK_WIDTH_MIN),
            handle_radius: scaled.min(style::HANDLE_RADIUS_MAX).max(style::HANDLE_RADIUS_MIN),
            gradient_id: format!("trackGradient-slider-{suffix}"),
            filter_id: format!("glow-slider-{suffix}"),
            readout_width_ch: format_value(state.range().max()).len() + 1,
        }
    }
}

/// One atomic visual update for a picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCommand {
    pub picker: PickerId,
    pub value: f64,
    pub progress: f64,
    /// Handle center in surface coordinates.
    pub handle: Point,
    pub arc: ArcPath,
    /// SVG path data for `arc`.
    pub arc_d: String,
    /// Text for the value readout.
    pub readout: String,
}

impl RenderCommand {
    /// Render `state` for the picker `picker`.
    pub fn new(picker: PickerId, state: &PickerState) -> Self {
        let arc = state.arc_path();
        Self {
            picker,
            value: state.value(),
            progress: state.progress(),
            handle: state.handle_position(),
            arc_d: arc.to_svg_d(),
            arc,
            readout: format_value(state.value()),
        }
    }
}

/// Plain numeric text for a value: no grouping, no trailing `.0`.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ValueRange;
    use uuid::Uuid;

    fn state(value: f64) -> PickerState {
        let range = ValueRange::new(0.0, 100.0, 1.0).unwrap();
        let mut state = PickerState::new(range, 80.0, Point::new(100.0, 100.0));
        state.set_value(value);
        state
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(70.0), "70");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(-12.5), "-12.5");
        assert_eq!(format_value(1000000.0), "1000000");
    }

    #[test]
    fn test_command_at_min() {
        let id = Uuid::new_v4();
        let command = RenderCommand::new(id, &state(0.0));
        assert_eq!(command.picker, id);
        assert_eq!(command.readout, "0");
        assert!(command.arc.is_empty());
        assert_eq!(command.arc_d, "");
        assert!((command.handle.x - 100.0).abs() < 1e-9);
        assert!((command.handle.y - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_command_at_max() {
        let command = RenderCommand::new(Uuid::new_v4(), &state(100.0));
        assert_eq!(command.readout, "100");
        assert!(command.arc.is_full());
        assert_eq!(command.arc_d.matches(" A ").count(), 2);
    }

    #[test]
    fn test_visuals_sizes_from_container() {
        let s = state(0.0);
        let small = PickerVisuals::new(Uuid::new_v4(), &s, PickerColor::BLACK, Size::new(100.0, 100.0));
        assert_eq!(small.track_width, 6.0);
        assert_eq!(small.handle_radius, 8.0);

        let medium = PickerVisuals::new(Uuid::new_v4(), &s, PickerColor::BLACK, Size::new(600.0, 400.0));
        assert!((medium.track_width - 12.0).abs() < 1e-9);
        assert!((medium.handle_radius - 12.0).abs() < 1e-9);

        let huge = PickerVisuals::new(Uuid::new_v4(), &s, PickerColor::BLACK, Size::new(5000.0, 5000.0));
        assert_eq!(huge.track_width, 25.0);
        assert_eq!(huge.handle_radius, 30.0);
    }

    #[test]
    fn test_visuals_ids_unique() {
        let s = state(0.0);
        let size = Size::new(200.0, 200.0);
        let a = PickerVisuals::new(Uuid::new_v4(), &s, PickerColor::BLACK, size);
        let b = PickerVisuals::new(Uuid::new_v4(), &s, PickerColor::BLACK, size);
        assert_ne!(a.gradient_id, b.gradient_id);
        assert_ne!(a.filter_id, b.filter_id);
        assert_eq!(a.readout_width_ch, 4);
    }

    #[test]
    fn test_command_serializes() {
        let command = RenderCommand::new(Uuid::new_v4(), &state(25.0));
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["readout"], "25");
        assert_eq!(json["arc"]["kind"], "partial");
        assert_eq!(json["arc"]["largeArc"], false);
    }
}
