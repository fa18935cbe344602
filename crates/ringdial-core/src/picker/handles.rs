//! Interactive parts of a picker and hit testing.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use super::state::PickerState;
use crate::geometry::START_ANGLE;
use crate::render::PickerVisuals;
use std::f64::consts::TAU;

/// The part of a picker under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Part {
    /// The draggable handle.
    Handle,
    /// The progress arc (clickable).
    Arc,
    /// The background track (clickable).
    Track,
}

impl Part {
    /// Whether clicking this part sets the value.
    pub fn is_clickable(self) -> bool {
        matches!(self, Part::Arc | Part::Track)
    }
}

/// Find the topmost part at `position`, growing every part by `tolerance`.
///
/// The handle is drawn above the arc, and the arc above the track.
pub fn hit_test(
    state: &PickerState,
    visuals: &PickerVisuals,
    position: Point,
    tolerance: f64,
) -> Option<Part> {
    if position.distance(state.handle_position()) <= visuals.handle_radius + tolerance {
        return Some(Part::Handle);
    }

    let distance = position.distance(state.center());
    if (distance - state.radius()).abs() > visuals.track_width / 2.0 + tolerance {
        return None;
    }

    let sweep = state.progress() * TAU;
    let on_arc = state.angle_to(position).is_some_and(|angle| {
        (angle - START_ANGLE).rem_euclid(TAU) <= sweep
    });
    Some(if on_arc { Part::Arc } else { Part::Track })
}
