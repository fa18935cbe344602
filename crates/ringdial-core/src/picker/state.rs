//! Picker state and drag phase.

use kurbo::Point;

use crate::geometry::{ArcPath, ValueRange, polar};
use crate::subscription::DragSubscription;

/// The mutable state of one picker.
///
/// `angle` is always derived from `value`, and `center` is fixed when the
/// picker is created.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    range: ValueRange,
    value: f64,
    angle: f64,
    radius: f64,
    center: Point,
    /// Unwrapped pointer progress of the current drag.
    pointer: Option<f64>,
}

impl PickerState {
    /// Create a state resting at `range.min()`.
    pub fn new(range: ValueRange, radius: f64, center: Point) -> Self {
        Self {
            range,
            value: range.min(),
            angle: range.value_to_angle(range.min()),
            radius,
            center,
            pointer: None,
        }
    }

    pub fn range(&self) -> &ValueRange {
        &self.range
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Screen angle of the handle.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn progress(&self) -> f64 {
        self.range.progress(self.value)
    }

    /// Snap `value` onto the step grid and store it. Returns the stored value.
    pub fn set_value(&mut self, value: f64) -> f64 {
        self.pointer = None;
        self.store(self.range.snap(value))
    }

    /// One-shot update from a pointer position (click or tap).
    ///
    /// Returns `None` and leaves the state alone if the position is unusable.
    pub fn set_from_point(&mut self, position: Point) -> Option<f64> {
        let angle = self.angle_to(position)?;
        self.pointer = None;
        Some(self.store(self.range.angle_to_value(angle)))
    }

    /// Continuous update from a pointer position during a drag.
    ///
    /// The value stays pinned at an end while the pointer is past the
    /// 12 o'clock seam, until the pointer crosses back.
    pub fn drag_to_point(&mut self, position: Point) -> Option<f64> {
        let angle = self.angle_to(position)?;
        let previous = self.pointer.unwrap_or_else(|| self.progress());
        let pointer = self.range.drag_progress(previous, angle);
        self.pointer = Some(pointer);
        Some(self.store(self.range.value_at_progress(pointer)))
    }

    /// Forget the pointer of the last drag; the next drag starts from the value.
    pub fn reset_pointer(&mut self) {
        self.pointer = None;
    }

    /// Screen angle from the center to `position`.
    ///
    /// `None` for non-finite positions and for the center itself, where the
    /// angle is undefined.
    pub fn angle_to(&self, position: Point) -> Option<f64> {
        if !position.x.is_finite() || !position.y.is_finite() {
            return None;
        }
        let offset = position - self.center;
        if offset.hypot2() == 0.0 {
            return None;
        }
        Some(offset.atan2())
    }

    /// Handle center in surface coordinates.
    pub fn handle_position(&self) -> Point {
        polar(self.center, self.radius, self.angle)
    }

    pub fn arc_path(&self) -> ArcPath {
        ArcPath::new(self.center, self.radius, self.progress())
    }

    fn store(&mut self, value: f64) -> f64 {
        self.value = value;
        self.angle = self.range.value_to_angle(value);
        value
    }
}

/// Interaction phase of a picker.
#[derive(Debug, Default)]
pub enum DragPhase {
    /// Not dragging; only clicks on the track change the value.
    #[default]
    Idle,
    /// Dragging the handle; holds the input surface attachment.
    Dragging(DragSubscription),
}

impl DragPhase {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PickerState {
        let range = ValueRange::new(0.0, 100.0, 10.0).unwrap();
        PickerState::new(range, 50.0, Point::new(100.0, 100.0))
    }

    #[test]
    fn test_initial_state() {
        let s = state();
        assert_eq!(s.value(), 0.0);
        assert!((s.angle() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(s.arc_path().is_empty());
    }

    #[test]
    fn test_set_value_snaps_and_clamps() {
        let mut s = state();
        assert_eq!(s.set_value(44.0), 40.0);
        assert_eq!(s.set_value(500.0), 100.0);
        assert!(s.arc_path().is_full());
        assert_eq!(s.set_value(-3.0), 0.0);
    }

    #[test]
    fn test_set_from_point() {
        let mut s = state();
        // Straight below the center: half way round.
        assert_eq!(s.set_from_point(Point::new(100.0, 180.0)), Some(50.0));
        // Far outside the widget, to the left: three quarters.
        assert_eq!(s.set_from_point(Point::new(-1.0e6, 100.0)), Some(80.0));
    }

    #[test]
    fn test_center_and_garbage_positions_are_ignored() {
        let mut s = state();
        s.set_value(30.0);
        assert_eq!(s.set_from_point(Point::new(100.0, 100.0)), None);
        assert_eq!(s.set_from_point(Point::new(f64::NAN, 3.0)), None);
        assert_eq!(s.value(), 30.0);
    }

    #[test]
    fn test_drag_past_seam_pins_until_pointer_returns() {
        let mut s = state();
        s.set_value(90.0);
        let center = s.center();
        let at = |degrees: f64| polar(center, 50.0, crate::START_ANGLE + degrees.to_radians());

        assert_eq!(s.drag_to_point(at(350.0)), Some(100.0));
        assert_eq!(s.drag_to_point(at(20.0)), Some(100.0));
        assert_eq!(s.drag_to_point(at(120.0)), Some(100.0));
        assert_eq!(s.drag_to_point(at(190.0)), Some(100.0));
        assert_eq!(s.drag_to_point(at(20.0)), Some(100.0));
        assert_eq!(s.drag_to_point(at(340.0)), Some(90.0));

        s.reset_pointer();
        assert_eq!(s.drag_to_point(at(300.0)), Some(80.0));
    }

    #[test]
    fn test_handle_follows_value() {
        let mut s = state();
        s.set_value(50.0);
        let handle = s.handle_position();
        assert!((handle.x - 100.0).abs() < 1e-9);
        assert!((handle.y - 150.0).abs() < 1e-9);
    }
}
