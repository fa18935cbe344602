//! The radial dial widget.

use egui::{Align2, CursorIcon, FontId, Painter, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Widget, vec2};
use kurbo::Point;
use ringdial_core::{InputSurface, Part, RadialPicker, SurfaceMapping};

use crate::colors::{arc_color32, color32, shadow_color32};
use crate::{sizing, theme};

/// An egui widget that shows a [`RadialPicker`] and drives it from pointer
/// input: drag the handle to follow the pointer around the track, or click
/// the track to jump to a value.
///
/// The readout is drawn in the middle of the dial.
pub struct RadialDial<'a> {
    picker: &'a mut RadialPicker,
    input: &'a InputSurface,
    side: Option<f32>,
    show_readout: bool,
}

impl<'a> RadialDial<'a> {
    /// Create a dial for `picker`, attaching drags to `input`.
    pub fn new(picker: &'a mut RadialPicker, input: &'a InputSurface) -> Self {
        Self {
            picker,
            input,
            side: None,
            show_readout: true,
        }
    }

    /// Set the side of the square the dial occupies, in points.
    pub fn side(mut self, side: f32) -> Self {
        self.side = Some(side.max(sizing::MIN_SIDE));
        self
    }

    /// Show or hide the readout.
    pub fn show_readout(mut self, show: bool) -> Self {
        self.show_readout = show;
        self
    }
}

impl Widget for RadialDial<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let side = self.side.unwrap_or_else(|| {
            let available = ui.available_width().min(ui.available_height());
            if available.is_finite() {
                available.clamp(sizing::MIN_SIDE, sizing::DEFAULT_SIDE)
            } else {
                sizing::DEFAULT_SIDE
            }
        });
        let (rect, mut response) = ui.allocate_exact_size(vec2(side, side), Sense::click_and_drag());

        let Some(mapping) = surface_mapping(rect, view_side(self.picker)) else {
            return response;
        };
        let to_surface = |pos: Pos2| mapping.to_surface(to_point(pos));

        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin()).map(to_surface);
            if origin.is_some_and(|p| self.picker.hit_test(p) == Some(Part::Handle))
                && self.picker.begin_drag(self.input)
            {
                log::debug!("Dial {} grabbed", self.picker.id());
            }
        }

        if response.dragged() && self.picker.is_dragging() {
            let moved = response
                .interact_pointer_pos()
                .map(to_surface)
                .and_then(|p| self.picker.drag_to(p));
            if moved.is_some() {
                response.mark_changed();
            }
        }

        if response.drag_stopped() && self.picker.end_drag() {
            log::debug!("Dial {} released at {}", self.picker.id(), self.picker.value());
        }

        if response.clicked() {
            let position = response.interact_pointer_pos().map(to_surface);
            let clicked = position
                .filter(|p| self.picker.hit_test(*p).is_some_and(Part::is_clickable))
                .and_then(|p| self.picker.click_at(p));
            if clicked.is_some() {
                log::debug!("Dial {} clicked to {}", self.picker.id(), self.picker.value());
                response.mark_changed();
            }
        }

        if ui.is_rect_visible(rect) {
            paint(ui.painter(), rect, &mapping, self.picker, self.show_readout);
        }

        let over_handle = response
            .hover_pos()
            .is_some_and(|pos| self.picker.hit_test(to_surface(pos)) == Some(Part::Handle));
        if self.picker.is_dragging() {
            response.on_hover_cursor(CursorIcon::Grabbing)
        } else if over_handle {
            response.on_hover_cursor(CursorIcon::Grab)
        } else {
            response
        }
    }
}

fn paint(painter: &Painter, rect: Rect, mapping: &SurfaceMapping, picker: &RadialPicker, show_readout: bool) {
    let visuals = picker.visuals();
    let command = picker.render();
    let scale = (rect.width() as f64 / view_side(picker)) as f32;
    let to_screen = |p: Point| to_pos2(mapping.to_client(p));

    let center = to_screen(visuals.center);
    let radius = visuals.radius as f32 * scale;
    let track_width = visuals.track_width as f32 * scale;

    painter.circle_stroke(center, radius, Stroke::new(track_width + 4.0 * scale, shadow_color32()));
    painter.circle_stroke(center, radius, Stroke::new(track_width, theme::TRACK));

    let points: Vec<Pos2> = command
        .arc
        .sample(sizing::ARC_SAMPLE_STEP)
        .into_iter()
        .map(to_screen)
        .collect();
    if points.len() >= 2 {
        painter.add(Shape::line(points, Stroke::new(track_width, arc_color32(visuals.color))));
    }

    painter.circle_filled(
        to_screen(command.handle),
        visuals.handle_radius as f32 * scale,
        color32(visuals.color),
    );

    if show_readout {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            &command.readout,
            FontId::proportional(rect.width() * sizing::READOUT_SCALE),
            color32(visuals.color),
        );
    }
}

/// Side of the view box a picker was laid out in.
///
/// Pickers sit at the center of their square surface.
pub fn view_side(picker: &RadialPicker) -> f64 {
    picker.state().center().x * 2.0
}

/// Mapping from egui screen positions to the picker's surface.
pub fn surface_mapping(rect: Rect, view_side: f64) -> Option<SurfaceMapping> {
    let screen = kurbo::Rect::new(
        rect.min.x as f64,
        rect.min.y as f64,
        rect.max.x as f64,
        rect.max.y as f64,
    );
    SurfaceMapping::new(screen, view_side)
}

pub fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

pub fn to_pos2(point: Point) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{CentralPanel, Context, Event, Modifiers, PointerButton, RawInput};
    use kurbo::Size;
    use ringdial_core::PickerConfig;

    fn picker() -> RadialPicker {
        RadialPicker::new(&PickerConfig::new(80.0), Size::new(200.0, 200.0)).unwrap()
    }

    #[test]
    fn test_view_side() {
        assert_eq!(view_side(&picker()), 200.0);
    }

    #[test]
    fn test_surface_mapping_round_trip() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), vec2(400.0, 400.0));
        let mapping = surface_mapping(rect, 200.0).unwrap();
        assert_eq!(mapping.to_surface(to_point(Pos2::new(210.0, 220.0))), Point::new(100.0, 100.0));
        assert_eq!(to_pos2(mapping.to_client(Point::new(200.0, 0.0))), Pos2::new(410.0, 20.0));
    }

    #[test]
    fn test_surface_mapping_rejects_collapsed_rect() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(0.0, 100.0));
        assert!(surface_mapping(rect, 200.0).is_none());
    }

    /// Run one frame with `events` and return the dial's rect.
    fn frame(ctx: &Context, picker: &mut RadialPicker, input: &InputSurface, events: Vec<Event>) -> Rect {
        let raw = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(400.0, 400.0))),
            events,
            ..Default::default()
        };
        let mut rect = Rect::NOTHING;
        ctx.run(raw, |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                rect = ui.add(RadialDial::new(&mut *picker, input).side(200.0)).rect;
            });
        });
        rect
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_dragging_the_handle_moves_the_value() {
        let ctx = Context::default();
        let input = InputSurface::new();
        let mut picker = picker();

        let rect = frame(&ctx, &mut picker, &input, Vec::new());
        let mapping = surface_mapping(rect, view_side(&picker)).unwrap();
        let handle = to_pos2(mapping.to_client(picker.state().handle_position()));
        let three_oclock = to_pos2(mapping.to_client(Point::new(180.0, 100.0)));

        frame(&ctx, &mut picker, &input, vec![Event::PointerMoved(handle), button(handle, true)]);
        frame(&ctx, &mut picker, &input, vec![Event::PointerMoved(three_oclock)]);
        assert!(picker.is_dragging());
        assert_eq!(input.listener_count(), 1);
        assert_eq!(picker.value(), 25.0);

        frame(&ctx, &mut picker, &input, vec![button(three_oclock, false)]);
        assert!(!picker.is_dragging());
        assert_eq!(input.listener_count(), 0);
        assert_eq!(picker.value(), 25.0);
    }

    #[test]
    fn test_clicking_the_track_sets_the_value() {
        let ctx = Context::default();
        let input = InputSurface::new();
        let mut picker = picker();

        let rect = frame(&ctx, &mut picker, &input, Vec::new());
        let mapping = surface_mapping(rect, view_side(&picker)).unwrap();
        let nine_oclock = to_pos2(mapping.to_client(Point::new(20.0, 100.0)));

        frame(&ctx, &mut picker, &input, vec![Event::PointerMoved(nine_oclock), button(nine_oclock, true)]);
        frame(&ctx, &mut picker, &input, vec![button(nine_oclock, false)]);
        assert_eq!(picker.value(), 75.0);
        assert!(!picker.is_dragging());
        assert_eq!(input.listener_count(), 0);
    }

    #[test]
    fn test_dial_paints_without_input() {
        let ctx = Context::default();
        let input = InputSurface::new();
        let mut picker = picker();
        picker.set_value(40.0);

        let output = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                ui.add(RadialDial::new(&mut picker, &input).side(200.0));
            });
        });

        assert!(!output.shapes.is_empty());
        assert_eq!(picker.value(), 40.0);
        assert!(!picker.is_dragging());
        assert_eq!(input.listener_count(), 0);
    }
}
