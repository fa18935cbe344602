//! Vello-based renderer implementation.

use kurbo::{Affine, Circle, Point, Stroke};
use peniko::{Color, Fill, Gradient};
use ringdial_core::geometry::polar;
use ringdial_core::render::style;
use ringdial_core::{PickerColor, PickerId, PickerVisuals, RenderCommand, START_ANGLE};
use vello::Scene;

use crate::renderer::{PickerSlot, RenderModel, RenderResult, Renderer};

/// A readout for the host to draw as text; vello scenes carry no text here.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutLabel {
    pub picker: PickerId,
    pub text: String,
    pub color: PickerColor,
}

/// Vello-based renderer.
pub struct VelloRenderer {
    scene: Scene,
    model: RenderModel,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            model: RenderModel::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    pub fn model(&self) -> &RenderModel {
        &self.model
    }

    /// Rebuild the scene, scaling the view box to fit a square viewport of
    /// `viewport_side` pixels.
    pub fn build_scene(&mut self, viewport_side: f64) {
        self.scene.reset();

        let side = self.model.view_side();
        let transform = if side > 0.0 {
            Affine::scale(viewport_side / side)
        } else {
            Affine::IDENTITY
        };

        for slot in self.model.slots() {
            render_picker(&mut self.scene, slot, transform);
        }
    }

    /// Readout texts in display order.
    pub fn readouts(&self) -> Vec<ReadoutLabel> {
        self.model
            .slots()
            .iter()
            .map(|slot| ReadoutLabel {
                picker: slot.visuals.picker,
                text: slot.command.as_ref().map(|c| c.readout.clone()).unwrap_or_default(),
                color: slot.visuals.color,
            })
            .collect()
    }
}

impl Renderer for VelloRenderer {
    fn set_view_box(&mut self, side: f64) {
        self.model.set_view_side(side);
    }

    fn mount(&mut self, visuals: &PickerVisuals) -> RenderResult<()> {
        self.model.mount(visuals)
    }

    fn apply(&mut self, command: &RenderCommand) -> RenderResult<()> {
        self.model.apply(command)
    }

    fn unmount(&mut self, picker: PickerId) -> RenderResult<()> {
        self.model.unmount(picker)
    }
}

fn render_picker(scene: &mut Scene, slot: &PickerSlot, transform: Affine) {
    let v = &slot.visuals;
    let track = Circle::new(v.center, v.radius);

    // Soft shadow: a wider, faint stroke under the track.
    let shadow_alpha = (style::SHADOW_OPACITY * 255.0 / 2.0).round() as u8;
    scene.stroke(
        &Stroke::new(v.track_width + 2.0 * style::SHADOW_STD_DEVIATION),
        transform,
        Color::from_rgba8(0xbb, 0xbb, 0xbb, shadow_alpha),
        None,
        &track,
    );

    // Gradient across the track's bounding box, top-left to bottom-right.
    let reach = v.radius + v.track_width / 2.0;
    let gradient = Gradient::new_linear(
        Point::new(v.center.x - reach, v.center.y - reach),
        Point::new(v.center.x + reach, v.center.y + reach),
    )
    .with_stops([Color::from_rgb8(0xee, 0xee, 0xee), Color::from_rgb8(0xcc, 0xcc, 0xcc)]);
    scene.stroke(&Stroke::new(v.track_width), transform, &gradient, None, &track);

    let (arc, handle) = match &slot.command {
        Some(command) => (command.arc.to_bez_path(), command.handle),
        None => (Default::default(), polar(v.center, v.radius, START_ANGLE)),
    };
    if !arc.elements().is_empty() {
        scene.stroke(
            &Stroke::new(v.track_width),
            transform,
            v.color.with_opacity(style::ARC_OPACITY),
            None,
            &arc,
        );
    }

    scene.fill(
        Fill::NonZero,
        transform,
        Color::from(v.color),
        None,
        &Circle::new(handle, v.handle_radius),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use ringdial_core::{Container, PickerConfig};

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_pickers() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        let id = container.mount(&PickerConfig::new(80.0).with_color("#c33")).unwrap();
        container.mount(&PickerConfig::new(40.0)).unwrap();

        let mut renderer = VelloRenderer::new();
        renderer.sync(&container).unwrap();
        renderer.build_scene(400.0);
        assert!(!renderer.scene().encoding().is_empty());

        let readouts = renderer.readouts();
        assert_eq!(readouts.len(), 2);
        assert_eq!(readouts[0].picker, id);
        assert_eq!(readouts[0].text, "0");
        assert_eq!(readouts[0].color, PickerColor { r: 0xcc, g: 0x33, b: 0x33 });
    }

    #[test]
    fn test_take_scene_resets() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        container.mount(&PickerConfig::new(80.0)).unwrap();

        let mut renderer = VelloRenderer::new();
        renderer.sync(&container).unwrap();
        renderer.build_scene(200.0);
        let scene = renderer.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }
}
