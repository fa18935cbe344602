//! Scripted demo: pickers in one container driven by synthetic pointer
//! events, rendered to markup.

use kurbo::{Point, Size};
use ringdial_core::{ConfigError, Container, PickerConfig, PickerId, PointerEvent, PointerKind};
use ringdial_render::{Renderer, RendererError, SvgRenderer};
use thiserror::Error;

/// Pickers shown by the demo, outermost first.
pub const DEMO_PICKERS: &str = r##"[
    { "color": "#c0392b", "radius": 140, "min": 0, "max": 100, "step": 1 },
    { "color": "#2980b9", "radius": 90, "min": -50, "max": 50, "step": 5 }
]"##;

/// Side of the demo container.
pub const DEMO_SIDE: f64 = 320.0;

/// Demo errors.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Invalid picker configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid picker list: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// A container of pickers mirrored into an [`SvgRenderer`].
pub struct Demo {
    container: Container,
    renderer: SvgRenderer,
    ids: Vec<PickerId>,
}

impl Demo {
    /// Mount `configs` into a container of `size`.
    pub fn new(size: Size, configs: &[PickerConfig]) -> Result<Self, DemoError> {
        let mut container = Container::new(size);
        let ids = configs
            .iter()
            .map(|config| container.mount(config))
            .collect::<Result<Vec<_>, _>>()?;

        let mut renderer = SvgRenderer::new();
        renderer.sync(&container)?;
        log::info!("Demo mounted {} pickers", ids.len());

        Ok(Self { container, renderer, ids })
    }

    /// Mount pickers from a JSON array of configurations.
    pub fn from_json(size: Size, json: &str) -> Result<Self, DemoError> {
        let configs: Vec<PickerConfig> = serde_json::from_str(json)?;
        Self::new(size, &configs)
    }

    /// The built-in two-picker demo.
    pub fn standard() -> Result<Self, DemoError> {
        Self::from_json(Size::new(DEMO_SIDE, DEMO_SIDE), DEMO_PICKERS)
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Picker ids in mount order.
    pub fn ids(&self) -> &[PickerId] {
        &self.ids
    }

    /// Dispatch `events` in order and apply every resulting update.
    ///
    /// Returns how many updates were applied.
    pub fn play(&mut self, events: &[PointerEvent]) -> Result<usize, DemoError> {
        let mut applied = 0;
        for event in events {
            let dispatch = self.container.dispatch(event);
            for command in &dispatch.commands {
                self.renderer.apply(command)?;
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Events that grab the handle of picker `index` and drag it clockwise
    /// to `degrees` from 12 o'clock in steps of at most 10°.
    pub fn drag_script(&self, index: usize, degrees: f64) -> Vec<PointerEvent> {
        let Some(picker) = self.ids.get(index).and_then(|id| self.container.picker(*id)) else {
            return Vec::new();
        };
        let state = picker.state();
        let start = state.handle_position();
        let start_degrees = (state.progress() * 360.0).round();

        let mut events = vec![PointerEvent::Down { position: start, kind: PointerKind::Mouse }];
        let mut at = start_degrees;
        while at < degrees {
            at = (at + 10.0).min(degrees);
            events.push(PointerEvent::Move {
                position: on_circle(state.center(), state.radius(), at),
                kind: PointerKind::Mouse,
            });
        }
        events.push(PointerEvent::Up { kind: PointerKind::Mouse });
        events
    }

    /// A click on the track of picker `index` at `degrees` from 12 o'clock.
    pub fn click_script(&self, index: usize, degrees: f64) -> Vec<PointerEvent> {
        self.ids
            .get(index)
            .and_then(|id| self.container.picker(*id))
            .map(|picker| {
                let state = picker.state();
                vec![PointerEvent::Click { position: on_circle(state.center(), state.radius(), degrees) }]
            })
            .unwrap_or_default()
    }

    /// Current markup of the whole container.
    pub fn markup(&self) -> String {
        self.renderer.markup()
    }
}

/// Point on a circle, `degrees` clockwise from 12 o'clock.
pub fn on_circle(center: Point, radius: f64, degrees: f64) -> Point {
    ringdial_core::geometry::polar(center, radius, ringdial_core::START_ANGLE + degrees.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_demo_mounts_two_pickers() {
        let demo = Demo::standard().unwrap();
        assert_eq!(demo.ids().len(), 2);
        assert_eq!(demo.container().surfaces_created(), 1);
        assert_eq!(demo.container().readout_areas_created(), 1);
    }

    #[test]
    fn test_drag_script_moves_outer_picker() {
        let mut demo = Demo::standard().unwrap();
        let script = demo.drag_script(0, 90.0);
        assert_eq!(script.len(), 11);

        let applied = demo.play(&script).unwrap();
        assert_eq!(applied, 9);
        let outer = demo.container().picker(demo.ids()[0]).unwrap();
        assert_eq!(outer.value(), 25.0);
        assert!(!outer.is_dragging());
        assert!(demo.markup().contains(">25</div>"));
    }

    #[test]
    fn test_click_script_sets_inner_picker() {
        let mut demo = Demo::standard().unwrap();
        assert!(demo.markup().contains(">-50</div>"));
        let script = demo.click_script(1, 180.0);
        assert_eq!(demo.play(&script).unwrap(), 1);
        let inner = demo.container().picker(demo.ids()[1]).unwrap();
        assert_eq!(inner.value(), 0.0);
        assert!(!demo.markup().contains(">-50</div>"));
    }

    #[test]
    fn test_scripts_for_missing_picker_are_empty() {
        let demo = Demo::standard().unwrap();
        assert!(demo.drag_script(5, 90.0).is_empty());
        assert!(demo.click_script(5, 90.0).is_empty());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = Demo::from_json(Size::new(100.0, 100.0), "[{").err().unwrap();
        assert!(matches!(err, DemoError::Json(_)));

        let err = Demo::from_json(Size::new(100.0, 100.0), r#"[{ "radius": 500 }]"#).err().unwrap();
        assert!(matches!(err, DemoError::Config(ConfigError::RadiusTooLarge { .. })));
    }
}
