//! Containers: the mounting point shared by one or more pickers.
//!
//! All pickers in a container draw onto one shared drawing surface and show
//! their readouts in one shared readout area. Both are created by the first
//! mount and reused by every later one.

use kurbo::{Rect, Size};

use crate::config::{ConfigResult, PickerConfig};
use crate::input::PointerEvent;
use crate::picker::{PickerId, RadialPicker};
use crate::render::RenderCommand;
use crate::subscription::InputSurface;

/// The square vector surface every picker in a container draws on.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSurface {
    view_box: Rect,
}

impl DrawingSurface {
    fn for_container(size: Size) -> Self {
        let side = size.width.min(size.height);
        Self { view_box: Rect::new(0.0, 0.0, side, side) }
    }

    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    pub fn side(&self) -> f64 {
        self.view_box.width()
    }
}

/// The row of value readouts below the drawing surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadoutArea {
    slots: Vec<PickerId>,
}

impl ReadoutArea {
    /// Pickers with a readout, in display order.
    pub fn slots(&self) -> &[PickerId] {
        &self.slots
    }
}

/// Result of dispatching one event to a container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Visual updates, in the order the pickers produced them.
    pub commands: Vec<RenderCommand>,
    /// Whether any picker asked to suppress the event's default action.
    pub prevent_default: bool,
}

/// A mounting point holding pickers and their shared nodes.
#[derive(Debug)]
pub struct Container {
    size: Size,
    input: InputSurface,
    drawing_surface: Option<DrawingSurface>,
    readout_area: Option<ReadoutArea>,
    surfaces_created: usize,
    readout_areas_created: usize,
    pickers: Vec<RadialPicker>,
}

impl Container {
    /// Create an empty container with its own input surface.
    pub fn new(size: Size) -> Self {
        Self::with_input(size, InputSurface::new())
    }

    /// Create an empty container attached to a shared input surface.
    pub fn with_input(size: Size, input: InputSurface) -> Self {
        Self {
            size,
            input,
            drawing_surface: None,
            readout_area: None,
            surfaces_created: 0,
            readout_areas_created: 0,
            pickers: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Update the container size. Existing pickers keep their centers; the
    /// new size applies to the surface view box on the next mount.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn input(&self) -> &InputSurface {
        &self.input
    }

    pub fn drawing_surface(&self) -> Option<&DrawingSurface> {
        self.drawing_surface.as_ref()
    }

    pub fn readout_area(&self) -> Option<&ReadoutArea> {
        self.readout_area.as_ref()
    }

    /// How many drawing surfaces this container ever created.
    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    /// How many readout areas this container ever created.
    pub fn readout_areas_created(&self) -> usize {
        self.readout_areas_created
    }

    /// Create a picker from `config` and mount it.
    ///
    /// Nothing is created or changed if the configuration is invalid.
    pub fn mount(&mut self, config: &PickerConfig) -> ConfigResult<PickerId> {
        let picker = RadialPicker::new(config, self.size)?;
        let id = picker.id();

        self.ensure_drawing_surface();
        self.ensure_readout_area().slots.push(id);
        self.pickers.push(picker);

        log::info!("Mounted picker {} ({} in container)", id, self.pickers.len());
        Ok(id)
    }

    /// Detach and remove a picker. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, id: PickerId) -> bool {
        let Some(index) = self.pickers.iter().position(|p| p.id() == id) else {
            return false;
        };
        let mut picker = self.pickers.remove(index);
        picker.detach();
        if let Some(area) = self.readout_area.as_mut() {
            area.slots.retain(|slot| *slot != id);
        }
        log::info!("Unmounted picker {}", id);
        true
    }

    pub fn picker(&self, id: PickerId) -> Option<&RadialPicker> {
        self.pickers.iter().find(|p| p.id() == id)
    }

    pub fn picker_mut(&mut self, id: PickerId) -> Option<&mut RadialPicker> {
        self.pickers.iter_mut().find(|p| p.id() == id)
    }

    /// Mounted pickers in mount order (later ones are drawn on top).
    pub fn pickers(&self) -> &[RadialPicker] {
        &self.pickers
    }

    /// Render commands for every mounted picker.
    pub fn render_all(&self) -> Vec<RenderCommand> {
        self.pickers.iter().map(RadialPicker::render).collect()
    }

    /// Route one pointer event.
    ///
    /// Down and click events go to the topmost picker under the pointer.
    /// Move, up and cancel events go to the pickers currently attached to the
    /// input surface, so idle pickers never see them.
    pub fn dispatch(&mut self, event: &PointerEvent) -> Dispatch {
        let mut dispatch = Dispatch::default();

        match event {
            PointerEvent::Down { position, .. } | PointerEvent::Click { position } => {
                let target = self
                    .pickers
                    .iter_mut()
                    .rev()
                    .find(|p| p.hit_test(*position).is_some());
                if let Some(picker) = target {
                    let outcome = picker.handle_event(event, &self.input);
                    dispatch.prevent_default = outcome.prevent_default;
                    dispatch.commands.extend(outcome.command);
                }
            }
            PointerEvent::Move { .. } | PointerEvent::Up { .. } | PointerEvent::Cancel { .. } => {
                let subscribers = self.input.subscribers();
                for picker in self.pickers.iter_mut().filter(|p| subscribers.contains(&p.id())) {
                    let outcome = picker.handle_event(event, &self.input);
                    dispatch.prevent_default |= outcome.prevent_default;
                    dispatch.commands.extend(outcome.command);
                }
            }
        }

        dispatch
    }

    fn ensure_drawing_surface(&mut self) {
        let surface = DrawingSurface::for_container(self.size);
        if self.drawing_surface.is_none() {
            self.surfaces_created += 1;
            log::debug!("Created drawing surface ({}x{})", surface.side(), surface.side());
        }
        // Reused surfaces follow the current container size.
        self.drawing_surface = Some(surface);
    }

    fn ensure_readout_area(&mut self) -> &mut ReadoutArea {
        if self.readout_area.is_none() {
            self.readout_areas_created += 1;
            log::debug!("Created readout area");
        }
        self.readout_area.get_or_insert_with(ReadoutArea::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerKind;
    use kurbo::Point;

    #[test]
    fn test_invalid_mount_creates_nothing() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        assert!(container.mount(&PickerConfig::default()).is_err());
        assert!(container.drawing_surface().is_none());
        assert!(container.readout_area().is_none());
        assert!(container.pickers().is_empty());
    }

    #[test]
    fn test_surface_follows_container_size() {
        let mut container = Container::new(Size::new(300.0, 200.0));
        container.mount(&PickerConfig::new(50.0)).unwrap();
        assert_eq!(container.drawing_surface().unwrap().side(), 200.0);

        container.resize(Size::new(500.0, 400.0));
        let first = container.pickers()[0].state().center();
        container.mount(&PickerConfig::new(50.0)).unwrap();

        assert_eq!(container.drawing_surface().unwrap().side(), 400.0);
        assert_eq!(container.surfaces_created(), 1);
        assert_eq!(container.pickers()[0].state().center(), first);
        assert_eq!(container.pickers()[1].state().center(), Point::new(200.0, 200.0));
    }

    #[test]
    fn test_unmount() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        let id = container.mount(&PickerConfig::new(50.0)).unwrap();
        let input = container.input().clone();
        container.picker_mut(id).unwrap().begin_drag(&input);
        assert_eq!(container.input().listener_count(), 1);

        assert!(container.unmount(id));
        assert!(!container.unmount(id));
        assert_eq!(container.input().listener_count(), 0);
        assert!(container.readout_area().unwrap().slots().is_empty());
    }

    #[test]
    fn test_dispatch_routes_down_to_hit_picker() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        let outer = container.mount(&PickerConfig::new(80.0)).unwrap();
        let inner = container.mount(&PickerConfig::new(40.0)).unwrap();

        // Inner handle sits at (100, 60).
        let dispatch = container.dispatch(&PointerEvent::Down {
            position: Point::new(100.0, 60.0),
            kind: PointerKind::Touch,
        });
        assert!(dispatch.prevent_default);
        assert!(container.picker(inner).unwrap().is_dragging());
        assert!(!container.picker(outer).unwrap().is_dragging());
    }

    #[test]
    fn test_dispatch_moves_only_reach_dragging_picker() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        let outer = container.mount(&PickerConfig::new(80.0)).unwrap();
        let inner = container.mount(&PickerConfig::new(40.0)).unwrap();

        container.dispatch(&PointerEvent::Down {
            position: Point::new(100.0, 20.0),
            kind: PointerKind::Mouse,
        });
        let dispatch = container.dispatch(&PointerEvent::Move {
            position: Point::new(100.0, 180.0),
            kind: PointerKind::Mouse,
        });

        assert_eq!(dispatch.commands.len(), 1);
        assert_eq!(dispatch.commands[0].picker, outer);
        assert_eq!(container.picker(outer).unwrap().value(), 50.0);
        assert_eq!(container.picker(inner).unwrap().value(), 0.0);

        container.dispatch(&PointerEvent::Up { kind: PointerKind::Mouse });
        assert_eq!(container.input().listener_count(), 0);

        let dispatch = container.dispatch(&PointerEvent::Move {
            position: Point::new(20.0, 100.0),
            kind: PointerKind::Mouse,
        });
        assert!(dispatch.commands.is_empty());
        assert_eq!(container.picker(outer).unwrap().value(), 50.0);
    }

    #[test]
    fn test_drop_detaches_pickers() {
        let input = InputSurface::new();
        {
            let mut container = Container::with_input(Size::new(200.0, 200.0), input.clone());
            let id = container.mount(&PickerConfig::new(80.0)).unwrap();
            container.picker_mut(id).unwrap().begin_drag(&input);
            assert_eq!(input.listener_count(), 1);
        }
        assert_eq!(input.listener_count(), 0);
    }
}
