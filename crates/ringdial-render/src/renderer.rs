//! Renderer trait abstraction.

use ringdial_core::{Container, PickerId, PickerVisuals, RenderCommand};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RendererError {
    #[error("Picker {0} is not mounted")]
    UnknownPicker(PickerId),
    #[error("Picker {0} is already mounted")]
    AlreadyMounted(PickerId),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Trait for rendering backends.
///
/// A backend owns the nodes of one drawing surface. Pickers are mounted once
/// with their fixed visuals, then every [`RenderCommand`] updates the
/// handle, arc and readout of one picker together.
pub trait Renderer: Send + Sync {
    /// Size the drawing surface to a `side` x `side` view box.
    fn set_view_box(&mut self, side: f64);

    /// Create the nodes for a picker.
    fn mount(&mut self, visuals: &PickerVisuals) -> RenderResult<()>;

    /// Apply one visual update.
    fn apply(&mut self, command: &RenderCommand) -> RenderResult<()>;

    /// Remove the nodes for a picker.
    fn unmount(&mut self, picker: PickerId) -> RenderResult<()>;

    /// Mount every picker of `container` not yet mounted and bring all of
    /// them up to date.
    fn sync(&mut self, container: &Container) -> RenderResult<()> {
        if let Some(surface) = container.drawing_surface() {
            self.set_view_box(surface.side());
        }
        for picker in container.pickers() {
            match self.mount(picker.visuals()) {
                Ok(()) | Err(RendererError::AlreadyMounted(_)) => {}
                Err(err) => return Err(err),
            }
            self.apply(&picker.render())?;
        }
        Ok(())
    }
}

/// One mounted picker as seen by a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerSlot {
    pub visuals: PickerVisuals,
    /// Last applied update; `None` until the first one arrives.
    pub command: Option<RenderCommand>,
}

/// Backend-independent bookkeeping of the mounted pickers.
///
/// Slots keep mount order, which is also paint order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderModel {
    view_side: f64,
    slots: Vec<PickerSlot>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_side(&self) -> f64 {
        self.view_side
    }

    pub fn set_view_side(&mut self, side: f64) {
        if side != self.view_side {
            log::debug!("Render view box resized to {side}");
        }
        self.view_side = side;
    }

    pub fn slots(&self) -> &[PickerSlot] {
        &self.slots
    }

    pub fn slot(&self, picker: PickerId) -> Option<&PickerSlot> {
        self.slots.iter().find(|slot| slot.visuals.picker == picker)
    }

    pub fn mount(&mut self, visuals: &PickerVisuals) -> RenderResult<()> {
        if self.slot(visuals.picker).is_some() {
            return Err(RendererError::AlreadyMounted(visuals.picker));
        }
        self.slots.push(PickerSlot { visuals: visuals.clone(), command: None });
        log::debug!("Mounted picker {} into renderer ({} total)", visuals.picker, self.slots.len());
        Ok(())
    }

    pub fn apply(&mut self, command: &RenderCommand) -> RenderResult<()> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.visuals.picker == command.picker)
            .ok_or_else(|| {
                log::warn!("Dropping update for unmounted picker {}", command.picker);
                RendererError::UnknownPicker(command.picker)
            })?;
        slot.command = Some(command.clone());
        Ok(())
    }

    pub fn unmount(&mut self, picker: PickerId) -> RenderResult<()> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.visuals.picker == picker)
            .ok_or(RendererError::UnknownPicker(picker))?;
        self.slots.remove(index);
        log::debug!("Unmounted picker {picker} from renderer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use ringdial_core::PickerConfig;

    #[test]
    fn test_model_lifecycle() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        let id = container.mount(&PickerConfig::new(80.0)).unwrap();
        let picker = container.picker(id).unwrap();

        let mut model = RenderModel::new();
        model.mount(picker.visuals()).unwrap();
        assert_eq!(model.mount(picker.visuals()), Err(RendererError::AlreadyMounted(id)));
        assert!(model.slot(id).unwrap().command.is_none());

        model.apply(&picker.render()).unwrap();
        assert_eq!(model.slot(id).unwrap().command.as_ref().unwrap().readout, "0");

        model.unmount(id).unwrap();
        assert_eq!(model.unmount(id), Err(RendererError::UnknownPicker(id)));
        assert_eq!(model.apply(&picker.render()), Err(RendererError::UnknownPicker(id)));
    }

    #[test]
    fn test_slots_keep_mount_order() {
        let mut container = Container::new(Size::new(200.0, 200.0));
        let a = container.mount(&PickerConfig::new(80.0)).unwrap();
        let b = container.mount(&PickerConfig::new(40.0)).unwrap();

        let mut model = RenderModel::new();
        for picker in container.pickers() {
            model.mount(picker.visuals()).unwrap();
        }
        let order: Vec<_> = model.slots().iter().map(|slot| slot.visuals.picker).collect();
        assert_eq!(order, vec![a, b]);
    }
}
