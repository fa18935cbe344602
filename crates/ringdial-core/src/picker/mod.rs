//! The radial picker: state, drag phase and event handling.
//!
//! A picker moves through `Idle -> Dragging -> Idle`:
//! - pointer down on the handle attaches it to the shared [`InputSurface`];
//! - every move recomputes the value from the angle around the fixed center;
//! - release, cancel or detach drops the attachment.
//!
//! Clicks on the track or arc set the value once without entering a drag.

mod handles;
mod state;

pub use handles::{Part, hit_test};
pub use state::{DragPhase, PickerState};

use kurbo::{Point, Size};
use uuid::Uuid;

use crate::config::{ConfigError, ConfigResult, PickerConfig};
use crate::input::PointerEvent;
use crate::render::{PickerVisuals, RenderCommand};
use crate::subscription::InputSurface;

/// Unique identifier for a picker instance.
pub type PickerId = Uuid;

/// Extra reach, in surface units, when hit testing pointer positions.
pub const HIT_TOLERANCE: f64 = 4.0;

/// What handling one event produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOutcome {
    /// Visual update to apply, if the value was (re)computed.
    pub command: Option<RenderCommand>,
    /// Whether the host should suppress the event's default action
    /// (page scrolling and zooming on touch devices).
    pub prevent_default: bool,
}

/// A single radial value picker.
#[derive(Debug)]
pub struct RadialPicker {
    id: PickerId,
    state: PickerState,
    visuals: PickerVisuals,
    phase: DragPhase,
    detached: bool,
}

impl RadialPicker {
    /// Create a picker centered in a container of the given size.
    ///
    /// The drawing surface is the largest square that fits the container, so
    /// the center is fixed at half its side.
    pub fn new(config: &PickerConfig, container: Size) -> ConfigResult<Self> {
        let validated = config.validate()?;

        if !(container.width.is_finite() && container.height.is_finite())
            || container.width <= 0.0
            || container.height <= 0.0
        {
            return Err(ConfigError::InvalidContainer {
                width: container.width,
                height: container.height,
            });
        }

        let side = container.width.min(container.height);
        if validated.radius > side / 2.0 {
            return Err(ConfigError::RadiusTooLarge { radius: validated.radius, side });
        }

        let id = Uuid::new_v4();
        let center = Point::new(side / 2.0, side / 2.0);
        let state = PickerState::new(validated.range, validated.radius, center);
        let visuals = PickerVisuals::new(id, &state, validated.color, container);

        Ok(Self {
            id,
            state,
            visuals,
            phase: DragPhase::Idle,
            detached: false,
        })
    }

    pub fn id(&self) -> PickerId {
        self.id
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn visuals(&self) -> &PickerVisuals {
        &self.visuals
    }

    pub fn value(&self) -> f64 {
        self.state.value()
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_dragging()
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Current visuals as a render command.
    pub fn render(&self) -> RenderCommand {
        RenderCommand::new(self.id, &self.state)
    }

    /// Set the value programmatically (snapped and clamped).
    pub fn set_value(&mut self, value: f64) -> Option<RenderCommand> {
        if self.detached {
            return None;
        }
        self.state.set_value(value);
        Some(self.render())
    }

    /// The part of this picker under `position`, if any.
    pub fn hit_test(&self, position: Point) -> Option<Part> {
        hit_test(&self.state, &self.visuals, position, HIT_TOLERANCE)
    }

    /// `Idle -> Dragging`: attach to the input surface.
    ///
    /// Returns `false` if the picker was already dragging or is detached.
    pub fn begin_drag(&mut self, input: &InputSurface) -> bool {
        if self.detached {
            return false;
        }
        if self.is_dragging() {
            log::warn!("Picker {} is already dragging; ignoring second pointer down", self.id);
            return false;
        }
        self.state.reset_pointer();
        self.phase = DragPhase::Dragging(input.subscribe(self.id));
        log::debug!("Picker {} drag started at {}", self.id, self.state.value());
        true
    }

    /// `Dragging -> Dragging`: follow the pointer.
    pub fn drag_to(&mut self, position: Point) -> Option<RenderCommand> {
        if !self.is_dragging() {
            return None;
        }
        let value = self.state.drag_to_point(position)?;
        log::trace!("Picker {} dragged to {}", self.id, value);
        Some(self.render())
    }

    /// `Dragging -> Idle`: detach from the input surface.
    ///
    /// Returns `false` if no drag was active.
    pub fn end_drag(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging(subscription) => {
                drop(subscription);
                log::debug!("Picker {} drag ended at {}", self.id, self.state.value());
                true
            }
            DragPhase::Idle => false,
        }
    }

    /// `Idle -> Idle`: set the value from a click or tap position.
    pub fn click_at(&mut self, position: Point) -> Option<RenderCommand> {
        if self.detached || self.is_dragging() {
            return None;
        }
        let value = self.state.set_from_point(position)?;
        log::debug!("Picker {} clicked to {}", self.id, value);
        Some(self.render())
    }

    /// Handle an event delivered to this picker, hit testing positions
    /// against the handle and track.
    pub fn handle_event(&mut self, event: &PointerEvent, input: &InputSurface) -> EventOutcome {
        if self.detached {
            return EventOutcome::default();
        }

        match *event {
            PointerEvent::Down { position, .. } => {
                if self.hit_test(position) == Some(Part::Handle) && self.begin_drag(input) {
                    EventOutcome { command: None, prevent_default: true }
                } else {
                    EventOutcome::default()
                }
            }
            PointerEvent::Move { position, .. } => {
                if !self.is_dragging() {
                    return EventOutcome::default();
                }
                EventOutcome {
                    command: self.drag_to(position),
                    prevent_default: true,
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Cancel { .. } => {
                self.end_drag();
                EventOutcome::default()
            }
            PointerEvent::Click { position } => {
                let clickable = self.hit_test(position).is_some_and(Part::is_clickable);
                EventOutcome {
                    command: if clickable { self.click_at(position) } else { None },
                    prevent_default: false,
                }
            }
        }
    }

    /// Release everything this picker holds. Safe to call repeatedly.
    pub fn detach(&mut self) {
        self.end_drag();
        if !self.detached {
            self.detached = true;
            log::info!("Picker {} detached", self.id);
        }
    }
}

impl Drop for RadialPicker {
    fn drop(&mut self) {
        self.detach();
    }
}
