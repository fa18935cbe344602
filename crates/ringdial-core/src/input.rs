//! Pointer input for mouse and touch.
//!
//! Hosts translate their native events into [`PointerEvent`]s expressed in
//! drawing-surface coordinates. Mouse and touch go through the same
//! [`extract_position`] so both behave identically once inside the core.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Where a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in drawing-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Button pressed or finger placed.
    Down { position: Point, kind: PointerKind },
    /// Pointer moved anywhere on the page.
    Move { position: Point, kind: PointerKind },
    /// Button released or finger lifted.
    Up { kind: PointerKind },
    /// The host aborted the gesture (e.g. `touchcancel`).
    Cancel { kind: PointerKind },
    /// A completed click or tap.
    Click { position: Point },
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Click { position } => Some(position),
            PointerEvent::Up { .. } | PointerEvent::Cancel { .. } => None,
        }
    }

    /// Source of the event. Clicks are reported as mouse input.
    pub fn kind(&self) -> PointerKind {
        match *self {
            PointerEvent::Down { kind, .. }
            | PointerEvent::Move { kind, .. }
            | PointerEvent::Up { kind }
            | PointerEvent::Cancel { kind } => kind,
            PointerEvent::Click { .. } => PointerKind::Mouse,
        }
    }

    /// Whether this event ends a drag.
    pub fn is_release(&self) -> bool {
        matches!(self, PointerEvent::Up { .. } | PointerEvent::Cancel { .. })
    }
}

/// Native pointer data before coordinate extraction, in client coordinates.
#[derive(Debug, Clone, Copy)]
pub enum RawPointer<'a> {
    Mouse { client: Point },
    Touch {
        /// Fingers currently on the surface.
        touches: &'a [Point],
        /// Fingers that changed in this event (the only ones left on `touchend`).
        changed: &'a [Point],
    },
}

impl RawPointer<'_> {
    pub fn kind(&self) -> PointerKind {
        match self {
            RawPointer::Mouse { .. } => PointerKind::Mouse,
            RawPointer::Touch { .. } => PointerKind::Touch,
        }
    }
}

/// Client position of a mouse or the first touch point.
///
/// Returns `None` for touch events without any touch points or for
/// non-finite coordinates.
pub fn extract_position(raw: &RawPointer) -> Option<Point> {
    let position = match raw {
        RawPointer::Mouse { client } => *client,
        RawPointer::Touch { touches, changed } => {
            *touches.first().or_else(|| changed.first())?
        }
    };
    (position.x.is_finite() && position.y.is_finite()).then_some(position)
}

/// Maps client (screen) coordinates into drawing-surface coordinates.
///
/// The surface's view box is stretched over its on-screen rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapping {
    origin: Point,
    scale: Vec2,
    view_origin: Point,
}

impl Default for SurfaceMapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl SurfaceMapping {
    /// Client coordinates are already surface coordinates.
    pub fn identity() -> Self {
        Self {
            origin: Point::ZERO,
            scale: Vec2::new(1.0, 1.0),
            view_origin: Point::ZERO,
        }
    }

    /// Build a mapping from the surface's on-screen rect.
    ///
    /// Returns `None` when the rect has no area (surface not laid out).
    pub fn new(screen_rect: Rect, view_box_side: f64) -> Option<Self> {
        Self::with_view_box(screen_rect, Rect::new(0.0, 0.0, view_box_side, view_box_side))
    }

    /// Build a mapping from the surface's on-screen rect and its current
    /// view box.
    pub fn with_view_box(screen_rect: Rect, view_box: Rect) -> Option<Self> {
        let usable = |r: Rect| r.width() > 0.0 && r.height() > 0.0 && r.is_finite();
        if !usable(screen_rect) || !usable(view_box) {
            return None;
        }
        Some(Self {
            origin: screen_rect.origin(),
            scale: Vec2::new(
                view_box.width() / screen_rect.width(),
                view_box.height() / screen_rect.height(),
            ),
            view_origin: view_box.origin(),
        })
    }

    /// Parse an svg `viewBox` attribute: `min-x min-y width height`,
    /// separated by whitespace or commas.
    pub fn parse_view_box(attribute: &str) -> Option<Rect> {
        let mut numbers = attribute
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse::<f64>);
        let mut next = || numbers.next()?.ok();
        let (x, y, width, height) = (next()?, next()?, next()?, next()?);
        if numbers.next().is_some() {
            return None;
        }
        Some(Rect::new(x, y, x + width, y + height))
    }

    /// Convert a client position to surface coordinates.
    pub fn to_surface(&self, client: Point) -> Point {
        Point::new(
            (client.x - self.origin.x) * self.scale.x + self.view_origin.x,
            (client.y - self.origin.y) * self.scale.y + self.view_origin.y,
        )
    }

    /// Convert a surface position back to client coordinates.
    pub fn to_client(&self, surface: Point) -> Point {
        Point::new(
            (surface.x - self.view_origin.x) / self.scale.x + self.origin.x,
            (surface.y - self.view_origin.y) / self.scale.y + self.origin.y,
        )
    }

    /// Extract and convert in one go.
    pub fn map(&self, raw: &RawPointer) -> Option<Point> {
        extract_position(raw).map(|client| self.to_surface(client))
    }
}
