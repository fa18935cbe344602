//! Angle↔value mapping and arc geometry.
//!
//! Angles are screen angles: 0 rad points at 3 o'clock and angles grow
//! clockwise because the y axis points down. A picker's minimum sits at
//! 12 o'clock, so every conversion in either direction goes through
//! [`START_ANGLE`].

use kurbo::{Arc, BezPath, Point, SvgArc, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::config::{ConfigError, ConfigResult};

/// Screen angle of the minimum value (12 o'clock).
pub const START_ANGLE: f64 = -FRAC_PI_2;

/// Tolerance used when classifying progress as empty or full.
pub const PROGRESS_EPSILON: f64 = 1e-9;

/// Angular distance (degrees) from the seam that still counts as the seam.
const SEAM_TOLERANCE_DEGREES: f64 = 1e-9;

/// Largest shift, in steps, that noise removal may apply to a value.
const TIDY_TOLERANCE: f64 = 1e-6;

/// Flattening tolerance for arc → bezier conversion.
const ARC_TOLERANCE: f64 = 0.1;

/// A validated value range with its step grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    min: f64,
    max: f64,
    step: f64,
    decimals: u32,
}

impl ValueRange {
    /// Create a range, rejecting non-finite bounds, `max <= min`, `step <= 0`
    /// and ranges whose span or step count overflows.
    pub fn new(min: f64, max: f64, step: f64) -> ConfigResult<Self> {
        for (field, value) in [("min", min), ("max", max), ("step", step)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if max <= min {
            return Err(ConfigError::EmptyRange { min, max });
        }
        if step <= 0.0 {
            return Err(ConfigError::InvalidStep(step));
        }
        let span = max - min;
        if !span.is_finite() {
            return Err(ConfigError::NonFinite { field: "max - min", value: span });
        }
        let steps = span / step;
        if !steps.is_finite() {
            return Err(ConfigError::NonFinite { field: "(max - min) / step", value: steps });
        }

        let decimals = decimals_of(step).max(decimals_of(min));
        Ok(Self { min, max, step, decimals })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Largest step-grid value that does not exceed `max`.
    pub fn grid_max(&self) -> f64 {
        let steps = (self.span() / self.step + PROGRESS_EPSILON).floor();
        self.tidy(self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Snap `raw` to the nearest step-grid value, clamped into the range.
    pub fn snap(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return self.min;
        }
        let steps = ((raw - self.min) / self.step).round();
        let snapped = self.tidy(self.min + steps * self.step);
        snapped.clamp(self.min, self.grid_max())
    }

    /// Fraction of the range covered by `value`, clamped to `[0, 1]`.
    pub fn progress(&self, value: f64) -> f64 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }

    /// Clockwise sweep from 12 o'clock to `value`, in `[0, 2π]`.
    pub fn value_to_sweep(&self, value: f64) -> f64 {
        self.progress(value) * TAU
    }

    /// Screen angle of the handle for `value`.
    pub fn value_to_angle(&self, value: f64) -> f64 {
        self.value_to_sweep(value) + START_ANGLE
    }

    /// Value for a screen angle, snapped to the step grid.
    ///
    /// Angles that differ by whole turns give the same value. The 12 o'clock
    /// seam itself resolves to `min`; use [`ValueRange::angle_to_value_from`]
    /// when the previous value is known.
    pub fn angle_to_value(&self, angle: f64) -> f64 {
        self.snap(self.raw_value_at(angle))
    }

    /// Unwrapped pointer progress after a drag move to `angle`.
    ///
    /// `previous` is the unwrapped progress of the last pointer position.
    /// Each move is taken as the shorter way round (clockwise for a half
    /// turn), so a pointer that crosses the 12 o'clock seam leaves `[0, 1]`
    /// instead of wrapping to the opposite end. It stays outside until it crosses back. Extra whole
    /// turns beyond either end are folded away, keeping the result in
    /// `[-1, 2]`.
    pub fn drag_progress(&self, previous: f64, angle: f64) -> f64 {
        if !previous.is_finite() {
            return self.progress(self.raw_value_at(angle));
        }
        let pointer = (self.raw_value_at(angle) - self.min) / self.span();
        let mut delta = (pointer - previous.rem_euclid(1.0) + 0.5).rem_euclid(1.0) - 0.5;
        // An exact half turn is ambiguous; take it clockwise.
        if delta < PROGRESS_EPSILON - 0.5 {
            delta += 1.0;
        }

        let mut unwrapped = previous + delta;
        if unwrapped > 2.0 {
            unwrapped -= 1.0;
        } else if unwrapped < -1.0 {
            unwrapped += 1.0;
        }
        unwrapped
    }

    /// Value for an unwrapped drag progress: pinned to `min` below zero and
    /// to the top of the grid above one.
    pub fn value_at_progress(&self, progress: f64) -> f64 {
        if progress.is_nan() || progress <= 0.0 {
            return self.min;
        }
        if progress >= 1.0 {
            return self.grid_max();
        }
        self.snap(self.min + progress * self.span())
    }

    /// Value for a screen angle during a drag whose pointer was last at
    /// unwrapped progress `previous`. See [`ValueRange::drag_progress`].
    pub fn angle_to_value_from(&self, previous: f64, angle: f64) -> f64 {
        self.value_at_progress(self.drag_progress(previous, angle))
    }

    /// Unsnapped value for a screen angle, in `[min, max)`.
    pub fn raw_value_at(&self, angle: f64) -> f64 {
        if !angle.is_finite() {
            return self.min;
        }
        let mut degrees = (angle - START_ANGLE).to_degrees().rem_euclid(360.0);
        if 360.0 - degrees < SEAM_TOLERANCE_DEGREES {
            degrees = 0.0;
        }
        degrees / 360.0 * self.span() + self.min
    }

    /// Remove float noise left by `min + k * step`.
    ///
    /// Rounding that would move the value by more than noise, or out of
    /// `[min, max]`, is discarded.
    fn tidy(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals.min(i32::MAX as u32) as i32);
        let tidied = (value * factor).round() / factor;
        let within_noise = (tidied - value).abs() <= self.step * TIDY_TOLERANCE;
        if tidied.is_finite() && within_noise && (self.min..=self.max).contains(&tidied) {
            tidied
        } else {
            value
        }
    }
}

/// Number of decimals in the shortest display form of `x`.
fn decimals_of(x: f64) -> u32 {
    let text = x.abs().to_string();
    text.split_once('.')
        .map(|(_, frac)| frac.len() as u32)
        .unwrap_or(0)
}

/// Point at `angle` on the circle of `radius` around `center`.
pub fn polar(center: Point, radius: f64, angle: f64) -> Point {
    center + Vec2::from_angle(angle) * radius
}

/// The progress arc of a picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ArcPath {
    /// Nothing drawn (value at min).
    Empty,
    /// A single clockwise arc from 12 o'clock to the value.
    #[serde(rename_all = "camelCase")]
    Partial {
        center: Point,
        radius: f64,
        sweep: f64,
        from: Point,
        to: Point,
        large_arc: bool,
    },
    /// The whole circle (value at max), drawn as two half arcs.
    Full { center: Point, radius: f64 },
}

impl ArcPath {
    /// Build the arc for `progress` in `[0, 1]`.
    pub fn new(center: Point, radius: f64, progress: f64) -> Self {
        // Written so that NaN lands on Empty.
        if !(progress > PROGRESS_EPSILON) {
            return ArcPath::Empty;
        }
        if progress >= 1.0 - PROGRESS_EPSILON {
            return ArcPath::Full { center, radius };
        }

        let sweep = progress * TAU;
        ArcPath::Partial {
            center,
            radius,
            sweep,
            from: polar(center, radius, START_ANGLE),
            to: polar(center, radius, START_ANGLE + sweep),
            large_arc: sweep > PI,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ArcPath::Empty)
    }

    pub fn is_full(&self) -> bool {
        matches!(self, ArcPath::Full { .. })
    }

    /// Swept angle in radians.
    pub fn sweep(&self) -> f64 {
        match self {
            ArcPath::Empty => 0.0,
            ArcPath::Partial { sweep, .. } => *sweep,
            ArcPath::Full { .. } => TAU,
        }
    }

    /// The arc as SVG arc segments. A full circle needs two, since a single
    /// arc whose endpoints coincide draws nothing.
    pub fn segments(&self) -> Vec<SvgArc> {
        match *self {
            ArcPath::Empty => Vec::new(),
            ArcPath::Partial { radius, from, to, large_arc, .. } => vec![SvgArc {
                from,
                to,
                radii: Vec2::new(radius, radius),
                x_rotation: 0.0,
                large_arc,
                sweep: true,
            }],
            ArcPath::Full { center, radius } => {
                let right = Point::new(center.x + radius, center.y);
                let left = Point::new(center.x - radius, center.y);
                let half = |from, to| SvgArc {
                    from,
                    to,
                    radii: Vec2::new(radius, radius),
                    x_rotation: 0.0,
                    large_arc: true,
                    sweep: true,
                };
                vec![half(right, left), half(left, right)]
            }
        }
    }

    /// SVG path data (`d` attribute). Empty for an empty arc.
    pub fn to_svg_d(&self) -> String {
        let segments = self.segments();
        let Some(first) = segments.first() else {
            return String::new();
        };

        let mut d = format!("M {} {}", first.from.x, first.from.y);
        for arc in &segments {
            d.push_str(&format!(
                " A {} {} {} {} {} {} {}",
                arc.radii.x,
                arc.radii.y,
                arc.x_rotation,
                u8::from(arc.large_arc),
                u8::from(arc.sweep),
                arc.to.x,
                arc.to.y,
            ));
        }
        d
    }

    /// The arc as cubic beziers, for vector renderers.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for segment in self.segments() {
            if path.elements().is_empty() {
                path.move_to(segment.from);
            }
            match Arc::from_svg_arc(&segment) {
                Some(arc) => path.extend(arc.append_iter(ARC_TOLERANCE)),
                None => path.line_to(segment.to),
            }
        }
        path
    }

    /// Points along the arc, at most `max_step` radians apart.
    pub fn sample(&self, max_step: f64) -> Vec<Point> {
        let (center, radius, sweep) = match *self {
            ArcPath::Empty => return Vec::new(),
            ArcPath::Partial { center, radius, sweep, .. } => (center, radius, sweep),
            ArcPath::Full { center, radius } => (center, radius, TAU),
        };

        let count = (sweep / max_step.max(1e-3)).ceil().max(1.0) as usize;
        (0..=count)
            .map(|i| polar(center, radius, START_ANGLE + sweep * i as f64 / count as f64))
            .collect()
    }
}
