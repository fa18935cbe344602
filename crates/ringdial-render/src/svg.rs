//! SVG/HTML markup renderer.
//!
//! Produces the same node structure a browser host builds: one `<svg>` per
//! container, one `<g>` per picker holding its gradient and shadow
//! definitions plus track, arc and handle, and a shared readout row below.

use std::fmt;

use ringdial_core::geometry::polar;
use ringdial_core::render::style;
use ringdial_core::{PickerId, PickerVisuals, RenderCommand, START_ANGLE};

use crate::renderer::{PickerSlot, RenderModel, RenderResult, Renderer};

/// Class of the shared readout row.
pub const READOUT_CONTAINER_CLASS: &str = "value-display-container";

/// Renders mounted pickers to static markup.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    model: RenderModel,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &RenderModel {
        &self.model
    }

    /// The full markup: drawing surface followed by the readout row.
    pub fn markup(&self) -> String {
        self.to_string()
    }

    fn write_svg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = num(self.model.view_side());
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {side} {side}" width="100%">"#
        )?;
        for slot in self.model.slots() {
            write_picker(f, slot)?;
        }
        writeln!(f, "</svg>")
    }

    fn write_readouts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<div class="{READOUT_CONTAINER_CLASS}" style="display: flex; flex-wrap: wrap; justify-content: center; gap: 2.5rem; margin-top: 0.5rem">"#
        )?;
        for slot in self.model.slots() {
            let text = slot.command.as_ref().map(|c| c.readout.as_str()).unwrap_or_default();
            writeln!(
                f,
                r#"  <div data-picker="{}" style="font-family: {}; font-size: {}; font-weight: bold; color: {}; margin-bottom: 5px; width: {}ch; text-align: center">{}</div>"#,
                slot.visuals.picker,
                style::READOUT_FONT_FAMILY,
                style::READOUT_FONT_SIZE,
                slot.visuals.color.to_css(),
                slot.visuals.readout_width_ch,
                text,
            )?;
        }
        writeln!(f, "</div>")
    }
}

impl fmt::Display for SvgRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_svg(f)?;
        self.write_readouts(f)
    }
}

impl Renderer for SvgRenderer {
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

fn write_picker(f: &mut fmt::Formatter<'_>, slot: &PickerSlot) -> fmt::Result {
    let v = &slot.visuals;
    let color = v.color.to_css();
    let (cx, cy, r) = (num(v.center.x), num(v.center.y), num(v.radius));
    let track_width = num(v.track_width);

    // Before the first update the handle rests at the minimum.
    let handle = slot
        .command
        .as_ref()
        .map(|c| c.handle)
        .unwrap_or_else(|| polar(v.center, v.radius, START_ANGLE));
    let arc_d = slot.command.as_ref().map(|c| c.arc_d.as_str()).unwrap_or_default();

    let [from, to] = style::TRACK_GRADIENT;
    writeln!(f, r#"  <g data-picker="{}">"#, v.picker)?;
    writeln!(f, "    <defs>")?;
    writeln!(
        f,
        r#"      <linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="100%"><stop offset="0%" stop-color="{from}"/><stop offset="100%" stop-color="{to}"/></linearGradient>"#,
        v.gradient_id,
    )?;
    writeln!(
        f,
        r#"      <filter id="{}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="0" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
        v.filter_id,
        style::SHADOW_STD_DEVIATION,
        style::SHADOW_COLOR,
        style::SHADOW_OPACITY,
    )?;
    writeln!(f, "    </defs>")?;
    writeln!(
        f,
        r#"    <circle class="track" cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="url(#{})" stroke-width="{track_width}" filter="url(#{})"/>"#,
        v.gradient_id, v.filter_id,
    )?;
    writeln!(
        f,
        r#"    <path class="arc" d="{arc_d}" fill="none" stroke="{color}" stroke-width="{track_width}" stroke-opacity="{}"/>"#,
        style::ARC_OPACITY,
    )?;
    writeln!(
        f,
        r#"    <circle class="handle" cx="{}" cy="{}" r="{}" fill="{color}"/>"#,
        num(handle.x),
        num(handle.y),
        num(v.handle_radius),
    )?;
    writeln!(f, "  </g>")
}

/// Attribute number: three decimals at most, no `-0`.
fn num(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}
