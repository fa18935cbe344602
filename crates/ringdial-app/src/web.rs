//! WebAssembly entry point and DOM bindings.
//!
//! Every picker mounted into the same container element shares that
//! element's `<svg>` and its readout row; both are looked up before being
//! created. Document-level move and release listeners exist only while a
//! handle is being dragged.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kurbo::{Point, Rect, Size};
use ringdial_core::render::style;
use ringdial_core::{
    InputSurface, PickerConfig, PickerVisuals, RadialPicker, RawPointer, RenderCommand,
    SurfaceMapping,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, MouseEvent, TouchEvent,
    TouchList,
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const READOUT_CONTAINER_SELECTOR: &str = ".value-display-container";

thread_local! {
    static INPUT: InputSurface = InputSurface::new();
}

fn input_surface() -> InputSurface {
    INPUT.with(InputSurface::clone)
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

type Handler = fn(&Rc<RefCell<Mounted>>, Event);

/// An event listener that stays registered until detached.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        passive: Option<bool>,
        mounted: Weak<RefCell<Mounted>>,
        handler: Handler,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            if let Some(mounted) = mounted.upgrade() {
                handler(&mounted, event);
            }
        }) as Box<dyn FnMut(Event)>);

        match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    callback.as_ref().unchecked_ref(),
                    &options,
                )?;
            }
            None => {
                target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
            }
        }

        Ok(Self { target, kind, callback })
    }

    fn detach(&self) {
        if self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("Failed to remove {} listener", self.kind);
        }
    }
}

/// DOM nodes owned by one picker.
struct Nodes {
    svg: Element,
    group: Element,
    track: Element,
    arc: Element,
    handle: Element,
    readout: Element,
}

/// A picker mounted into the DOM.
struct Mounted {
    picker: RadialPicker,
    nodes: Nodes,
    element_listeners: Vec<Listener>,
    document_listeners: Vec<Listener>,
    /// Detached listeners whose closure may still be running.
    retired: Vec<Listener>,
    destroyed: bool,
}

impl Mounted {
    /// Mapping for the surface as laid out now. The shared view box is
    /// resized by later mounts, so it is read on every event.
    fn mapping(&self) -> Option<SurfaceMapping> {
        let rect = self.nodes.svg.get_bounding_client_rect();
        let view_box = self
            .nodes
            .svg
            .get_attribute("viewBox")
            .and_then(|attribute| SurfaceMapping::parse_view_box(&attribute))?;
        SurfaceMapping::with_view_box(
            Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom()),
            view_box,
        )
    }

    fn surface_position(&self, event: &Event) -> Option<Point> {
        let mapping = self.mapping()?;
        with_raw_pointer(event, |raw| mapping.map(raw)).flatten()
    }

    fn apply(&self, command: &RenderCommand) {
        let handle = &self.nodes.handle;
        let result = handle
            .set_attribute("cx", &command.handle.x.to_string())
            .and_then(|()| handle.set_attribute("cy", &command.handle.y.to_string()))
            .and_then(|()| self.nodes.arc.set_attribute("d", &command.arc_d));
        if result.is_err() {
            log::warn!("Failed to update picker {}", command.picker);
        }
        self.nodes.readout.set_text_content(Some(&command.readout));
    }

    fn retire_document_listeners(&mut self) {
        for listener in self.document_listeners.drain(..) {
            listener.detach();
            self.retired.push(listener);
        }
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.picker.detach();
        self.retire_document_listeners();
        for listener in self.element_listeners.drain(..) {
            listener.detach();
        }
        self.nodes.group.remove();
        self.nodes.readout.remove();
    }
}

fn with_raw_pointer<R>(event: &Event, f: impl FnOnce(&RawPointer) -> R) -> Option<R> {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let touches = touch_points(&touch.touches());
        let changed = touch_points(&touch.changed_touches());
        Some(f(&RawPointer::Touch { touches: &touches, changed: &changed }))
    } else {
        event.dyn_ref::<MouseEvent>().map(|mouse| {
            f(&RawPointer::Mouse {
                client: Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
            })
        })
    }
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn on_drag_start(mounted: &Rc<RefCell<Mounted>>, event: Event) {
    let weak = Rc::downgrade(mounted);
    let Ok(mut m) = mounted.try_borrow_mut() else {
        return;
    };
    if m.destroyed {
        return;
    }
    event.prevent_default();
    // Nothing from a previous drag is running now.
    m.retired.clear();

    if !m.picker.begin_drag(&input_surface()) {
        return;
    }
    match attach_document_listeners(weak) {
        Ok(listeners) => m.document_listeners = listeners,
        Err(err) => {
            log::warn!("Failed to attach drag listeners: {err:?}");
            m.picker.end_drag();
        }
    }
}

fn on_drag_move(mounted: &Rc<RefCell<Mounted>>, event: Event) {
    let Ok(mut m) = mounted.try_borrow_mut() else {
        return;
    };
    if event.dyn_ref::<TouchEvent>().is_some() {
        // Keep the page from scrolling under the finger.
        event.prevent_default();
    }
    let Some(position) = m.surface_position(&event) else {
        return;
    };
    if let Some(command) = m.picker.drag_to(position) {
        m.apply(&command);
    }
}

fn on_drag_end(mounted: &Rc<RefCell<Mounted>>, _event: Event) {
    let Ok(mut m) = mounted.try_borrow_mut() else {
        return;
    };
    m.picker.end_drag();
    m.retire_document_listeners();
}

fn on_click(mounted: &Rc<RefCell<Mounted>>, event: Event) {
    let Ok(mut m) = mounted.try_borrow_mut() else {
        return;
    };
    let Some(position) = m.surface_position(&event) else {
        return;
    };
    if let Some(command) = m.picker.click_at(position) {
        m.apply(&command);
    }
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| js_error("No document available"))
}

fn attach_document_listeners(mounted: Weak<RefCell<Mounted>>) -> Result<Vec<Listener>, JsValue> {
    let target: EventTarget = document()?.into();
    let specs: [(&'static str, Option<bool>, Handler); 5] = [
        ("mousemove", None, on_drag_move),
        ("mouseup", None, on_drag_end),
        ("touchmove", Some(false), on_drag_move),
        ("touchend", None, on_drag_end),
        ("touchcancel", None, on_drag_end),
    ];
    specs
        .into_iter()
        .map(|(kind, passive, handler)| {
            Listener::attach(target.clone(), kind, passive, mounted.clone(), handler)
        })
        .collect()
}

fn set_attributes(element: &Element, attributes: &[(&str, &str)]) -> Result<(), JsValue> {
    for (name, value) in attributes {
        element.set_attribute(name, value)?;
    }
    Ok(())
}

fn svg_element(document: &Document, tag: &str, attributes: &[(&str, &str)]) -> Result<Element, JsValue> {
    let element = document.create_element_ns(Some(SVG_NS), tag)?;
    set_attributes(&element, attributes)?;
    Ok(element)
}

/// Find the container's drawing surface or create it, sizing its view box.
fn drawing_surface(document: &Document, container: &Element, side: f64) -> Result<Element, JsValue> {
    let svg = match container.query_selector("svg")? {
        Some(svg) => svg,
        None => {
            let svg = svg_element(document, "svg", &[("width", "100%")])?;
            container.append_child(&svg)?;
            log::debug!("Created drawing surface");
            svg
        }
    };
    svg.set_attribute("viewBox", &format!("0 0 {side} {side}"))?;
    Ok(svg)
}

/// Find the container's readout row or create it.
fn readout_area(document: &Document, container: &Element) -> Result<Element, JsValue> {
    if let Some(area) = container.query_selector(READOUT_CONTAINER_SELECTOR)? {
        return Ok(area);
    }
    let area = document.create_element("div")?;
    set_attributes(
        &area,
        &[
            ("class", "value-display-container"),
            (
                "style",
                "display: flex; flex-wrap: wrap; justify-content: center; gap: 2.5rem; margin-top: 0.5rem",
            ),
        ],
    )?;
    container.append_child(&area)?;
    log::debug!("Created readout area");
    Ok(area)
}

fn build_nodes(document: &Document, container: &Element, visuals: &PickerVisuals, side: f64) -> Result<Nodes, JsValue> {
    let svg = drawing_surface(document, container, side)?;
    let area = readout_area(document, container)?;

    let color = visuals.color.to_css();
    let (cx, cy, r) = (
        visuals.center.x.to_string(),
        visuals.center.y.to_string(),
        visuals.radius.to_string(),
    );
    let track_width = visuals.track_width.to_string();
    let handle_radius = visuals.handle_radius.to_string();
    let [gradient_from, gradient_to] = style::TRACK_GRADIENT;
    let shadow_blur = style::SHADOW_STD_DEVIATION.to_string();
    let shadow_opacity = style::SHADOW_OPACITY.to_string();
    let arc_opacity = style::ARC_OPACITY.to_string();
    let gradient_url = format!("url(#{})", visuals.gradient_id);
    let filter_url = format!("url(#{})", visuals.filter_id);

    let group = svg_element(document, "g", &[])?;
    let defs = svg_element(document, "defs", &[])?;

    let gradient = svg_element(
        document,
        "linearGradient",
        &[("id", visuals.gradient_id.as_str()), ("x1", "0%"), ("y1", "0%"), ("x2", "100%"), ("y2", "100%")],
    )?;
    gradient.append_child(&svg_element(document, "stop", &[("offset", "0%"), ("stop-color", gradient_from)])?)?;
    gradient.append_child(&svg_element(document, "stop", &[("offset", "100%"), ("stop-color", gradient_to)])?)?;
    defs.append_child(&gradient)?;

    let filter = svg_element(
        document,
        "filter",
        &[("id", visuals.filter_id.as_str()), ("x", "-50%"), ("y", "-50%"), ("width", "200%"), ("height", "200%")],
    )?;
    filter.append_child(&svg_element(
        document,
        "feDropShadow",
        &[
            ("dx", "0"),
            ("dy", "0"),
            ("stdDeviation", shadow_blur.as_str()),
            ("flood-color", style::SHADOW_COLOR),
            ("flood-opacity", shadow_opacity.as_str()),
        ],
    )?)?;
    defs.append_child(&filter)?;
    group.append_child(&defs)?;

    let track = svg_element(
        document,
        "circle",
        &[
            ("class", "track"),
            ("cx", cx.as_str()),
            ("cy", cy.as_str()),
            ("r", r.as_str()),
            ("fill", "none"),
            ("stroke", gradient_url.as_str()),
            ("stroke-width", track_width.as_str()),
            ("filter", filter_url.as_str()),
        ],
    )?;
    let arc = svg_element(
        document,
        "path",
        &[
            ("class", "arc"),
            ("fill", "none"),
            ("stroke", color.as_str()),
            ("stroke-width", track_width.as_str()),
            ("stroke-opacity", arc_opacity.as_str()),
        ],
    )?;
    let handle = svg_element(
        document,
        "circle",
        &[("class", "handle"), ("r", handle_radius.as_str()), ("fill", color.as_str())],
    )?;
    group.append_child(&track)?;
    group.append_child(&arc)?;
    group.append_child(&handle)?;

    let readout = document.create_element("div")?;
    readout.set_attribute(
        "style",
        &format!(
            "font-family: {}; font-size: {}; font-weight: bold; color: {color}; margin-bottom: 5px; width: {}ch; text-align: center",
            style::READOUT_FONT_FAMILY,
            style::READOUT_FONT_SIZE,
            visuals.readout_width_ch,
        ),
    )?;

    svg.append_child(&group)?;
    if let Err(err) = area.append_child(&readout) {
        group.remove();
        return Err(err);
    }

    Ok(Nodes { svg, group, track, arc, handle, readout })
}

/// Attach the handle and track listeners, keeping each one in `mounted` as
/// soon as it is registered so a failed mount can detach them.
fn attach_element_listeners(mounted: &Rc<RefCell<Mounted>>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(mounted);
    let mut m = mounted.borrow_mut();
    let handle: EventTarget = m.nodes.handle.clone().into();
    let track: EventTarget = m.nodes.track.clone().into();
    let arc: EventTarget = m.nodes.arc.clone().into();

    let wanted: [(EventTarget, &'static str, Option<bool>, Handler); 4] = [
        (handle.clone(), "mousedown", None, on_drag_start),
        (handle, "touchstart", Some(false), on_drag_start),
        (track, "click", None, on_click),
        (arc, "click", None, on_click),
    ];
    for (target, kind, passive, handler) in wanted {
        let listener = Listener::attach(target, kind, passive, weak.clone(), handler)?;
        m.element_listeners.push(listener);
    }
    Ok(())
}

/// A radial value picker mounted into a DOM element.
#[wasm_bindgen]
pub struct RadialValuePicker {
    mounted: Rc<RefCell<Mounted>>,
}

#[wasm_bindgen]
impl RadialValuePicker {
    /// Mount a picker into `container`.
    ///
    /// `options` accepts `color`, `min`, `max`, `step` and `radius`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element, options: JsValue) -> Result<RadialValuePicker, JsValue> {
        let config: PickerConfig = serde_wasm_bindgen::from_value(options)?;
        let size = Size::new(f64::from(container.client_width()), f64::from(container.client_height()));
        let picker = RadialPicker::new(&config, size).map_err(js_error)?;

        let document = document()?;
        let view_side = size.width.min(size.height);
        let nodes = build_nodes(&document, &container, picker.visuals(), view_side)?;

        let mounted = Rc::new(RefCell::new(Mounted {
            picker,
            nodes,
            element_listeners: Vec::new(),
            document_listeners: Vec::new(),
            retired: Vec::new(),
            destroyed: false,
        }));

        if let Err(err) = attach_element_listeners(&mounted) {
            // Nothing stays on the page from a failed mount.
            mounted.borrow_mut().destroy();
            return Err(err);
        }

        {
            let mut m = mounted.borrow_mut();
            let command = m.picker.render();
            m.apply(&command);
            log::info!("Mounted picker {}", m.picker.id());
        }

        Ok(RadialValuePicker { mounted })
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.mounted.borrow().picker.value()
    }

    /// Set the value; it is snapped onto the step grid and clamped into the
    /// range. Returns the stored value.
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, value: f64) -> f64 {
        let mut m = self.mounted.borrow_mut();
        if let Some(command) = m.picker.set_value(value) {
            m.apply(&command);
        }
        m.picker.value()
    }

    /// The current handle position, arc and readout as a plain object.
    #[wasm_bindgen(js_name = renderCommand)]
    pub fn render_command(&self) -> Result<JsValue, JsValue> {
        let command = self.mounted.borrow().picker.render();
        Ok(serde_wasm_bindgen::to_value(&command)?)
    }

    /// Remove the picker's nodes and listeners. Safe to call repeatedly.
    pub fn destroy(&self) {
        if let Ok(mut m) = self.mounted.try_borrow_mut() {
            m.destroy();
        }
    }
}

impl Drop for RadialValuePicker {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Initialize logging for the WASM module.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("RingDial (WASM) ready");
}
