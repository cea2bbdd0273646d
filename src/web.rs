//! Browser Glue
//!
//! Binds a [`SignaturePad`] to an `HtmlCanvasElement`: a Canvas2D-backed
//! [`DrawingSurface`], a DOM-backed [`SurfaceLayout`], and the mouse, touch
//! and window-resize listeners. Listeners are closures bound once at attach
//! time and removed again by `dispose()` (or on drop).
//!
//! Nothing here is global. Host pages attach a pad to the canvas they choose
//! and keep the returned handle.

use std::cell::RefCell;
use std::rc::Rc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlFormElement,
    HtmlInputElement, MouseEvent, TouchEvent as DomTouchEvent,
};

use crate::config::{PadConfig, StrokeStyle};
use crate::error::{PadError, PadResult};
use crate::input::{Point, PointerEventType, SurfaceRect, TouchEvent};
use crate::pad::SignaturePad;
use crate::surface::{DrawingSurface, SurfaceLayout, PNG_DATA_URL_PREFIX};
use crate::validation::SubmitGuard;

fn js_err(value: JsValue) -> PadError {
    PadError::Surface(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

// =============================================================
// Surface and layout
// =============================================================

/// [`DrawingSurface`] over a canvas element's 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the canvas's 2D context
    ///
    /// # Errors
    ///
    /// Returns [`PadError::Surface`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> PadResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| PadError::Surface("canvas has no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PadError::Surface("2d context has unexpected type".to_string()))?;
        Ok(Self { canvas, ctx })
    }
}

impl DrawingSurface for CanvasSurface {
    fn resize(&mut self, width: u32, height: u32) -> PadResult<()> {
        // Setting either dimension reallocates the backing store and resets
        // the context, current path included.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn apply_style(&mut self, style: &StrokeStyle) -> PadResult<()> {
        self.ctx.set_stroke_style_str(&style.css_color);
        self.ctx.set_line_width(style.width);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        Ok(())
    }

    fn begin_path(&mut self, point: Point) {
        self.ctx.begin_path();
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point) {
        self.ctx.line_to(point.x, point.y);
        self.ctx.stroke();
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn encode_png(&self) -> PadResult<Vec<u8>> {
        let url = self.to_data_url()?;
        let payload = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| PadError::Encode("canvas did not return a PNG data URL".to_string()))?;
        STANDARD.decode(payload).map_err(|e| PadError::Encode(e.to_string()))
    }

    fn to_data_url(&self) -> PadResult<String> {
        self.canvas.to_data_url_with_type("image/png").map_err(js_err)
    }
}

/// [`SurfaceLayout`] read live from the DOM
pub struct DomLayout {
    canvas: HtmlCanvasElement,
}

impl DomLayout {
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl SurfaceLayout for DomLayout {
    fn surface_rect(&self) -> SurfaceRect {
        let rect = self.canvas.get_bounding_client_rect();
        SurfaceRect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn container_width(&self) -> f64 {
        match self.canvas.parent_element() {
            Some(parent) => parent.get_bounding_client_rect().width(),
            None => {
                log::warn!("Canvas has no parent element, sizing from the canvas itself");
                self.canvas.get_bounding_client_rect().width()
            }
        }
    }
}

// =============================================================
// Listener bookkeeping
// =============================================================

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        event: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> PadResult<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(js_err)?;
        Ok(Self { target: target.clone(), event, callback })
    }

    fn remove(self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::error!("Failed to remove {} listener: {:?}", self.event, err);
        }
    }
}

fn remove_all(listeners: &mut Vec<Listener>) {
    for listener in listeners.drain(..) {
        listener.remove();
    }
}

// =============================================================
// Pad handle
// =============================================================

pub type WebPad = SignaturePad<CanvasSurface, DomLayout>;

fn mouse_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn touch_event(event: &DomTouchEvent, event_type: PointerEventType) -> TouchEvent {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect();
    TouchEvent::new(event_type, touches)
}

/// A signature pad attached to a canvas element
#[wasm_bindgen]
pub struct SignaturePadHandle {
    pad: Rc<RefCell<WebPad>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SignaturePadHandle {
    /// Attach a pad to `canvas`
    ///
    /// `options_json` is a JSON object such as `{"strokeColor": "#000000",
    /// "strokeWidth": 2}`. Returns `undefined` without touching anything when
    /// no canvas is given, so callers check for a handle themselves.
    ///
    /// # Errors
    ///
    /// Throws if the options are invalid or the canvas has no 2D context.
    pub fn attach(
        canvas: Option<HtmlCanvasElement>,
        options_json: Option<String>,
    ) -> Result<Option<SignaturePadHandle>, JsError> {
        let Some(canvas) = canvas else {
            log::info!("No canvas supplied, signature pad not attached");
            return Ok(None);
        };
        let config = match options_json {
            Some(json) => PadConfig::from_json(&json)?,
            None => PadConfig::default(),
        };
        Ok(Some(Self::attach_with_config(canvas, config)?))
    }

    /// Attach a pad to the canvas with the given element id, if there is one
    ///
    /// # Errors
    ///
    /// Same as [`SignaturePadHandle::attach`].
    #[wasm_bindgen(js_name = attachById)]
    pub fn attach_by_id(
        id: &str,
        options_json: Option<String>,
    ) -> Result<Option<SignaturePadHandle>, JsError> {
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|doc| doc.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        Self::attach(canvas, options_json)
    }

    /// Erase the drawing and forget its points
    pub fn clear(&self) {
        self.pad.borrow_mut().clear();
    }

    /// Whether nothing has been drawn
    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.pad.borrow().is_empty()
    }

    /// Whether a stroke is in progress
    #[wasm_bindgen(js_name = isDrawing)]
    pub fn is_drawing(&self) -> bool {
        self.pad.borrow().is_drawing()
    }

    /// Number of captured points
    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.pad.borrow().points().len()
    }

    /// PNG data URI of the current drawing
    ///
    /// # Errors
    ///
    /// Throws if the canvas refuses to encode (e.g. it is tainted).
    #[wasm_bindgen(js_name = toDataURL)]
    pub fn to_data_url(&self) -> Result<String, JsError> {
        Ok(self.pad.borrow().to_data_url()?)
    }

    /// Re-measure the container and reallocate the canvas
    ///
    /// # Errors
    ///
    /// Throws if the canvas cannot be restyled.
    pub fn resize(&self) -> Result<(), JsError> {
        Ok(self.pad.borrow_mut().resize()?)
    }

    /// Remove every listener this pad registered. Safe to call twice.
    pub fn dispose(&mut self) {
        if !self.listeners.is_empty() {
            log::info!("Disposing signature pad ({} listeners)", self.listeners.len());
        }
        remove_all(&mut self.listeners);
    }
}

impl SignaturePadHandle {
    /// Attach with an already-parsed configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas has no 2D context, the configuration is
    /// invalid, or a listener cannot be registered.
    pub fn attach_with_config(canvas: HtmlCanvasElement, config: PadConfig) -> PadResult<Self> {
        let window = web_sys::window().ok_or_else(|| PadError::Surface("no window".to_string()))?;
        let surface = CanvasSurface::new(canvas.clone())?;
        let pad = SignaturePad::new(surface, DomLayout::new(canvas.clone()), config)?;
        let mut handle = Self { pad: Rc::new(RefCell::new(pad)), listeners: Vec::new() };

        if let Err(err) = handle.bind(&canvas, &window) {
            // Leave nothing half-attached.
            handle.dispose();
            return Err(err);
        }
        Ok(handle)
    }

    /// Shared access to the pad, for host code written in Rust
    pub fn pad(&self) -> Rc<RefCell<WebPad>> {
        Rc::clone(&self.pad)
    }

    fn bind(&mut self, canvas: &HtmlCanvasElement, window: &web_sys::Window) -> PadResult<()> {
        let mouse = [
            ("mousedown", PointerEventType::Down),
            ("mousemove", PointerEventType::Move),
            ("mouseup", PointerEventType::Up),
        ];
        for (name, event_type) in mouse {
            let pad = Rc::clone(&self.pad);
            self.listeners.push(Listener::add(canvas, name, move |event: Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let mut pad = pad.borrow_mut();
                match event_type {
                    PointerEventType::Down => pad.on_pointer_down(mouse_point(mouse)),
                    PointerEventType::Move => pad.on_pointer_move(mouse_point(mouse)),
                    PointerEventType::Up => pad.on_pointer_up(),
                }
            })?);
        }

        let touch = [
            ("touchstart", PointerEventType::Down),
            ("touchmove", PointerEventType::Move),
            ("touchend", PointerEventType::Up),
        ];
        for (name, event_type) in touch {
            let pad = Rc::clone(&self.pad);
            self.listeners.push(Listener::add(canvas, name, move |event: Event| {
                let Some(touch) = event.dyn_ref::<DomTouchEvent>() else {
                    return;
                };
                // Touch drawing must not scroll the page.
                event.prevent_default();
                pad.borrow_mut().dispatch_touch(&touch_event(touch, event_type));
            })?);
        }

        let pad = Rc::clone(&self.pad);
        self.listeners.push(Listener::add(window, "resize", move |_event: Event| {
            if let Err(err) = pad.borrow_mut().resize() {
                log::error!("Signature pad resize failed: {err}");
            }
        })?);

        log::info!("Signature pad bound {} listeners", self.listeners.len());
        Ok(())
    }
}

impl Drop for SignaturePadHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================
// Form submit guard
// =============================================================

/// A form `submit` listener enforcing a required signature
#[wasm_bindgen]
pub struct SubmitGuardHandle {
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl SubmitGuardHandle {
    /// Remove the submit listener. Safe to call twice.
    pub fn dispose(&mut self) {
        remove_all(&mut self.listeners);
    }
}

impl Drop for SubmitGuardHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Guard `form` submission on the pad having a signature
///
/// The signature is required while `required` is checked; with no checkbox it
/// is always required. A blocked submission is cancelled and `message` (or
/// the default) is shown in an alert. An allowed submission with ink on the
/// pad writes the PNG data URI into `target`, if given.
///
/// # Errors
///
/// Throws if the submit listener cannot be registered.
#[wasm_bindgen(js_name = attachSubmitGuard)]
pub fn attach_submit_guard(
    form: &HtmlFormElement,
    pad: &SignaturePadHandle,
    required: Option<HtmlInputElement>,
    target: Option<HtmlInputElement>,
    message: Option<String>,
) -> Result<SubmitGuardHandle, JsError> {
    let guard = message.map(SubmitGuard::new).unwrap_or_default();
    let pad = pad.pad();

    let listener = Listener::add(form, "submit", move |event: Event| {
        let signature_required = required.as_ref().map_or(true, HtmlInputElement::checked);
        let is_empty = pad.borrow().is_empty();

        if let Err(err) = guard.check(signature_required, is_empty) {
            event.prevent_default();
            if let Some(window) = web_sys::window() {
                if let Err(js) = window.alert_with_message(&err.to_string()) {
                    log::error!("Failed to show alert: {js:?}");
                }
            }
            return;
        }

        let Some(target) = &target else {
            return;
        };
        if is_empty {
            target.set_value("");
            return;
        }
        match pad.borrow().to_data_url() {
            Ok(url) => target.set_value(&url),
            Err(err) => log::error!("Failed to export signature: {err}"),
        }
    })?;

    Ok(SubmitGuardHandle { listeners: vec![listener] })
}
