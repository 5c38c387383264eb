//! Hook lifecycle: per-element state and the browser binding.
//!
//! [`HookCore`] holds everything one canvas element needs across its lifetime
//! (templates, the latest `data-ops`, the redraw scheduler, the viewport) and
//! draws through any [`Surface`], so it is tested without a browser.
//! [`EaselHook`] is the `wasm-bindgen` export that owns the element, its 2D
//! context, the animation-frame closure and the DOM listeners.
//!
//! The JavaScript side is a thin hook object that forwards to it:
//!
//! ```js
//! mounted() {
//!   this.easel = new EaselHook(this.el, (event, payload) => this.pushEvent(event, payload));
//!   this.handleEvent(this.easel.drawEvent(), (payload) => this.easel.draw(payload));
//!   this.handleEvent(this.easel.clearEvent(), () => this.easel.clear());
//! },
//! updated() { this.easel.updated(); },
//! destroyed() { this.easel.destroyed(); this.easel.free(); },
//! ```

#[cfg(test)]
#[path = "hook_test.rs"]
mod hook_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent};

use crate::command::{Command, Rect};
use crate::config::HookConfig;
use crate::consts::EVENT_NAMESPACE;
use crate::error::{DrawError, HookError};
use crate::input::{Forward, KeyPayload, Modifiers, Point, PointerPayload, event_name};
use crate::interp::{Report, execute};
use crate::op::{DrawPayload, Op, Templates};
use crate::schedule::RedrawScheduler;
use crate::surface::Surface;
use crate::viewport::{Resize, Viewport};

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Per-element hook state, independent of the browser.
#[derive(Debug)]
pub struct HookCore {
    /// DOM id of the canvas; scopes host event names.
    pub id: String,
    pub templates: Templates,
    /// Latest `data-ops`, replayed on every full redraw.
    pub ops: Vec<Op>,
    /// DOM event types forwarded to the host.
    pub events: Vec<String>,
    pub scheduler: RedrawScheduler,
    pub viewport: Viewport,
}

impl HookCore {
    #[must_use]
    pub fn new(id: impl Into<String>, config: HookConfig, viewport: Viewport) -> Self {
        Self {
            id: id.into(),
            templates: config.templates,
            ops: config.ops,
            events: config.events,
            scheduler: RedrawScheduler::new(),
            viewport,
        }
    }

    /// Host event carrying `{ops, templates?}` for this element.
    #[must_use]
    pub fn draw_event(&self) -> String {
        format!("{EVENT_NAMESPACE}:{}:draw", self.id)
    }

    /// Host event that clears this element's canvas.
    #[must_use]
    pub fn clear_event(&self) -> String {
        format!("{EVENT_NAMESPACE}:{}:clear", self.id)
    }

    /// Take the attributes of a patched element: new ops replace the old,
    /// templates merge.
    pub fn apply_attributes(&mut self, ops: Vec<Op>, templates: Templates) {
        self.ops = ops;
        self.templates.merge(templates);
    }

    /// Handle a `draw` event: merge its templates, then interpret its ops on
    /// top of whatever is already on the canvas.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S, payload: DrawPayload) -> Report {
        if let Some(templates) = payload.templates {
            self.templates.merge(templates);
        }
        execute(surface, &self.templates, &payload.ops)
    }

    /// Clear the whole backing buffer, ignoring the current transform.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError`] if the surface rejects a call. Context state is
    /// restored either way.
    pub fn clear<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<(), DrawError> {
        surface.apply(&Command::Save)?;
        let cleared = surface
            .apply(&Command::SetTransform(IDENTITY))
            .and_then(|()| surface.apply(&Command::ClearRect(self.buffer_rect())));
        let restored = surface.apply(&Command::Restore);
        cleared.and(restored)
    }

    /// Full redraw: clear, apply the DPR transform, replay the latest ops.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError`] if clearing or transforming fails; op failures
    /// are counted in the [`Report`] instead.
    pub fn redraw<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<Report, DrawError> {
        self.scheduler.clear_dirty();
        surface.apply(&Command::SetTransform(IDENTITY))?;
        surface.apply(&Command::ClearRect(self.buffer_rect()))?;
        surface.apply(&Command::SetTransform(self.viewport.transform()))?;
        Ok(execute(surface, &self.templates, &self.ops))
    }

    fn buffer_rect(&self) -> Rect {
        let (width, height) = self.viewport.backing_size();
        Rect { x: 0.0, y: 0.0, width: f64::from(width), height: f64::from(height) }
    }
}

/// State shared between the hook and its animation-frame callback.
struct Mounted {
    core: HookCore,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Mounted {
    fn full_redraw(&mut self) {
        let current = (self.canvas.width(), self.canvas.height());
        if let Some(resize) = self.core.viewport.sync(device_pixel_ratio(), current) {
            if let Err(err) = apply_resize(&self.canvas, &resize) {
                log::error!("failed to resize canvas {}: {err}", self.core.id);
            }
        }
        match self.core.redraw(&mut self.ctx) {
            Ok(report) => log::debug!("redrew {}: {report:?}", self.core.id),
            Err(err) => log::error!("redraw of {} failed: {err}", self.core.id),
        }
    }

    fn on_frame(&mut self) {
        if self.core.scheduler.on_frame() {
            self.full_redraw();
        }
    }
}

type Listener = Closure<dyn FnMut(Event)>;

/// Browser binding for one canvas element.
#[wasm_bindgen]
pub struct EaselHook {
    canvas: HtmlCanvasElement,
    state: Rc<RefCell<Mounted>>,
    frame: Closure<dyn FnMut(f64)>,
    listeners: Vec<(String, Listener)>,
}

#[wasm_bindgen]
impl EaselHook {
    /// Mount on `canvas`. `push_event(name, payload)` relays input to the host.
    ///
    /// # Errors
    ///
    /// Throws if the element has no 2D context or a `data-*` attribute holds
    /// malformed JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, push_event: js_sys::Function) -> Result<EaselHook, JsValue> {
        Self::mount(canvas, &push_event).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = drawEvent)]
    #[must_use]
    pub fn draw_event(&self) -> String {
        self.state.borrow().core.draw_event()
    }

    #[wasm_bindgen(js_name = clearEvent)]
    #[must_use]
    pub fn clear_event(&self) -> String {
        self.state.borrow().core.clear_event()
    }

    /// Host `draw` event.
    pub fn draw(&self, payload: JsValue) {
        let payload = match decode_payload(&payload) {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("dropping draw payload: {err}");
                return;
            }
        };
        let mut state = self.state.borrow_mut();
        let Mounted { core, ctx, .. } = &mut *state;
        let report = core.draw(ctx, payload);
        log::debug!("drew {}: {report:?}", core.id);
    }

    /// Host `clear` event.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        let Mounted { core, ctx, .. } = &mut *state;
        if let Err(err) = core.clear(ctx) {
            log::error!("failed to clear {}: {err}", core.id);
        }
    }

    /// The host patched the element: re-read its attributes and schedule a
    /// redraw for the next animation frame.
    ///
    /// # Errors
    ///
    /// Throws if a `data-*` attribute holds malformed JSON.
    pub fn updated(&self) -> Result<(), JsValue> {
        let dataset = self.canvas.dataset();
        let config = HookConfig::from_attributes(|key| dataset.get(key))?;

        let mut state = self.state.borrow_mut();
        state.core.apply_attributes(config.ops, config.templates);

        let Some(window) = web_sys::window() else {
            state.full_redraw();
            return Ok(());
        };
        let frame = &self.frame;
        let requested = state
            .core
            .scheduler
            .mark_dirty(|| window.request_animation_frame(frame.as_ref().unchecked_ref()));
        if let Err(err) = requested {
            log::warn!("no animation frame, redrawing now: {}", HookError::from(err));
            state.full_redraw();
        }
        Ok(())
    }

    /// Teardown: cancel any pending frame and detach the input listeners.
    pub fn destroyed(&mut self) {
        if let Some(handle) = self.state.borrow_mut().core.scheduler.cancel() {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.cancel_animation_frame(handle) {
                    log::warn!("failed to cancel frame {handle}: {}", HookError::from(err));
                }
            }
        }
        for (event_type, listener) in self.listeners.drain(..) {
            if let Err(err) = self
                .canvas
                .remove_event_listener_with_callback(&event_type, listener.as_ref().unchecked_ref())
            {
                log::warn!("failed to detach {event_type} listener: {}", HookError::from(err));
            }
        }
    }
}

impl EaselHook {
    fn mount(canvas: HtmlCanvasElement, push_event: &js_sys::Function) -> Result<Self, HookError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(HookError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HookError::NoContext)?;

        let dataset = canvas.dataset();
        let config = HookConfig::from_attributes(|key| dataset.get(key))?;
        let events = config.events.clone();
        let viewport = Viewport::new(f64::from(canvas.width()), f64::from(canvas.height()));
        let core = HookCore::new(canvas.id(), config, viewport);

        let state = Rc::new(RefCell::new(Mounted { core, canvas: canvas.clone(), ctx }));
        state.borrow_mut().full_redraw();

        let frame_state = Rc::clone(&state);
        let frame = Closure::wrap(Box::new(move |_ts: f64| {
            frame_state.borrow_mut().on_frame();
        }) as Box<dyn FnMut(f64)>);

        let mut hook = Self { canvas, state, frame, listeners: Vec::new() };
        for event_type in &events {
            hook.listen(event_type, push_event);
        }
        Ok(hook)
    }

    fn listen(&mut self, event_type: &str, push_event: &js_sys::Function) {
        let name = event_name(&self.canvas.id(), event_type);
        let forward = Forward::for_event(event_type);
        let canvas = self.canvas.clone();
        let push = push_event.clone();

        let listener = Closure::wrap(Box::new(move |event: Event| {
            let pushed = match forward {
                Forward::Key => match event.dyn_ref::<KeyboardEvent>() {
                    Some(e) => push_to_host(&push, &name, &key_payload(e)),
                    None => return,
                },
                Forward::Pointer => match event.dyn_ref::<MouseEvent>() {
                    Some(e) => push_to_host(&push, &name, &pointer_payload(&canvas, e)),
                    None => {
                        log::debug!("{name}: event has no pointer coordinates");
                        return;
                    }
                },
            };
            if let Err(err) = pushed {
                log::error!("failed to forward {name}: {err}");
            }
        }) as Box<dyn FnMut(Event)>);

        if let Err(err) = self
            .canvas
            .add_event_listener_with_callback(event_type, listener.as_ref().unchecked_ref())
        {
            log::error!("failed to listen for {event_type}: {}", HookError::from(err));
            return;
        }
        self.listeners.push((event_type.to_owned(), listener));
    }
}

fn key_payload(event: &KeyboardEvent) -> KeyPayload {
    KeyPayload {
        key: event.key(),
        code: event.code(),
        modifiers: Modifiers {
            ctrl: event.ctrl_key(),
            shift: event.shift_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    }
}

fn pointer_payload(canvas: &HtmlCanvasElement, event: &MouseEvent) -> PointerPayload {
    let rect = canvas.get_bounding_client_rect();
    PointerPayload::from_client(
        Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        Point::new(rect.left(), rect.top()),
    )
}

fn push_to_host(push: &js_sys::Function, name: &str, payload: &impl Serialize) -> Result<(), HookError> {
    let value = js_sys::JSON::parse(&serde_json::to_string(payload)?)?;
    push.call2(&JsValue::NULL, &JsValue::from_str(name), &value)?;
    Ok(())
}

fn decode_payload(value: &JsValue) -> Result<DrawPayload, HookError> {
    let json = js_sys::JSON::stringify(value)?
        .as_string()
        .ok_or_else(|| HookError::Js("draw payload is not JSON-serializable".to_owned()))?;
    Ok(serde_json::from_str(&json)?)
}

fn apply_resize(canvas: &HtmlCanvasElement, resize: &Resize) -> Result<(), HookError> {
    canvas.set_width(resize.width);
    canvas.set_height(resize.height);
    let style = canvas.style();
    style.set_property("width", &resize.css_width)?;
    style.set_property("height", &resize.css_height)?;
    Ok(())
}

fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}
