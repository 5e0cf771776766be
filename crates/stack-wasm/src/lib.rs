//! Browser front end for the stacked-primitives scene.
//!
//! `start` wires everything to a canvas: WebGL2 geometry, the debug panel,
//! orbit input, window resizing and a `requestAnimationFrame` loop. Hosts that
//! prefer to drive the loop themselves can use [`StackViewer`] directly.

mod input;
mod panel;
mod webgl;

use std::cell::RefCell;
use std::rc::Rc;

use stack_core::config::SceneConfig;
use stack_core::params::ParamKey;
use stack_core::scene::DrawItem;
use stack_core::{SceneError, Stage};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, Window};

use panel::DebugPanel;
use webgl::{GpuMesh, WebGlBackend};

pub(crate) struct Viewer {
    pub(crate) stage: Stage<WebGlBackend>,
    canvas: HtmlCanvasElement,
    panel: Option<DebugPanel>,
}

impl Viewer {
    fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let backend = WebGlBackend::new(&canvas).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        let stage = Stage::new(SceneConfig::default(), backend, width, height, 1.0).map_err(to_js)?;
        Ok(Self {
            stage,
            canvas,
            panel: None,
        })
    }

    /// Match the canvas to the window, like a full-page renderer.
    fn fit_window(&mut self, window: &Window) -> Result<(), JsValue> {
        let width = window.inner_width()?.as_f64().unwrap_or(1.0);
        let height = window.inner_height()?.as_f64().unwrap_or(1.0);
        self.resize(width as u32, height as u32, window.device_pixel_ratio() as f32)
    }

    fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> Result<(), JsValue> {
        let (buffer_width, buffer_height) = self.stage.resize(width, height, device_pixel_ratio);
        self.canvas.set_width(buffer_width);
        self.canvas.set_height(buffer_height);
        self.canvas.set_attribute(
            "style",
            &format!("display:block;width:{}px;height:{}px", width, height),
        )
    }

    fn change(&mut self, key: ParamKey, value: f32) -> Result<f32, SceneError> {
        let report = self.stage.scene.on_parameter_change(key, value)?;
        if report.rebuilt {
            log::debug!(
                "{} = {} moved {:?}",
                report.key,
                report.value,
                report.offsets
            );
        }
        Ok(report.delta)
    }

    fn frame(&mut self) {
        let frame = self.stage.tick();
        let scene = &self.stage.scene;
        let items: Vec<DrawItem<'_, GpuMesh>> = scene.draw_items().collect();
        scene.backend().draw(&frame, &scene.config().light, &items);
    }
}

/// Handle to a running scene, exported to JavaScript.
#[wasm_bindgen]
pub struct StackViewer {
    inner: Rc<RefCell<Viewer>>,
}

#[wasm_bindgen]
impl StackViewer {
    /// Build the scene on `canvas` without installing any listeners or loop.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<StackViewer, JsValue> {
        let viewer = Viewer::new(canvas)?;
        Ok(StackViewer {
            inner: Rc::new(RefCell::new(viewer)),
        })
    }

    /// Ids accepted by `set_parameter`, e.g. `"cube.size"`.
    pub fn parameter_ids() -> js_sys::Array {
        ParamKey::ALL
            .into_iter()
            .map(|key| JsValue::from_str(key.id()))
            .collect()
    }

    /// Apply a parameter value and return its delta from the previous value.
    ///
    /// The value is clamped and snapped to the slider's range and step first,
    /// exactly as a slider drag would report it.
    pub fn set_parameter(&self, id: &str, value: f32) -> Result<f32, JsValue> {
        let key = ParamKey::from_id(id).ok_or_else(|| to_js(SceneError::UnknownParameter(id.to_owned())))?;
        let value = key.spec().sanitize(value);
        let mut viewer = self.inner.borrow_mut();
        let delta = viewer.change(key, value).map_err(to_js)?;
        if let Some(panel) = &viewer.panel {
            panel.sync(key, value);
        }
        Ok(delta)
    }

    pub fn parameter_value(&self, id: &str) -> Result<f32, JsValue> {
        let key = ParamKey::from_id(id).ok_or_else(|| to_js(SceneError::UnknownParameter(id.to_owned())))?;
        Ok(self.inner.borrow().stage.scene.parameter(key))
    }

    /// Y of the top of the stack, for hosts that place overlays above it.
    pub fn stack_top(&self) -> f32 {
        self.inner.borrow().stage.scene.stack_top()
    }

    /// Meshes currently held on the GPU; stays at six while the page runs.
    pub fn live_meshes(&self) -> usize {
        self.inner.borrow().stage.scene.backend().live_meshes()
    }

    pub fn resize(&self, width: u32, height: u32, device_pixel_ratio: f32) -> Result<(), JsValue> {
        self.inner.borrow_mut().resize(width, height, device_pixel_ratio)
    }

    pub fn orbit_drag(&self, dx: f32, dy: f32) {
        self.inner.borrow_mut().stage.orbit_drag(dx, dy);
    }

    pub fn pan_drag(&self, dx: f32, dy: f32) {
        self.inner.borrow_mut().stage.pan_drag(dx, dy);
    }

    pub fn wheel(&self, delta_y: f32) {
        self.inner.borrow_mut().stage.wheel(delta_y);
    }

    pub fn set_panel_visible(&self, visible: bool) -> Result<(), JsValue> {
        match &self.inner.borrow().panel {
            Some(panel) => panel.set_visible(visible),
            None => Ok(()),
        }
    }

    /// Update the controls and draw one frame.
    pub fn frame(&self) {
        self.inner.borrow_mut().frame();
    }
}

/// Boot the scene on the canvas matching `canvas_selector` (e.g. `"canvas.webgl"`):
/// debug panel, orbit input, window resizing and the animation loop.
#[wasm_bindgen]
pub fn start(canvas_selector: &str) -> Result<StackViewer, JsValue> {
    console_error_panic_hook::set_once();
    // A second `start` on the same page finds the logger already installed.
    console_log::init_with_level(log::Level::Info).ok();

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas = document
        .query_selector(canvas_selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches `{}`", canvas_selector)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("`{}` is not a canvas", canvas_selector)))?;

    let viewer = Rc::new(RefCell::new(Viewer::new(canvas.clone())?));
    viewer.borrow_mut().fit_window(&window)?;

    let panel = {
        let viewer = viewer.clone();
        let values = viewer.borrow().stage.scene.params().clone();
        DebugPanel::mount(&document, &values, move |key, value| {
            if let Err(err) = viewer.borrow_mut().change(key, value) {
                log::error!("{}", err);
            }
        })?
    };
    viewer.borrow_mut().panel = Some(panel);

    {
        let viewer = viewer.clone();
        let resize_window = window.clone();
        listen(&window, "resize", move |_: Event| {
            if let Err(err) = viewer.borrow_mut().fit_window(&resize_window) {
                log::error!("resize failed: {:?}", err);
            }
        })?;
    }

    input::attach(&canvas, viewer.clone())?;
    run_frame_loop(viewer.clone())?;

    log::info!("stacked scene running on `{}`", canvas_selector);
    Ok(StackViewer { inner: viewer })
}

/// Call `frame` once per animation frame for the lifetime of the page.
fn run_frame_loop(viewer: Rc<RefCell<Viewer>>) -> Result<(), JsValue> {
    // The closure re-schedules itself, so it keeps a handle to its own slot.
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let self_slot = slot.clone();

    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        viewer.borrow_mut().frame();
        if let Some(callback) = self_slot.borrow().as_ref() {
            if let Err(err) = request_animation_frame(callback) {
                log::error!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = slot.borrow().as_ref() {
        request_animation_frame(callback)?;
    }
    Ok(())
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("no window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
pub(crate) fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn to_js(err: SceneError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
