//! Pointer and wheel handling on the canvas, feeding the orbit controls.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlCanvasElement, PointerEvent, WheelEvent};

use crate::{listen, Viewer};

const BUTTON_PRIMARY: i16 = 0;
const BUTTON_SECONDARY: i16 = 2;

#[derive(Default)]
struct Drag {
    button: Option<i16>,
    last: (i32, i32),
}

pub(crate) fn attach(canvas: &HtmlCanvasElement, viewer: Rc<RefCell<Viewer>>) -> Result<(), JsValue> {
    let drag = Rc::new(RefCell::new(Drag::default()));

    {
        let drag = drag.clone();
        let canvas_for_capture = canvas.clone();
        listen(canvas, "pointerdown", move |event: Event| {
            let Some(ev) = event.dyn_ref::<PointerEvent>() else { return };
            let mut drag = drag.borrow_mut();
            drag.button = Some(ev.button());
            drag.last = (ev.client_x(), ev.client_y());
            // Keep receiving moves when the pointer leaves the canvas mid-drag.
            if let Err(err) = canvas_for_capture.set_pointer_capture(ev.pointer_id()) {
                log::debug!("pointer capture failed: {:?}", err);
            }
        })?;
    }

    {
        let drag = drag.clone();
        let viewer = viewer.clone();
        listen(canvas, "pointermove", move |event: Event| {
            let Some(ev) = event.dyn_ref::<PointerEvent>() else { return };
            let mut drag = drag.borrow_mut();
            let Some(button) = drag.button else { return };
            let (x, y) = (ev.client_x(), ev.client_y());
            let dx = (x - drag.last.0) as f32;
            let dy = (y - drag.last.1) as f32;
            drag.last = (x, y);

            let mut viewer = viewer.borrow_mut();
            match button {
                BUTTON_PRIMARY => viewer.stage.orbit_drag(dx, dy),
                BUTTON_SECONDARY => viewer.stage.pan_drag(dx, dy),
                _ => {}
            }
        })?;
    }

    for name in ["pointerup", "pointercancel"] {
        let drag = drag.clone();
        listen(canvas, name, move |_: Event| {
            drag.borrow_mut().button = None;
        })?;
    }

    {
        let viewer = viewer.clone();
        listen(canvas, "wheel", move |event: Event| {
            let Some(ev) = event.dyn_ref::<WheelEvent>() else { return };
            ev.prevent_default();
            viewer.borrow_mut().stage.wheel(ev.delta_y() as f32);
        })?;
    }

    // Right-drag pans; keep the browser menu out of the way.
    listen(canvas, "contextmenu", |event: Event| event.prevent_default())?;

    Ok(())
}
