//! DOM listeners feeding the mask session.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, MouseEvent, Touch, TouchEvent,
    Window,
};

use super::render;
use crate::session::MaskSession;

type Shared = Rc<RefCell<MaskSession>>;

fn listen(
    target: &EventTarget,
    kind: &str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

/// Client coordinates relative to the canvas, CSS pixels.
fn relative(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f32, f32) {
    let rect = canvas.get_bounding_client_rect();
    ((client_x - rect.left()) as f32, (client_y - rect.top()) as f32)
}

fn changed_touches(event: &Event) -> Vec<Touch> {
    let Some(list) = event.dyn_ref::<TouchEvent>().map(TouchEvent::changed_touches) else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

pub fn attach(window: &Window, canvas: &HtmlCanvasElement, session: Shared) -> Result<(), JsValue> {
    {
        let window_ = window.clone();
        let canvas = canvas.clone();
        let session = session.clone();
        listen(window.as_ref(), "resize", true, move |_| {
            match render::viewport(&window_) {
                Ok(viewport) => {
                    render::fit_canvas(&canvas, &viewport);
                    session.borrow_mut().resize(viewport);
                }
                Err(e) => warn!("resize ignored: {e:?}"),
            }
        })?;
    }

    {
        let canvas_ = canvas.clone();
        let session = session.clone();
        listen(canvas.as_ref(), "mousemove", true, move |event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = relative(&canvas_, event.client_x() as f64, event.client_y() as f64);
            session.borrow_mut().pointer_move(x, y);
        })?;
    }

    {
        let canvas_ = canvas.clone();
        let session = session.clone();
        listen(canvas.as_ref(), "touchstart", false, move |event| {
            for touch in changed_touches(&event) {
                let (x, y) = relative(&canvas_, touch.client_x() as f64, touch.client_y() as f64);
                if session.borrow_mut().touch_start(touch.identifier(), x, y) {
                    // Keep the page from scrolling under the drag.
                    event.prevent_default();
                    break;
                }
            }
        })?;
    }

    {
        let canvas_ = canvas.clone();
        let session = session.clone();
        listen(canvas.as_ref(), "touchmove", false, move |event| {
            if !session.borrow().tracker().is_dragging() {
                return;
            }
            event.prevent_default();
            for touch in changed_touches(&event) {
                let (x, y) = relative(&canvas_, touch.client_x() as f64, touch.client_y() as f64);
                session.borrow_mut().touch_move(touch.identifier(), x, y);
            }
        })?;
    }

    for kind in ["touchend", "touchcancel"] {
        let session = session.clone();
        listen(canvas.as_ref(), kind, true, move |event| {
            for touch in changed_touches(&event) {
                session.borrow_mut().touch_end(touch.identifier());
            }
        })?;
    }

    Ok(())
}
