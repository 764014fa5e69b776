use crate::input;
use pleat_core::PointerState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Track the pointer over `canvas` into `pointer`. Leaving the canvas
/// recentres it.
pub fn wire_pointer(canvas: &web::HtmlCanvasElement, pointer: Rc<RefCell<PointerState>>) {
    wire_pointermove(canvas, Rc::clone(&pointer));
    wire_pointerleave(canvas, pointer);
}

fn wire_pointermove(canvas: &web::HtmlCanvasElement, pointer: Rc<RefCell<PointerState>>) {
    let target = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let rect = target.get_bounding_client_rect();
        let pos = input::pointer_from_client(
            ev.client_x() as f32,
            ev.client_y() as f32,
            [
                rect.left() as f32,
                rect.top() as f32,
                rect.width() as f32,
                rect.height() as f32,
            ],
        );
        pointer.borrow_mut().set(pos);
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerleave(canvas: &web::HtmlCanvasElement, pointer: Rc<RefCell<PointerState>>) {
    let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        pointer.borrow_mut().left();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
    closure.forget();
}
