mod app;
mod canvas;
mod colors;
mod config;
mod provider;
mod render_loop;

use leptos::mount::mount_to;
use leptos::prelude::*;
use std::any::Any;
use std::cell::RefCell;
use wasm_bindgen::JsCast;

use crate::app::App;

thread_local! {
    static APP_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

fn main() {
    console_error_panic_hook::set_once();
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let mount_target = document
        .get_element_by_id("map")
        .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body());
    let Some(target) = mount_target else {
        return;
    };
    let map_style = config::load_style(&target);

    APP_MOUNT_HANDLE.with(move |slot| {
        // Drop a previous mount so its provider binding and effects stop first.
        let _old = slot.borrow_mut().take();
        let handle = mount_to(target, move || view! { <App map_style=map_style /> });
        *slot.borrow_mut() = Some(Box::new(handle));
    });
}
