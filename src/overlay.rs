use crate::core::{EvasionController, Rect};
use crate::dom;
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const OVERLAY_ID: &str = "intro-overlay";
const AREA_ID: &str = "evade-area";
const NO_BUTTON_ID: &str = "no-button";
const YES_BUTTON_ID: &str = "yes-button";
const REDUCED_MOTION_NOTE_ID: &str = "reduced-motion-note";

#[inline]
fn rect_of(el: &web::Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

#[derive(Clone)]
struct EvadeWiring {
    area: web::HtmlElement,
    button: web::HtmlButtonElement,
    controller: Rc<RefCell<EvasionController>>,
}

impl EvadeWiring {
    fn render(&self) {
        let ctl = self.controller.borrow();
        let now = Instant::now();
        dom::set_style(&self.button, "transform", &ctl.transform_css());
        dom::set_style(&self.button, "transition", ctl.transition_css(now));
        dom::set_style(
            &self.button,
            "pointer-events",
            if ctl.is_clickable() { "auto" } else { "none" },
        );
        self.button.set_disabled(!ctl.is_clickable());
    }

    fn on_pointer(&self, client_x: f32, client_y: f32) {
        let container = rect_of(&self.area).size;
        let element = rect_of(&self.button);
        let moved = self.controller.borrow_mut().on_pointer(
            Vec2::new(client_x, client_y),
            element,
            container,
            Instant::now(),
        );
        if moved {
            self.render();
            let cooldown = self.controller.borrow().cooldown().as_millis() as u32;
            let after = self.clone();
            dom::set_timeout(cooldown, move || after.render());
        }
    }
}

/// Show and wire the consent overlay. `on_accept` runs once the "Yes"
/// button is clicked and the overlay has been hidden.
pub fn wire(document: &web::Document, reduced_motion: bool, mut on_accept: impl FnMut() + 'static) {
    if let Some(note) = document.get_element_by_id(REDUCED_MOTION_NOTE_ID) {
        dom::set_hidden(&note, !reduced_motion);
    }

    let area = dom::by_id::<web::HtmlElement>(document, AREA_ID);
    let button = dom::by_id::<web::HtmlButtonElement>(document, NO_BUTTON_ID);
    match (area, button) {
        (Some(area), Some(button)) => wire_evading_button(area, button, reduced_motion),
        _ => log::warn!("[evade] #{} or #{} missing; evasion disabled", AREA_ID, NO_BUTTON_ID),
    }

    let Some(overlay) = document.get_element_by_id(OVERLAY_ID) else {
        log::warn!("[overlay] #{} missing", OVERLAY_ID);
        return;
    };
    dom::set_hidden(&overlay, false);
    dom::add_click_listener(document, YES_BUTTON_ID, move || {
        if dom::is_hidden(&overlay) {
            return;
        }
        dom::set_hidden(&overlay, true);
        log::info!("[overlay] accepted");
        on_accept();
    });
}

fn wire_evading_button(area: web::HtmlElement, button: web::HtmlButtonElement, reduced_motion: bool) {
    let controller = Rc::new(RefCell::new(EvasionController::new(reduced_motion)));
    {
        let container = rect_of(&area).size;
        let element = rect_of(&button).size;
        controller.borrow_mut().center_in(container, element);
    }
    let wiring = EvadeWiring {
        area: area.clone(),
        button,
        controller,
    };
    wiring.render();
    if reduced_motion {
        log::info!("[evade] reduced motion requested; button stays in place");
        return;
    }

    let target: &web::EventTarget = area.unchecked_ref();
    let on_mouse = wiring.clone();
    dom::add_listener::<web::MouseEvent>(target, "mousemove", move |ev| {
        on_mouse.on_pointer(ev.client_x() as f32, ev.client_y() as f32);
    });
    let on_touch = wiring;
    dom::add_listener::<web::TouchEvent>(target, "touchmove", move |ev| {
        if let Some(touch) = ev.touches().get(0) {
            on_touch.on_pointer(touch.client_x() as f32, touch.client_y() as f32);
        }
    });
}
