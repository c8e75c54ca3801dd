use crate::core::constants::{ONE_LINER_INTERVAL_MS, PETAL_STATIC_COUNT, REVEAL_DELAY_MS};
use crate::core::widgets::{
    floating_hearts, rose_petals, OneLinerTicker, SurpriseReveal, ONE_LINERS,
};
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn spawn_glyph(
    document: &web::Document,
    parent: &web::Element,
    class: &str,
    glyph: &str,
) -> Option<web::HtmlElement> {
    let el = document
        .create_element("div")
        .ok()?
        .dyn_into::<web::HtmlElement>()
        .ok()?;
    el.set_class_name(class);
    el.set_text_content(Some(glyph));
    _ = parent.append_child(&el);
    Some(el)
}

pub fn mount_hearts(document: &web::Document, reduced_motion: bool) {
    let Some(layer) = document.get_element_by_id("floating-hearts") else {
        return;
    };
    let hearts = floating_hearts(&mut rand::thread_rng(), reduced_motion);
    for heart in &hearts {
        if let Some(el) = spawn_glyph(document, &layer, "floating-heart", "❤️") {
            dom::set_style(&el, "left", &format!("{}%", heart.left_pct));
            dom::set_style(&el, "animation-delay", &format!("{}s", heart.delay_s));
            dom::set_style(&el, "animation-duration", &format!("{}s", heart.duration_s));
            dom::set_style(&el, "width", &format!("{}px", heart.size_px));
            dom::set_style(&el, "height", &format!("{}px", heart.size_px));
        }
    }
    log::debug!("[widgets] {} hearts", hearts.len());
}

pub fn mount_petals(document: &web::Document, reduced_motion: bool) {
    let Some(layer) = document.get_element_by_id("rose-petals") else {
        return;
    };
    if reduced_motion {
        for _ in 0..PETAL_STATIC_COUNT {
            spawn_glyph(document, &layer, "rose-static", "🌹");
        }
        return;
    }
    for petal in rose_petals(&mut rand::thread_rng()) {
        if let Some(el) = spawn_glyph(document, &layer, "rose-petal", "🌹") {
            dom::set_style(&el, "left", &format!("{}%", petal.left_pct));
            dom::set_style(&el, "animation-delay", &format!("{}s", petal.delay_s));
            dom::set_style(&el, "animation-duration", &format!("{}s", petal.duration_s));
            dom::set_style(&el, "width", &format!("{}px", petal.size_px));
            dom::set_style(&el, "height", &format!("{}px", petal.size_px));
            dom::set_style(&el, "--drift", &format!("{}px", petal.drift_px));
            dom::set_style(&el, "--rotation", &format!("{}deg", petal.rotation_deg));
        }
    }
}

pub fn start_one_liners(document: &web::Document, reduced_motion: bool) {
    let Some(text) = document.get_element_by_id("one-liner") else {
        return;
    };
    let ticker = Rc::new(RefCell::new(OneLinerTicker::new(ONE_LINERS.len(), reduced_motion)));
    text.set_text_content(Some(ONE_LINERS[0]));

    if let Some(badge) = document.get_element_by_id("one-liner-badge") {
        let target: &web::EventTarget = badge.unchecked_ref();
        let enter = ticker.clone();
        dom::add_listener::<web::MouseEvent>(target, "mouseenter", move |_| {
            enter.borrow_mut().set_paused(true);
        });
        let leave = ticker.clone();
        dom::add_listener::<web::MouseEvent>(target, "mouseleave", move |_| {
            leave.borrow_mut().set_paused(false);
        });
    }

    if reduced_motion {
        return;
    }
    dom::set_interval(ONE_LINER_INTERVAL_MS, move || {
        let mut t = ticker.borrow_mut();
        if t.tick() {
            text.set_text_content(Some(ONE_LINERS[t.index()]));
        }
    });
}

pub fn wire_surprise(document: &web::Document) {
    let reveal = Rc::new(RefCell::new(SurpriseReveal::default()));
    dom::add_click_listener(document, "surprise-button", move || {
        if !reveal.borrow_mut().click() {
            return;
        }
        if let Some(button) = dom::window_document()
            .and_then(|d| dom::by_id::<web::HtmlButtonElement>(&d, "surprise-button"))
        {
            button.set_disabled(true);
        }
        let reveal = reveal.clone();
        dom::set_timeout(REVEAL_DELAY_MS, move || {
            reveal.borrow_mut().finish();
            let Some(doc) = dom::window_document() else {
                return;
            };
            if let Some(teaser) = doc.get_element_by_id("surprise-teaser") {
                dom::set_hidden(&teaser, true);
            }
            if let Some(panel) = doc.get_element_by_id("surprise-panel") {
                dom::set_hidden(&panel, false);
            }
            log::info!("[widgets] surprise revealed");
        });
    });
}
