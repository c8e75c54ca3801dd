//! Deploy diagnostics: a startup banner plus listeners that log resource
//! load failures, script errors and unhandled promise rejections.

use crate::core::diagnostics::{categorize_rejection, is_media_tag, is_tracked_resource};
use crate::core::SiteConfig;
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub fn install(config: &SiteConfig) {
    let Some(window) = web::window() else {
        return;
    };
    log_banner(&window, config);

    // capture phase so resource errors (which do not bubble) are seen
    let on_error = Closure::wrap(Box::new(move |ev: web::Event| {
        report_error_event(&ev);
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback_and_bool(
        "error",
        on_error.as_ref().unchecked_ref(),
        true,
    );
    on_error.forget();

    let target: &web::EventTarget = window.unchecked_ref();
    dom::add_listener::<web::PromiseRejectionEvent>(target, "unhandledrejection", |ev| {
        report_rejection(&ev.reason());
    });
    dom::add_listener::<web::Event>(target, "load", |_| {
        log::info!("[diagnostics] all resources loaded");
    });

    if let Some(document) = window.document() {
        if document.ready_state() == "loading" {
            let doc_target: &web::EventTarget = document.unchecked_ref();
            dom::add_listener::<web::Event>(doc_target, "DOMContentLoaded", |_| {
                log::info!("[diagnostics] DOM ready");
            });
        } else {
            log::info!("[diagnostics] DOM already ready");
        }
    }
    log::info!("[diagnostics] error handlers and resource monitors registered");
}

fn log_banner(window: &web::Window, config: &SiteConfig) {
    let href = window.location().href().unwrap_or_default();
    let agent = window.navigator().user_agent().unwrap_or_default();
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    log::info!("[diagnostics] app starting");
    log::info!("[diagnostics] timestamp: {}", String::from(js_sys::Date::new_0().to_iso_string()));
    log::info!("[diagnostics] base url: {}", config.base_path);
    log::info!("[diagnostics] audio source: {}", config.audio_source);
    log::info!("[diagnostics] location: {}", href);
    log::info!("[diagnostics] user agent: {}", agent);
    log::info!("[diagnostics] viewport: {}x{}", width, height);
}

fn report_error_event(ev: &web::Event) {
    let target = ev.target().and_then(|t| t.dyn_into::<web::Element>().ok());
    if let Some(el) = target {
        let tag = el.tag_name().to_ascii_lowercase();
        if is_tracked_resource(&tag) {
            let src = el
                .get_attribute("src")
                .or_else(|| el.get_attribute("href"))
                .unwrap_or_default();
            let base_uri = el.base_uri().ok().flatten().unwrap_or_default();
            if is_media_tag(&tag) {
                if let Some(media) = el.dyn_ref::<web::HtmlMediaElement>() {
                    log::error!(
                        "[diagnostics] resource load failure tag={} src={} current_src={} base={} network_state={} ready_state={} media_error={:?} hint=check the asset exists and is served as audio, not HTML",
                        tag,
                        src,
                        media.current_src(),
                        base_uri,
                        media.network_state(),
                        media.ready_state(),
                        media.error().map(|e| (e.code(), e.message())),
                    );
                    return;
                }
            }
            log::error!(
                "[diagnostics] resource load failure tag={} src={} base={}",
                tag,
                src,
                base_uri
            );
            return;
        }
    }

    if let Some(err) = ev.dyn_ref::<web::ErrorEvent>() {
        log::error!(
            "[diagnostics] script error: {} at {}:{}:{} ({:?})",
            err.message(),
            err.filename(),
            err.lineno(),
            err.colno(),
            err.error()
        );
    }
}

fn report_rejection(reason: &JsValue) {
    let (name, message) = match reason.dyn_ref::<js_sys::Error>() {
        Some(e) => (String::from(e.name()), String::from(e.message())),
        None => (String::new(), format!("{:?}", reason)),
    };
    let category = categorize_rejection(&name, &message);
    log::error!(
        "[diagnostics] unhandled rejection name={} message={} category={}",
        name,
        message,
        category.map(|c| c.as_str()).unwrap_or("none")
    );
    if let Some(hint) = category.and_then(|c| c.hint()) {
        log::error!("[diagnostics] hint: {}", hint);
    }
}
