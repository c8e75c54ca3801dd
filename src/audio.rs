use crate::core::constants::{ERROR_DISPLAY_MS, MUSIC_LOOP};
use crate::core::preflight::HeadBytes;
use crate::core::{
    check_audio_asset, AssetProbe, AssetResolver, AudioUrlResolver, MediaElement, MediaErrorCode,
    MusicController, MusicState, PlayRejection, ProbeMethod, ProbeResponse, SiteConfig,
    Toggled, TransportError,
};
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const TOGGLE_ID: &str = "music-toggle";
const ERROR_ID: &str = "music-error";
const ERROR_TEXT_ID: &str = "music-error-text";
const ERROR_DISMISS_ID: &str = "music-error-dismiss";

pub type SharedMusic = Rc<RefCell<MusicController<HtmlMedia>>>;

/// `<audio>` element driven by the music controller.
pub struct HtmlMedia {
    el: web::HtmlAudioElement,
}

impl HtmlMedia {
    pub fn new(url: &str, volume: f64) -> anyhow::Result<Self> {
        let el = web::HtmlAudioElement::new_with_src(url).map_err(|e| anyhow::anyhow!("{:?}", e))?;
        el.set_loop(MUSIC_LOOP);
        el.set_volume(volume);
        Ok(Self { el })
    }
}

impl MediaElement for HtmlMedia {
    type Pending = Result<js_sys::Promise, JsValue>;

    fn play(&mut self) -> Self::Pending {
        self.el.play()
    }

    fn pause(&mut self) {
        _ = self.el.pause();
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.el.set_current_time(seconds);
    }

    fn error_code(&self) -> Option<MediaErrorCode> {
        self.el.error().and_then(|e| MediaErrorCode::from_code(e.code()))
    }

    fn release(&mut self) {
        self.el.set_src("");
    }
}

fn rejection_from(err: JsValue) -> PlayRejection {
    match err.dyn_ref::<web::DomException>() {
        Some(ex) => PlayRejection::from_exception_name(&ex.name()),
        None => PlayRejection::Other(format!("{:?}", err)),
    }
}

async fn await_play(pending: Result<js_sys::Promise, JsValue>) -> Result<(), PlayRejection> {
    let promise = pending.map_err(rejection_from)?;
    JsFuture::from(promise).await.map(|_| ()).map_err(rejection_from)
}

/// Probe backed by `window.fetch`.
pub struct FetchProbe;

impl AssetProbe for FetchProbe {
    async fn send(&self, url: &str, method: ProbeMethod) -> Result<ProbeResponse, TransportError> {
        fetch_probe(url, method)
            .await
            .map_err(|e| TransportError::new(format!("{:?}", e)))
    }
}

async fn fetch_probe(url: &str, method: ProbeMethod) -> Result<ProbeResponse, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let opts = web::RequestInit::new();
    opts.set_method(method.http_method());
    if let Some(range) = method.range_header() {
        let headers = web::Headers::new()?;
        headers.set("Range", &range)?;
        opts.set_headers(&headers);
    }
    let request = web::Request::new_with_str_and_init(url, &opts)?;
    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let content_type = response.headers().get("content-type")?.unwrap_or_default();

    let mut body = HeadBytes::new();
    if let ProbeMethod::Range { read_body: true, .. } = method {
        let buffer = JsFuture::from(response.array_buffer()?).await?;
        let bytes = js_sys::Uint8Array::new(&buffer);
        let n = bytes.length().min(body.inline_size() as u32);
        body.extend((0..n).map(|i| bytes.get_index(i)));
    }

    Ok(ProbeResponse {
        status: response.status(),
        content_type,
        body,
    })
}

pub fn create_controller(config: &SiteConfig) -> SharedMusic {
    let resolver = AudioUrlResolver::new(AssetResolver::new(&config.base_path));
    let controller = match resolver.resolve(&config.audio_source) {
        Ok(url) => MusicController::new(url),
        Err(e) => {
            log::error!("[music] {}", e);
            MusicController::unavailable(e)
        }
    };
    Rc::new(RefCell::new(controller))
}

/// Create the audio element, show the toggle, and start the preflight.
pub fn activate(music: &SharedMusic, config: &SiteConfig) {
    let url = music.borrow().url().map(str::to_string);
    let Some(url) = url else {
        if let Some(err) = music.borrow_mut().take_config_error() {
            log::error!("[music] unavailable: {}", err);
            show_config_error("Background music is unavailable (audio source misconfigured).");
        }
        return;
    };

    match HtmlMedia::new(&url, config.music_volume) {
        Ok(media) => {
            music.borrow_mut().activate(media);
        }
        Err(e) => {
            log::error!("[music] could not create audio element: {:?}", e);
            return;
        }
    }
    render(music);

    let music_for_preflight = music.clone();
    spawn_local(async move {
        let result = check_audio_asset(&FetchProbe, &url).await;
        music_for_preflight.borrow_mut().record_preflight(result);
    });
}

pub fn wire_controls(document: &web::Document, music: &SharedMusic) {
    let music_toggle = music.clone();
    dom::add_click_listener(document, TOGGLE_ID, move || {
        // play() has to run inside this handler with no await before it
        let toggled = music_toggle.borrow_mut().toggle();
        if let Toggled::Playing { attempt, pending } = toggled {
            let music_settle = music_toggle.clone();
            spawn_local(async move {
                let outcome = await_play(pending).await;
                music_settle.borrow_mut().settle_play(attempt, outcome);
                schedule_error_expiry(&music_settle);
                render(&music_settle);
            });
        }
        render(&music_toggle);
    });

    let music_dismiss = music.clone();
    dom::add_click_listener(document, ERROR_DISMISS_ID, move || {
        music_dismiss.borrow_mut().dismiss_error();
        render(&music_dismiss);
    });
}

/// Stop the track when the page goes away and bring it back when the page
/// is restored from the back/forward cache.
pub fn wire_page_lifecycle(music: &SharedMusic, config: &SiteConfig) {
    let Some(window) = web::window() else {
        return;
    };
    let target: &web::EventTarget = window.unchecked_ref();

    let music_hide = music.clone();
    dom::add_listener::<web::Event>(target, "pagehide", move |_| {
        music_hide.borrow_mut().deactivate();
        render(&music_hide);
    });
    let music_show = music.clone();
    let config = config.clone();
    dom::add_listener::<web::PageTransitionEvent>(target, "pageshow", move |ev| {
        if !ev.persisted() || !music_show.borrow().is_suspended() {
            return;
        }
        log::info!("[music] page restored; recreating audio element");
        activate(&music_show, &config);
    });
    let music_unload = music.clone();
    dom::add_listener::<web::Event>(target, "beforeunload", move |_| {
        music_unload.borrow_mut().stop();
        render(&music_unload);
    });
}

fn schedule_error_expiry(music: &SharedMusic) {
    let seq = {
        let ctl = music.borrow();
        if !matches!(ctl.state(), MusicState::Error(_)) {
            return;
        }
        ctl.error_seq()
    };
    let music = music.clone();
    dom::set_timeout(ERROR_DISPLAY_MS as u32, move || {
        music.borrow_mut().expire_error(seq);
        render(&music);
    });
}

// Surfaced once; there is no controller state behind it to expire.
fn show_config_error(message: &str) {
    let Some(document) = dom::window_document() else {
        return;
    };
    if let Some(text) = document.get_element_by_id(ERROR_TEXT_ID) {
        text.set_text_content(Some(message));
    }
    if let Some(el) = document.get_element_by_id(ERROR_ID) {
        dom::set_hidden(&el, false);
    }
    dom::set_timeout(ERROR_DISPLAY_MS as u32, move || {
        if let Some(el) = dom::window_document().and_then(|d| d.get_element_by_id(ERROR_ID)) {
            dom::set_hidden(&el, true);
        }
    });
}

fn render(music: &SharedMusic) {
    let Some(document) = dom::window_document() else {
        return;
    };
    let ctl = music.borrow();

    if let Some(button) = document.get_element_by_id(TOGGLE_ID) {
        dom::set_hidden(&button, !ctl.is_active());
        let label = if ctl.is_muted() {
            "Unmute background music"
        } else {
            "Mute background music"
        };
        _ = button.set_attribute("aria-label", label);
        _ = button.set_attribute("aria-pressed", if ctl.is_muted() { "false" } else { "true" });
        button.set_text_content(Some(if ctl.is_muted() { "🔇" } else { "🔊" }));
    }

    let message = ctl.error_message().map(str::to_string);
    drop(ctl);
    match message {
        Some(message) => {
            if let Some(text) = document.get_element_by_id(ERROR_TEXT_ID) {
                text.set_text_content(Some(&message));
            }
            if let Some(el) = document.get_element_by_id(ERROR_ID) {
                dom::set_hidden(&el, false);
            }
        }
        None => {
            if let Some(el) = document.get_element_by_id(ERROR_ID) {
                dom::set_hidden(&el, true);
            }
        }
    }
}
