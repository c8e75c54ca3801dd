//! Valentine greeting page compiled to WebAssembly.
//!
//! `core` holds the target-independent logic and is built everywhere so it
//! can be tested on the host; the DOM bindings only exist on `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod diagnostics;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod widgets;

#[cfg(target_arch = "wasm32")]
mod app {
    use super::{audio, diagnostics, dom, overlay, widgets};
    use crate::core::SiteConfig;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("valentine-web starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    async fn init() -> anyhow::Result<()> {
        let config = SiteConfig::from_build_env();
        diagnostics::install(&config);

        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let reduced_motion = dom::prefers_reduced_motion();

        widgets::mount_hearts(&document, reduced_motion);
        widgets::mount_petals(&document, reduced_motion);
        widgets::start_one_liners(&document, reduced_motion);
        widgets::wire_surprise(&document);

        let music = audio::create_controller(&config);
        audio::wire_controls(&document, &music);
        audio::wire_page_lifecycle(&music, &config);

        let music_on_accept = music.clone();
        overlay::wire(&document, reduced_motion, move || {
            audio::activate(&music_on_accept, &config);
        });

        if let Some(year) = document.get_element_by_id("year") {
            let now = js_sys::Date::new_0().get_full_year();
            year.set_text_content(Some(&now.to_string()));
        }
        Ok(())
    }
}
