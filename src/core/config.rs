use super::constants::MUSIC_VOLUME;

pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_AUDIO_SOURCE: &str = "audio/i-wanna-be-yours.mp3";

/// Deployment settings baked in at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Sub-path the site is served from; asset URLs are built under it.
    pub base_path: String,
    /// Either an absolute `http(s)://` URL or a logical asset path.
    pub audio_source: String,
    pub music_volume: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            audio_source: DEFAULT_AUDIO_SOURCE.to_string(),
            music_volume: MUSIC_VOLUME,
        }
    }
}

impl SiteConfig {
    /// Read `VALENTINE_BASE_URL` and `VALENTINE_AUDIO_SOURCE` from the build
    /// environment, falling back to the defaults when unset or blank.
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("VALENTINE_BASE_URL"),
            option_env!("VALENTINE_AUDIO_SOURCE"),
        )
    }

    pub fn from_values(base_path: Option<&str>, audio_source: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = non_blank(base_path) {
            config.base_path = base.to_string();
        }
        if let Some(source) = non_blank(audio_source) {
            config.audio_source = source.to_string();
        }
        config
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_audio_source(mut self, audio_source: impl Into<String>) -> Self {
        self.audio_source = audio_source.into();
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
