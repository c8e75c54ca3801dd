pub mod assets;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod evade;
pub mod music;
pub mod preflight;
pub mod widgets;

pub use assets::{is_external, AssetResolver, AudioUrlResolver};
pub use config::SiteConfig;
pub use error::{ConfigError, MediaErrorCode, PlayRejection, TransportError};
pub use evade::{evade_offset, EvadeParams, EvasionController, Rect};
pub use music::{classify_playback_failure, MediaElement, MusicController, MusicState, Toggled};
pub use preflight::{
    check_audio_asset, has_mp3_signature, AssetProbe, PreflightErrorKind, PreflightResult,
    ProbeMethod, ProbeResponse,
};
