//! Mute/unmute state machine for the single looping background track.

use super::error::{ConfigError, MediaErrorCode, PlayRejection};
use super::preflight::{PreflightErrorKind, PreflightResult};

/// Media-playback primitive owned by the controller.
pub trait MediaElement {
    /// Handle for an in-flight `play()`; settled later via
    /// [`MusicController::settle_play`].
    type Pending;

    /// Start playback. Called synchronously from within the user-gesture
    /// handler, before any suspension point.
    fn play(&mut self) -> Self::Pending;
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn error_code(&self) -> Option<MediaErrorCode>;
    /// Drop the source so the browser stops buffering.
    fn release(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicState {
    Muted,
    Unmuted,
    Error(String),
}

pub enum Toggled<P> {
    /// Playback was requested; report the outcome with this attempt id.
    Playing { attempt: u64, pending: P },
    Paused,
    /// No track (inactive or misconfigured).
    Ignored,
}

pub struct MusicController<M: MediaElement> {
    url: Option<String>,
    media: Option<M>,
    state: MusicState,
    has_interacted: bool,
    attempt: u64,
    error_seq: u64,
    last_preflight: Option<PreflightResult>,
    config_error: Option<ConfigError>,
    config_error_reported: bool,
    suspended: bool,
}

impl<M: MediaElement> MusicController<M> {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            media: None,
            state: MusicState::Muted,
            has_interacted: false,
            attempt: 0,
            error_seq: 0,
            last_preflight: None,
            config_error: None,
            config_error_reported: false,
            suspended: false,
        }
    }

    /// Controller for a source that failed to resolve; it never plays.
    pub fn unavailable(err: ConfigError) -> Self {
        Self {
            url: None,
            media: None,
            state: MusicState::Muted,
            has_interacted: false,
            attempt: 0,
            error_seq: 0,
            last_preflight: None,
            config_error: Some(err),
            config_error_reported: false,
            suspended: false,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn state(&self) -> &MusicState {
        &self.state
    }

    pub fn is_muted(&self) -> bool {
        !matches!(self.state, MusicState::Unmuted)
    }

    pub fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    pub fn is_active(&self) -> bool {
        self.media.is_some()
    }

    /// True after [`deactivate`](Self::deactivate) dropped a live track; the
    /// page should call [`activate`](Self::activate) again when it is shown.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            MusicState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Sequence id of the currently shown error, for expiry timers.
    pub fn error_seq(&self) -> u64 {
        self.error_seq
    }

    pub fn last_preflight(&self) -> Option<&PreflightResult> {
        self.last_preflight.as_ref()
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// Returns the configuration error the first time it is asked for.
    pub fn take_config_error(&mut self) -> Option<&ConfigError> {
        if self.config_error_reported {
            return None;
        }
        self.config_error_reported = true;
        self.config_error.as_ref()
    }

    /// Take ownership of a freshly created media element.
    pub fn activate(&mut self, media: M) -> bool {
        if self.config_error.is_some() {
            log::warn!("[music] not activating: audio source is misconfigured");
            return false;
        }
        if let Some(mut old) = self.media.take() {
            old.pause();
            old.release();
        }
        self.media = Some(media);
        self.state = MusicState::Muted;
        self.suspended = false;
        true
    }

    /// Pause, rewind and dispose of the media element from any state.
    pub fn deactivate(&mut self) {
        if let Some(mut media) = self.media.take() {
            media.pause();
            media.set_current_time(0.0);
            media.release();
            self.suspended = true;
        }
        self.attempt += 1;
        self.state = MusicState::Muted;
    }

    /// Stop playback and rewind while keeping the element (e.g. on unload).
    pub fn stop(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.pause();
            media.set_current_time(0.0);
        }
        self.attempt += 1;
        self.state = MusicState::Muted;
    }

    /// Handle a click on the mute toggle. Playback, when requested, is
    /// started before this returns.
    pub fn toggle(&mut self) -> Toggled<M::Pending> {
        self.has_interacted = true;
        let Some(media) = self.media.as_mut() else {
            return Toggled::Ignored;
        };
        match self.state {
            MusicState::Unmuted => {
                media.pause();
                self.attempt += 1;
                self.state = MusicState::Muted;
                log::info!("[music] muted");
                Toggled::Paused
            }
            MusicState::Muted | MusicState::Error(_) => {
                let pending = media.play();
                self.attempt += 1;
                self.state = MusicState::Unmuted;
                log::info!("[music] play requested (attempt {})", self.attempt);
                Toggled::Playing {
                    attempt: self.attempt,
                    pending,
                }
            }
        }
    }

    /// Apply the outcome of a `play()` call. Outcomes for superseded
    /// attempts are ignored.
    pub fn settle_play(&mut self, attempt: u64, outcome: Result<(), PlayRejection>) {
        if attempt != self.attempt || self.state != MusicState::Unmuted {
            log::debug!("[music] ignoring stale playback outcome (attempt {})", attempt);
            return;
        }
        let Err(rejection) = outcome else {
            log::info!("[music] playing");
            return;
        };
        let media_error = self.media.as_ref().and_then(|m| m.error_code());
        if let Some(media) = self.media.as_mut() {
            media.pause();
        }
        let message = classify_playback_failure(self.last_preflight.as_ref(), Some(&rejection), media_error);
        log::error!(
            "[music] playback failed: rejection={:?} media_error={:?} preflight={:?} url={:?}",
            rejection,
            media_error,
            self.last_preflight.as_ref().and_then(|p| p.error_kind),
            self.url
        );
        self.error_seq += 1;
        self.state = MusicState::Error(message.to_string());
    }

    /// Record a preflight outcome if it still describes the current URL.
    pub fn record_preflight(&mut self, result: PreflightResult) -> bool {
        if self.url.as_deref() != Some(result.url.as_str()) {
            log::debug!("[music] discarding preflight for superseded url {}", result.url);
            return false;
        }
        if !result.success {
            log::warn!(
                "[music] preflight failed: {} ({})",
                result.error_kind.map(|k| k.as_str()).unwrap_or("unknown"),
                result.error_message.as_deref().unwrap_or("")
            );
        }
        self.last_preflight = Some(result);
        true
    }

    pub fn dismiss_error(&mut self) {
        if matches!(self.state, MusicState::Error(_)) {
            self.state = MusicState::Muted;
        }
    }

    /// Auto-hide the error with the given sequence id if it is still shown.
    pub fn expire_error(&mut self, seq: u64) {
        if seq == self.error_seq {
            self.dismiss_error();
        }
    }
}

/// Short user-facing explanation for a failed playback attempt.
///
/// A failed preflight wins, then the platform rejection reason, then the
/// media element's error code.
pub fn classify_playback_failure(
    preflight: Option<&PreflightResult>,
    rejection: Option<&PlayRejection>,
    media_error: Option<MediaErrorCode>,
) -> &'static str {
    if let Some(kind) = preflight.filter(|p| !p.success).and_then(|p| p.error_kind) {
        return match kind {
            PreflightErrorKind::HtmlFallback => {
                "Music file is missing from this deployment. Please try again later."
            }
            PreflightErrorKind::Network => "Couldn't reach the music file. Please try again.",
            PreflightErrorKind::NonAudio => "The music file isn't valid audio.",
            PreflightErrorKind::Cors => "The music source blocked access. Please try again later.",
        };
    }
    match rejection {
        Some(PlayRejection::NotAllowed) => {
            return "Playback was blocked. Check your browser settings or interact with the page first."
        }
        Some(PlayRejection::NotSupported) => return "This audio format isn't supported by your browser.",
        Some(PlayRejection::Aborted) => return "Playback was interrupted. Please try again.",
        Some(PlayRejection::Other(_)) | None => {}
    }
    match media_error {
        Some(MediaErrorCode::Network) => "A network error stopped the music. Please try again.",
        Some(MediaErrorCode::Decode) => "The music file couldn't be decoded.",
        Some(MediaErrorCode::SrcNotSupported) => "This audio format isn't supported by your browser.",
        Some(MediaErrorCode::Aborted) | None => "Couldn't play music. Please try again.",
    }
}
