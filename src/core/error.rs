use thiserror::Error;

/// Raised when the configured audio source cannot be turned into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("malformed audio source {value:?}: a relative path was concatenated with an absolute URL")]
    MalformedAudioSource { value: String },
}

/// The probe request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Platform reason attached to a rejected `play()` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayRejection {
    #[error("playback not allowed")]
    NotAllowed,
    #[error("playback source not supported")]
    NotSupported,
    #[error("playback aborted")]
    Aborted,
    #[error("playback rejected: {0}")]
    Other(String),
}

impl PlayRejection {
    /// Map a DOMException name onto a rejection reason.
    pub fn from_exception_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => PlayRejection::NotAllowed,
            "NotSupportedError" => PlayRejection::NotSupported,
            "AbortError" => PlayRejection::Aborted,
            other => PlayRejection::Other(other.to_string()),
        }
    }
}

/// Low-level media element error code (HTMLMediaElement.error.code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    Aborted,
    Network,
    Decode,
    SrcNotSupported,
}

impl MediaErrorCode {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(MediaErrorCode::Aborted),
            2 => Some(MediaErrorCode::Network),
            3 => Some(MediaErrorCode::Decode),
            4 => Some(MediaErrorCode::SrcNotSupported),
            _ => None,
        }
    }
}
