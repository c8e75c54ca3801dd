//! Advisory reachability and content checks for the configured audio URL.
//!
//! The check never fails: every outcome, including transport errors, comes
//! back as a [`PreflightResult`] so playback can still be attempted.

use super::assets::is_external;
use super::constants::{PREFLIGHT_FALLBACK_RANGE, PREFLIGHT_SIGNATURE_RANGE};
use super::error::TransportError;
use smallvec::SmallVec;
use std::fmt;

/// First bytes of a response; an MP3 signature fits comfortably.
pub type HeadBytes = SmallVec<[u8; 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    /// Header-only request.
    Head,
    /// GET with a `Range: bytes=start-end` header.
    Range { start: u32, end: u32, read_body: bool },
}

impl ProbeMethod {
    pub fn range_header(&self) -> Option<String> {
        match self {
            ProbeMethod::Head => None,
            ProbeMethod::Range { start, end, .. } => Some(format!("bytes={}-{}", start, end)),
        }
    }

    pub fn http_method(&self) -> &'static str {
        match self {
            ProbeMethod::Head => "HEAD",
            ProbeMethod::Range { .. } => "GET",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Raw `content-type` header, empty when absent.
    pub content_type: String,
    pub body: HeadBytes,
}

impl ProbeResponse {
    #[inline]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-fetch primitive the preflight runs against.
#[allow(async_fn_in_trait)]
pub trait AssetProbe {
    async fn send(&self, url: &str, method: ProbeMethod) -> Result<ProbeResponse, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightErrorKind {
    Network,
    HtmlFallback,
    NonAudio,
    Cors,
}

impl PreflightErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreflightErrorKind::Network => "network",
            PreflightErrorKind::HtmlFallback => "html-fallback",
            PreflightErrorKind::NonAudio => "non-audio",
            PreflightErrorKind::Cors => "cors",
        }
    }
}

impl fmt::Display for PreflightErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightResult {
    pub success: bool,
    pub url: String,
    pub status: Option<u16>,
    pub content_type: Option<String>,
    pub error_kind: Option<PreflightErrorKind>,
    pub error_message: Option<String>,
}

impl PreflightResult {
    fn passed(url: &str, status: u16, content_type: impl Into<String>) -> Self {
        Self {
            success: true,
            url: url.to_string(),
            status: Some(status),
            content_type: Some(content_type.into()),
            error_kind: None,
            error_message: None,
        }
    }

    fn failed(
        url: &str,
        status: Option<u16>,
        content_type: &str,
        kind: PreflightErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            url: url.to_string(),
            status,
            content_type: (!content_type.is_empty()).then(|| content_type.to_string()),
            error_kind: Some(kind),
            error_message: Some(message.into()),
        }
    }
}

/// True for an ID3v2 tag or an MPEG audio frame sync at offset zero.
#[inline]
pub fn has_mp3_signature(bytes: &[u8]) -> bool {
    let id3 = bytes.len() >= 3 && bytes[..3] == [0x49, 0x44, 0x33];
    let frame_sync = bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] == 0xFB || bytes[1] == 0xFA);
    id3 || frame_sync
}

#[inline]
fn is_ambiguous_content_type(content_type: &str) -> bool {
    content_type.is_empty()
        || content_type.contains("application/octet-stream")
        || content_type.contains("binary/octet-stream")
}

pub async fn check_audio_asset<P: AssetProbe>(probe: &P, url: &str) -> PreflightResult {
    let external = is_external(url);
    log::info!(
        "[preflight] checking {} audio asset {}",
        if external { "external" } else { "local" },
        url
    );

    let response = match probe.send(url, ProbeMethod::Head).await {
        Ok(r) => r,
        Err(head_err) => {
            log::info!("[preflight] HEAD failed ({}), retrying with ranged GET", head_err);
            let (start, end) = PREFLIGHT_FALLBACK_RANGE;
            let fallback = ProbeMethod::Range {
                start,
                end,
                read_body: false,
            };
            match probe.send(url, fallback).await {
                Ok(r) => r,
                Err(get_err) => {
                    log::error!("[preflight] HEAD and GET both failed for {}: {}", url, get_err);
                    return transport_failure(url, external);
                }
            }
        }
    };

    classify_response(probe, url, external, response).await
}

fn transport_failure(url: &str, external: bool) -> PreflightResult {
    if external {
        PreflightResult::failed(
            url,
            None,
            "",
            PreflightErrorKind::Cors,
            "External URL is not accessible (CORS or network error)",
        )
    } else {
        PreflightResult::failed(
            url,
            None,
            "",
            PreflightErrorKind::Network,
            "Network error while accessing audio file",
        )
    }
}

async fn classify_response<P: AssetProbe>(
    probe: &P,
    url: &str,
    external: bool,
    response: ProbeResponse,
) -> PreflightResult {
    let status = response.status;
    let content_type = response.content_type.trim().to_string();
    let lowered = content_type.to_ascii_lowercase();
    log::info!(
        "[preflight] response url={} status={} content_type={:?} external={}",
        url,
        status,
        content_type,
        external
    );

    if !response.ok() {
        return PreflightResult::failed(
            url,
            Some(status),
            &content_type,
            PreflightErrorKind::Network,
            format!("HTTP {}: Asset not found or unreachable", status),
        );
    }

    if lowered.contains("text/html") {
        let hint = if external {
            "the external URL returned HTML; verify it points directly at an audio file"
        } else {
            "the server returned HTML; the file is likely missing and the SPA fallback route was served"
        };
        log::error!("[preflight] HTML fallback for {} (status {}): {}", url, status, hint);
        return PreflightResult::failed(
            url,
            Some(status),
            &content_type,
            PreflightErrorKind::HtmlFallback,
            "Audio file not found (HTML fallback detected)",
        );
    }

    if lowered.contains("audio/") {
        log::info!("[preflight] audio content-type {}", content_type);
        return PreflightResult::passed(url, status, content_type);
    }

    if is_ambiguous_content_type(&lowered) {
        log::info!("[preflight] ambiguous content-type, checking MP3 signature");
        let (start, end) = PREFLIGHT_SIGNATURE_RANGE;
        let method = ProbeMethod::Range {
            start,
            end,
            read_body: true,
        };
        match probe.send(url, method).await {
            Ok(head) if head.ok() && has_mp3_signature(&head.body) => {
                log::info!("[preflight] MP3 signature detected");
                let recorded = if content_type.is_empty() {
                    "audio/mpeg (detected)".to_string()
                } else {
                    content_type
                };
                return PreflightResult::passed(url, status, recorded);
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("[preflight] could not verify MP3 signature: {}", e);
                if external && content_type.is_empty() {
                    log::info!("[preflight] external URL without content-type, assuming playable");
                    return PreflightResult::passed(url, status, "unknown (external URL)");
                }
            }
        }
    }

    log::error!(
        "[preflight] non-audio content at {} (status {}, content-type {:?})",
        url,
        status,
        content_type
    );
    let shown = if content_type.is_empty() {
        "unknown"
    } else {
        content_type.as_str()
    };
    PreflightResult::failed(
        url,
        Some(status),
        &content_type,
        PreflightErrorKind::NonAudio,
        format!("Invalid content-type: {}", shown),
    )
}
