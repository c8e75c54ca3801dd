// Host-side tests for the audio preflight classifier.
// The probe is scripted in memory and futures are driven with pollster.

use std::cell::RefCell;
use valentine_web::core::{
    check_audio_asset, has_mp3_signature, AssetProbe, PreflightErrorKind, PreflightResult,
    ProbeMethod, ProbeResponse, TransportError,
};

const LOCAL: &str = "/assets/audio/track.mp3";
const EXTERNAL: &str = "https://cdn.example.com/track.mp3";

type Reply = Result<ProbeResponse, TransportError>;

struct ScriptedProbe {
    head: Reply,
    fallback: Reply,
    signature: Reply,
    calls: RefCell<Vec<ProbeMethod>>,
}

impl ScriptedProbe {
    fn new(head: Reply) -> Self {
        Self {
            head,
            fallback: Err(TransportError::new("no fallback scripted")),
            signature: Err(TransportError::new("no signature scripted")),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn fallback(mut self, reply: Reply) -> Self {
        self.fallback = reply;
        self
    }

    fn signature(mut self, reply: Reply) -> Self {
        self.signature = reply;
        self
    }

    fn calls(&self) -> Vec<ProbeMethod> {
        self.calls.borrow().clone()
    }
}

impl AssetProbe for ScriptedProbe {
    async fn send(&self, _url: &str, method: ProbeMethod) -> Result<ProbeResponse, TransportError> {
        self.calls.borrow_mut().push(method);
        match method {
            ProbeMethod::Head => self.head.clone(),
            ProbeMethod::Range { read_body: false, .. } => self.fallback.clone(),
            ProbeMethod::Range { read_body: true, .. } => self.signature.clone(),
        }
    }
}

fn resp(status: u16, content_type: &str, body: &[u8]) -> Reply {
    Ok(ProbeResponse {
        status,
        content_type: content_type.to_string(),
        body: body.iter().copied().collect(),
    })
}

fn down() -> Reply {
    Err(TransportError::new("TypeError: Failed to fetch"))
}

fn check(probe: &ScriptedProbe, url: &str) -> PreflightResult {
    pollster::block_on(check_audio_asset(probe, url))
}

#[test]
fn html_fallback_is_detected() {
    let probe = ScriptedProbe::new(resp(200, "text/html; charset=utf-8", b""));
    let result = check(&probe, LOCAL);
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(PreflightErrorKind::HtmlFallback));
    assert_eq!(result.status, Some(200));
    assert_eq!(result.url, LOCAL);
    assert_eq!(probe.calls(), vec![ProbeMethod::Head]);
}

#[test]
fn error_status_is_a_network_failure() {
    let probe = ScriptedProbe::new(resp(404, "text/html", b""));
    let result = check(&probe, LOCAL);
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(PreflightErrorKind::Network));
    assert!(result.error_message.unwrap().contains("404"));
}

#[test]
fn audio_content_type_passes() {
    let probe = ScriptedProbe::new(resp(200, "audio/mpeg", b""));
    let result = check(&probe, LOCAL);
    assert!(result.success);
    assert_eq!(result.content_type.as_deref(), Some("audio/mpeg"));
    assert!(result.error_kind.is_none());
}

#[test]
fn id3_tag_rescues_ambiguous_content_type() {
    let probe = ScriptedProbe::new(resp(200, "application/octet-stream", b""))
        .signature(resp(206, "", &[0x49, 0x44, 0x33, 0x04, 0x00, 0x00]));
    let result = check(&probe, LOCAL);
    assert!(result.success);
    assert_eq!(result.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(
        probe.calls()[1],
        ProbeMethod::Range {
            start: 0,
            end: 10,
            read_body: true
        }
    );
}

#[test]
fn frame_sync_without_content_type_is_detected() {
    let probe = ScriptedProbe::new(resp(200, "", b"")).signature(resp(206, "", &[0xFF, 0xFB, 0x90]));
    let result = check(&probe, LOCAL);
    assert!(result.success);
    assert_eq!(result.content_type.as_deref(), Some("audio/mpeg (detected)"));
}

#[test]
fn unrecognised_bytes_are_non_audio() {
    let probe = ScriptedProbe::new(resp(200, "", b"")).signature(resp(206, "", b"<!doctype"));
    let result = check(&probe, LOCAL);
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(PreflightErrorKind::NonAudio));
    assert_eq!(result.error_message.as_deref(), Some("Invalid content-type: unknown"));
}

#[test]
fn other_content_types_skip_the_signature_probe() {
    let probe = ScriptedProbe::new(resp(200, "application/json", b""));
    let result = check(&probe, LOCAL);
    assert_eq!(result.error_kind, Some(PreflightErrorKind::NonAudio));
    assert_eq!(result.content_type.as_deref(), Some("application/json"));
    assert_eq!(probe.calls().len(), 1);
}

#[test]
fn head_failure_falls_back_to_ranged_get() {
    let probe = ScriptedProbe::new(down()).fallback(resp(206, "audio/mpeg", b""));
    let result = check(&probe, LOCAL);
    assert!(result.success);
    assert_eq!(
        probe.calls(),
        vec![
            ProbeMethod::Head,
            ProbeMethod::Range {
                start: 0,
                end: 1023,
                read_body: false
            }
        ]
    );
}

#[test]
fn transport_failure_depends_on_origin() {
    let local = check(&ScriptedProbe::new(down()), LOCAL);
    assert!(!local.success);
    assert_eq!(local.error_kind, Some(PreflightErrorKind::Network));
    assert_eq!(local.status, None);

    let external = check(&ScriptedProbe::new(down()), EXTERNAL);
    assert_eq!(external.error_kind, Some(PreflightErrorKind::Cors));
}

#[test]
fn external_without_content_type_is_optimistic() {
    let probe = ScriptedProbe::new(resp(200, "", b"")).signature(down());
    let result = check(&probe, EXTERNAL);
    assert!(result.success);
    assert_eq!(result.content_type.as_deref(), Some("unknown (external URL)"));

    // the same failure for a local path is reported
    let probe = ScriptedProbe::new(resp(200, "", b"")).signature(down());
    let result = check(&probe, LOCAL);
    assert_eq!(result.error_kind, Some(PreflightErrorKind::NonAudio));
}

#[test]
fn signature_helper() {
    assert!(has_mp3_signature(&[0x49, 0x44, 0x33]));
    assert!(has_mp3_signature(&[0xFF, 0xFA]));
    assert!(!has_mp3_signature(&[0xFF]));
    assert!(!has_mp3_signature(&[0x49, 0x44]));
    assert!(!has_mp3_signature(b""));
    assert!(!has_mp3_signature(&[0xFF, 0xF3]));
}

#[test]
fn error_kinds_render_as_tags() {
    assert_eq!(PreflightErrorKind::HtmlFallback.to_string(), "html-fallback");
    assert_eq!(PreflightErrorKind::NonAudio.as_str(), "non-audio");
    assert_eq!(PreflightErrorKind::Cors.as_str(), "cors");
}
