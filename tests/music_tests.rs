// Host-side tests for the background music state machine.

use std::cell::RefCell;
use std::rc::Rc;
use valentine_web::core::{
    classify_playback_failure, ConfigError, MediaElement, MediaErrorCode, MusicController,
    MusicState, PlayRejection, PreflightErrorKind, PreflightResult, Toggled,
};

const URL: &str = "/assets/audio/track.mp3";

#[derive(Default)]
struct Track {
    playing: bool,
    position: f64,
    plays: u32,
    released: bool,
    error: Option<MediaErrorCode>,
}

struct FakeMedia(Rc<RefCell<Track>>);

impl MediaElement for FakeMedia {
    type Pending = ();

    fn play(&mut self) {
        let mut t = self.0.borrow_mut();
        t.playing = true;
        t.plays += 1;
    }

    fn pause(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.0.borrow_mut().position = seconds;
    }

    fn error_code(&self) -> Option<MediaErrorCode> {
        self.0.borrow().error
    }

    fn release(&mut self) {
        self.0.borrow_mut().released = true;
    }
}

fn active_controller() -> (MusicController<FakeMedia>, Rc<RefCell<Track>>) {
    let track = Rc::new(RefCell::new(Track::default()));
    let mut ctl = MusicController::new(URL);
    assert!(ctl.activate(FakeMedia(track.clone())));
    (ctl, track)
}

fn start(ctl: &mut MusicController<FakeMedia>) -> u64 {
    match ctl.toggle() {
        Toggled::Playing { attempt, .. } => attempt,
        _ => panic!("expected a play attempt"),
    }
}

fn failed_preflight(url: &str, kind: PreflightErrorKind) -> PreflightResult {
    PreflightResult {
        success: false,
        url: url.to_string(),
        status: Some(200),
        content_type: Some("text/html".to_string()),
        error_kind: Some(kind),
        error_message: Some("failed".to_string()),
    }
}

#[test]
fn starts_muted_without_interaction() {
    let ctl: MusicController<FakeMedia> = MusicController::new(URL);
    assert_eq!(ctl.state(), &MusicState::Muted);
    assert!(ctl.is_muted());
    assert!(!ctl.has_interacted());
    assert!(!ctl.is_active());
}

#[test]
fn toggle_without_track_is_ignored() {
    let mut ctl: MusicController<FakeMedia> = MusicController::new(URL);
    assert!(matches!(ctl.toggle(), Toggled::Ignored));
    assert!(ctl.has_interacted());
    assert_eq!(ctl.state(), &MusicState::Muted);
}

#[test]
fn toggle_twice_round_trips() {
    let (mut ctl, track) = active_controller();
    let attempt = start(&mut ctl);
    assert!(track.borrow().playing);
    assert!(ctl.has_interacted());
    ctl.settle_play(attempt, Ok(()));
    assert_eq!(ctl.state(), &MusicState::Unmuted);

    assert!(matches!(ctl.toggle(), Toggled::Paused));
    assert_eq!(ctl.state(), &MusicState::Muted);
    assert!(ctl.error_message().is_none());
    assert!(!track.borrow().playing);
}

#[test]
fn rejected_play_surfaces_error_and_stays_silent() {
    let (mut ctl, track) = active_controller();
    let attempt = start(&mut ctl);
    ctl.settle_play(attempt, Err(PlayRejection::NotAllowed));
    let message = ctl.error_message().expect("error shown");
    assert!(message.contains("browser settings"), "{message}");
    assert!(ctl.is_muted());
    assert!(!track.borrow().playing);
}

#[test]
fn failed_preflight_takes_precedence() {
    let (mut ctl, _track) = active_controller();
    assert!(ctl.record_preflight(failed_preflight(URL, PreflightErrorKind::HtmlFallback)));
    let attempt = start(&mut ctl);
    ctl.settle_play(attempt, Err(PlayRejection::NotSupported));
    assert!(ctl.error_message().unwrap().contains("missing"));
}

#[test]
fn stale_preflight_is_discarded() {
    let (mut ctl, _track) = active_controller();
    assert!(!ctl.record_preflight(failed_preflight("/assets/audio/old.mp3", PreflightErrorKind::Network)));
    assert!(ctl.last_preflight().is_none());
}

#[test]
fn stale_play_outcome_is_ignored() {
    let (mut ctl, _track) = active_controller();
    let attempt = start(&mut ctl);
    assert!(matches!(ctl.toggle(), Toggled::Paused));
    ctl.settle_play(attempt, Err(PlayRejection::Aborted));
    assert_eq!(ctl.state(), &MusicState::Muted);
}

#[test]
fn toggle_from_error_retries() {
    let (mut ctl, track) = active_controller();
    let first = start(&mut ctl);
    ctl.settle_play(first, Err(PlayRejection::Aborted));
    assert!(ctl.error_message().is_some());
    let second = start(&mut ctl);
    assert!(second > first);
    ctl.settle_play(second, Ok(()));
    assert_eq!(ctl.state(), &MusicState::Unmuted);
    assert_eq!(track.borrow().plays, 2);
}

#[test]
fn deactivate_always_mutes_and_rewinds() {
    for setup in 0..3 {
        let (mut ctl, track) = active_controller();
        match setup {
            0 => {}
            1 => {
                let a = start(&mut ctl);
                ctl.settle_play(a, Ok(()));
            }
            _ => {
                let a = start(&mut ctl);
                ctl.settle_play(a, Err(PlayRejection::NotAllowed));
            }
        }
        track.borrow_mut().position = 42.0;
        ctl.deactivate();
        assert_eq!(ctl.state(), &MusicState::Muted);
        assert_eq!(track.borrow().position, 0.0);
        assert!(!track.borrow().playing);
        assert!(track.borrow().released);
        assert!(!ctl.is_active());
    }
}

#[test]
fn reactivation_after_page_restore_plays_again() {
    let (mut ctl, _old) = active_controller();
    let a = start(&mut ctl);
    ctl.settle_play(a, Ok(()));

    ctl.deactivate();
    assert!(ctl.is_suspended());
    assert!(matches!(ctl.toggle(), Toggled::Ignored));

    let restored = Rc::new(RefCell::new(Track::default()));
    assert!(ctl.activate(FakeMedia(restored.clone())));
    assert!(!ctl.is_suspended());
    let b = start(&mut ctl);
    ctl.settle_play(b, Ok(()));
    assert_eq!(ctl.state(), &MusicState::Unmuted);
    assert!(restored.borrow().playing);
    assert_eq!(restored.borrow().plays, 1);
}

#[test]
fn never_activated_controller_is_not_suspended() {
    let mut ctl: MusicController<FakeMedia> = MusicController::new(URL);
    ctl.deactivate();
    assert!(!ctl.is_suspended());
}

#[test]
fn stop_keeps_the_track() {
    let (mut ctl, track) = active_controller();
    let a = start(&mut ctl);
    ctl.settle_play(a, Ok(()));
    track.borrow_mut().position = 12.5;
    ctl.stop();
    assert_eq!(ctl.state(), &MusicState::Muted);
    assert_eq!(track.borrow().position, 0.0);
    assert!(ctl.is_active());
}

#[test]
fn errors_clear_by_dismissal_or_matching_expiry() {
    let (mut ctl, _track) = active_controller();
    let a = start(&mut ctl);
    ctl.settle_play(a, Err(PlayRejection::NotAllowed));
    let old_seq = ctl.error_seq();

    let b = start(&mut ctl);
    ctl.settle_play(b, Err(PlayRejection::Aborted));
    ctl.expire_error(old_seq);
    assert!(ctl.error_message().is_some(), "older timer must not clear newer error");
    ctl.expire_error(ctl.error_seq());
    assert_eq!(ctl.state(), &MusicState::Muted);

    let c = start(&mut ctl);
    ctl.settle_play(c, Err(PlayRejection::Aborted));
    ctl.dismiss_error();
    assert_eq!(ctl.state(), &MusicState::Muted);
}

#[test]
fn misconfigured_source_never_plays() {
    let err = ConfigError::MalformedAudioSource {
        value: "audio/http://evil.com/a.mp3".to_string(),
    };
    let track = Rc::new(RefCell::new(Track::default()));
    let mut ctl = MusicController::unavailable(err.clone());
    assert!(!ctl.activate(FakeMedia(track.clone())));
    assert!(matches!(ctl.toggle(), Toggled::Ignored));
    assert_eq!(track.borrow().plays, 0);
    assert_eq!(ctl.take_config_error(), Some(&err));
    assert_eq!(ctl.take_config_error(), None);
    assert!(ctl.url().is_none());
}

#[test]
fn classification_priority() {
    let html = failed_preflight(URL, PreflightErrorKind::HtmlFallback);
    let mut ok = failed_preflight(URL, PreflightErrorKind::Network);
    ok.success = true;

    assert!(classify_playback_failure(Some(&html), Some(&PlayRejection::NotAllowed), None).contains("missing"));
    // a passing preflight is not consulted
    assert!(classify_playback_failure(Some(&ok), Some(&PlayRejection::NotSupported), None).contains("format"));
    assert!(classify_playback_failure(None, Some(&PlayRejection::Aborted), None).contains("interrupted"));
    assert!(classify_playback_failure(
        None,
        Some(&PlayRejection::Other("Weird".into())),
        Some(MediaErrorCode::Decode)
    )
    .contains("decoded"));
    assert!(classify_playback_failure(None, None, Some(MediaErrorCode::Network)).contains("network"));
    assert_eq!(
        classify_playback_failure(None, None, None),
        "Couldn't play music. Please try again."
    );
}

#[test]
fn rejection_names_map_to_reasons() {
    assert_eq!(PlayRejection::from_exception_name("NotAllowedError"), PlayRejection::NotAllowed);
    assert_eq!(PlayRejection::from_exception_name("NotSupportedError"), PlayRejection::NotSupported);
    assert_eq!(PlayRejection::from_exception_name("AbortError"), PlayRejection::Aborted);
    assert_eq!(
        PlayRejection::from_exception_name("SecurityError"),
        PlayRejection::Other("SecurityError".to_string())
    );
    assert_eq!(MediaErrorCode::from_code(3), Some(MediaErrorCode::Decode));
    assert_eq!(MediaErrorCode::from_code(9), None);
}
