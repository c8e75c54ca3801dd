use super::constants::*;
use rand::Rng;

pub const ONE_LINERS: [&str; 8] = [
    "You're my favorite notification 📱",
    "I like you more than free WiFi 📶",
    "You're the reason I smile at my phone 😊",
    "Netflix asked if we're still watching... always! 🎬",
    "You're my favorite weirdo 🤪",
    "I'd share my fries with you 🍟",
    "You're better than chai (almost) ☕",
    "My heart does the thing when I see you 💓",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartParams {
    pub left_pct: f32,
    pub delay_s: f32,
    pub duration_s: f32,
    pub size_px: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PetalParams {
    pub left_pct: f32,
    pub delay_s: f32,
    pub duration_s: f32,
    pub size_px: f32,
    pub rotation_deg: f32,
    pub drift_px: f32,
}

/// Hearts drifting up the page; none at all under reduced motion.
pub fn floating_hearts<R: Rng>(rng: &mut R, reduced_motion: bool) -> Vec<HeartParams> {
    if reduced_motion {
        return Vec::new();
    }
    (0..HEART_COUNT)
        .map(|_| HeartParams {
            left_pct: rng.gen_range(0.0..100.0),
            delay_s: rng.gen_range(0.0..HEART_DELAY_MAX_S),
            duration_s: HEART_DURATION_MIN_S + rng.gen_range(0.0..HEART_DURATION_SPAN_S),
            size_px: HEART_SIZE_MIN_PX + rng.gen_range(0.0..HEART_SIZE_SPAN_PX),
        })
        .collect()
}

pub fn rose_petals<R: Rng>(rng: &mut R) -> Vec<PetalParams> {
    (0..PETAL_COUNT)
        .map(|_| PetalParams {
            left_pct: rng.gen_range(0.0..100.0),
            delay_s: rng.gen_range(0.0..PETAL_DELAY_MAX_S),
            duration_s: PETAL_DURATION_MIN_S + rng.gen_range(0.0..PETAL_DURATION_SPAN_S),
            size_px: PETAL_SIZE_MIN_PX + rng.gen_range(0.0..PETAL_SIZE_SPAN_PX),
            rotation_deg: rng.gen_range(0.0..360.0),
            drift_px: rng.gen_range(-PETAL_DRIFT_MAX_PX..PETAL_DRIFT_MAX_PX),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneLinerTicker {
    index: usize,
    len: usize,
    paused: bool,
    frozen: bool,
}

impl OneLinerTicker {
    /// A frozen ticker (reduced motion) never advances.
    pub fn new(len: usize, frozen: bool) -> Self {
        Self {
            index: 0,
            len,
            paused: false,
            frozen,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_running(&self) -> bool {
        !self.paused && !self.frozen && self.len > 1
    }

    /// Interval tick; returns true when the visible line changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.index = (self.index + 1) % self.len;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealing,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurpriseReveal {
    state: RevealState,
}

impl Default for SurpriseReveal {
    fn default() -> Self {
        Self {
            state: RevealState::Hidden,
        }
    }
}

impl SurpriseReveal {
    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn button_disabled(&self) -> bool {
        self.state != RevealState::Hidden
    }

    /// Click on the gift button; true when the reveal animation started.
    pub fn click(&mut self) -> bool {
        if self.state != RevealState::Hidden {
            return false;
        }
        self.state = RevealState::Revealing;
        true
    }

    /// Reveal timer fired.
    pub fn finish(&mut self) {
        if self.state == RevealState::Revealing {
            self.state = RevealState::Revealed;
        }
    }
}
