// Interaction, audio and widget tuning constants.
//
// These constants express intended behavior (distances, timings, counts) and
// keep magic numbers out of the code.
// Evading button geometry (CSS px)
pub const EVADE_THRESHOLD_PX: f32 = 100.0; // pointer closer than this triggers a move
pub const EVADE_MOVE_PX: f32 = 150.0; // relocation magnitude per trigger
pub const EVADE_PADDING_PX: f32 = 20.0; // keep-out margin inside the container

// Cosmetic transition window after a relocation
pub const EVADE_COOLDOWN_MS: u64 = 300;

// Background music defaults
pub const MUSIC_VOLUME: f64 = 0.3;
pub const MUSIC_LOOP: bool = true;

// Surfaced playback errors disappear after this long
pub const ERROR_DISPLAY_MS: u64 = 10_000;

// Preflight probe ranges
pub const PREFLIGHT_FALLBACK_RANGE: (u32, u32) = (0, 1023); // GET retry when HEAD transport fails
pub const PREFLIGHT_SIGNATURE_RANGE: (u32, u32) = (0, 10); // enough for an ID3 tag or frame sync

// Floating hearts
pub const HEART_COUNT: usize = 15;
pub const HEART_DELAY_MAX_S: f32 = 5.0;
pub const HEART_DURATION_MIN_S: f32 = 8.0;
pub const HEART_DURATION_SPAN_S: f32 = 4.0;
pub const HEART_SIZE_MIN_PX: f32 = 20.0;
pub const HEART_SIZE_SPAN_PX: f32 = 20.0;

// Rose petals
pub const PETAL_COUNT: usize = 30;
pub const PETAL_STATIC_COUNT: usize = 10; // roses shown in place of petals under reduced motion
pub const PETAL_DELAY_MAX_S: f32 = 8.0;
pub const PETAL_DURATION_MIN_S: f32 = 10.0;
pub const PETAL_DURATION_SPAN_S: f32 = 5.0;
pub const PETAL_SIZE_MIN_PX: f32 = 15.0;
pub const PETAL_SIZE_SPAN_PX: f32 = 25.0;
pub const PETAL_DRIFT_MAX_PX: f32 = 20.0; // symmetric: -max..max

// Rotating one-liners
pub const ONE_LINER_INTERVAL_MS: u32 = 3_000;

// Surprise reveal animation
pub const REVEAL_DELAY_MS: u32 = 300;
