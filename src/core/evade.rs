use super::constants::{EVADE_COOLDOWN_MS, EVADE_MOVE_PX, EVADE_PADDING_PX, EVADE_THRESHOLD_PX};
use glam::Vec2;
use instant::Instant;
use std::time::Duration;

/// Axis-aligned box in client coordinates (CSS px).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    fn has_area(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0 && self.size.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvadeParams {
    pub threshold: f32,
    pub move_distance: f32,
    pub padding: f32,
    pub cooldown: Duration,
}

impl Default for EvadeParams {
    fn default() -> Self {
        Self {
            threshold: EVADE_THRESHOLD_PX,
            move_distance: EVADE_MOVE_PX,
            padding: EVADE_PADDING_PX,
            cooldown: Duration::from_millis(EVADE_COOLDOWN_MS),
        }
    }
}

/// Compute the element's next offset, or `None` when it should stay put.
///
/// `element` is the element's current client box (already including
/// `offset`), `container` the size of the box the offset is relative to.
pub fn evade_offset(
    pointer: Vec2,
    element: Rect,
    container: Vec2,
    offset: Vec2,
    params: &EvadeParams,
) -> Option<Vec2> {
    if !element.has_area() || container.x <= 0.0 || container.y <= 0.0 || !container.is_finite() {
        return None;
    }
    if !pointer.is_finite() {
        return None;
    }
    let center = element.center();
    if pointer.distance(center) >= params.threshold {
        return None;
    }

    let away = center - pointer;
    let angle = away.y.atan2(away.x);
    let candidate = offset + Vec2::new(angle.cos(), angle.sin()) * params.move_distance;

    let max = container - element.size - Vec2::splat(params.padding);
    Some(Vec2::new(
        clamp_axis(candidate.x, params.padding, max.x),
        clamp_axis(candidate.y, params.padding, max.y),
    ))
}

// Lower bound wins when the container is too small to honor both.
#[inline]
fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Per-overlay state for the button that runs away from the pointer.
#[derive(Debug, Clone)]
pub struct EvasionController {
    offset: Vec2,
    evading_since: Option<Instant>,
    reduced_motion: bool,
    params: EvadeParams,
}

impl EvasionController {
    pub fn new(reduced_motion: bool) -> Self {
        Self::with_params(reduced_motion, EvadeParams::default())
    }

    pub fn with_params(reduced_motion: bool, params: EvadeParams) -> Self {
        Self {
            offset: Vec2::ZERO,
            evading_since: None,
            reduced_motion,
            params,
        }
    }

    /// Horizontally center the element on its row.
    pub fn center_in(&mut self, container: Vec2, element: Vec2) {
        if container.x > 0.0 && element.x > 0.0 {
            self.offset = Vec2::new((container.x - element.x) / 2.0, 0.0);
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Feed a pointer/touch position; returns true when the element moved.
    pub fn on_pointer(&mut self, pointer: Vec2, element: Rect, container: Vec2, now: Instant) -> bool {
        if self.reduced_motion {
            return false;
        }
        match evade_offset(pointer, element, container, self.offset, &self.params) {
            Some(next) => {
                log::debug!(
                    "[evade] ({:.0},{:.0}) -> ({:.0},{:.0})",
                    self.offset.x,
                    self.offset.y,
                    next.x,
                    next.y
                );
                self.offset = next;
                self.evading_since = Some(now);
                true
            }
            None => false,
        }
    }

    pub fn is_evading(&self, now: Instant) -> bool {
        match self.evading_since {
            Some(since) => now < since + self.params.cooldown,
            None => false,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.params.cooldown
    }

    pub fn transform_css(&self) -> String {
        format!("translate({}px, {}px)", self.offset.x, self.offset.y)
    }

    pub fn transition_css(&self, now: Instant) -> &'static str {
        if self.is_evading(now) && !self.reduced_motion {
            "transform 0.3s ease-out"
        } else {
            "none"
        }
    }

    /// Only clickable when evasion is disabled.
    pub fn is_clickable(&self) -> bool {
        self.reduced_motion
    }
}
