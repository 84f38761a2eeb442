//! Offset animation controller
//!
//! Combines easing functions and timing utilities to move the carousel's
//! scroll offset toward a target.

use std::time::{Duration, Instant};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete_at, lerp_u32, progress_at};

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u32,
    to: u32,
    duration: Duration,
    easing: EasingType,
}

/// Scroll offset animator
///
/// Call `animate_to()` to begin an animation, then `update()` each frame
/// to get the current interpolated offset.
#[derive(Debug, Clone)]
pub struct OffsetAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    /// Current offset (always up-to-date after `update`)
    current: u32,
}

impl OffsetAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Set the offset immediately, cancelling any animation
    pub fn jump_to(&mut self, offset: u32) {
        self.animation = None;
        self.current = offset;
    }

    /// Start an animation from the current offset toward `target`.
    ///
    /// Returns true when an animation was started. With smooth scrolling
    /// disabled, or when already at `target`, the offset jumps and no
    /// animation runs.
    pub fn animate_to(&mut self, target: u32, now: Instant) -> bool {
        if !self.config.is_smooth() || self.current == target {
            self.jump_to(target);
            return false;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
        true
    }

    /// Advance the animation to `now` and return the current offset
    pub fn update(&mut self, now: Instant) -> u32 {
        if let Some(ref anim) = self.animation {
            if is_complete_at(anim.start, anim.duration, now) {
                self.current = anim.to;
                self.animation = None;
            } else {
                let t = progress_at(anim.start, anim.duration, now);
                self.current = lerp_u32(anim.from, anim.to, anim.easing.apply(t));
            }
        }

        self.current
    }

    /// Cancel any active animation and stop at the current offset
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(duration_ms: u64) -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            easing: EasingType::Linear,
            ..Default::default()
        }
    }

    #[test]
    fn test_jump_when_disabled() {
        let mut animator = OffsetAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });

        assert!(!animator.animate_to(100, Instant::now()));
        assert_eq!(animator.current(), 100);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_no_animation_when_at_target() {
        let mut animator = OffsetAnimator::new(config(200));
        animator.jump_to(40);
        assert!(!animator.animate_to(40, Instant::now()));
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_interpolates_then_settles() {
        let mut animator = OffsetAnimator::new(config(200));
        let start = Instant::now();

        assert!(animator.animate_to(100, start));
        assert_eq!(animator.update(start + Duration::from_millis(50)), 25);
        assert!(animator.is_animating());

        assert_eq!(animator.update(start + Duration::from_millis(200)), 100);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_retarget_starts_from_current() {
        let mut animator = OffsetAnimator::new(config(100));
        let start = Instant::now();

        animator.animate_to(100, start);
        animator.update(start + Duration::from_millis(50));
        let mid = animator.current();

        let later = start + Duration::from_millis(50);
        animator.animate_to(0, later);
        assert_eq!(animator.update(later), mid);
        assert_eq!(animator.update(later + Duration::from_millis(100)), 0);
    }

    #[test]
    fn test_cancel_keeps_position() {
        let mut animator = OffsetAnimator::new(config(100));
        let start = Instant::now();
        animator.animate_to(80, start);
        animator.update(start + Duration::from_millis(50));
        animator.cancel();

        assert!(!animator.is_animating());
        assert_eq!(animator.current(), 40);
        assert_eq!(animator.update(start + Duration::from_secs(1)), 40);
    }
}
