//! Time calculation utilities for scroll animations

use std::time::{Duration, Instant};

/// Animation progress (0.0 to 1.0) at `now`
#[inline]
pub fn progress_at(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete_at(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for scroll offsets
#[inline]
pub fn lerp_u32(from: u32, to: u32, t: f64) -> u32 {
    lerp(from as f64, to as f64, t).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_u32_backwards() {
        assert_eq!(lerp_u32(100, 0, 0.25), 75);
        assert_eq!(lerp_u32(100, 0, 1.0), 0);
    }

    #[test]
    fn test_progress_at() {
        let start = Instant::now();
        let duration = Duration::from_millis(200);
        assert!((progress_at(start, duration, start + Duration::from_millis(100)) - 0.5).abs() < 0.001);
        assert!((progress_at(start, duration, start + Duration::from_secs(1)) - 1.0).abs() < 0.001);
        assert!((progress_at(start, Duration::ZERO, start) - 1.0).abs() < 0.001);
        assert!(!is_complete_at(start, duration, start + Duration::from_millis(199)));
        assert!(is_complete_at(start, duration, start + duration));
    }
}
