//! Keyboard-driven, auto-centering carousel
//!
//! - `controller` - focus state, input debouncing and scroll offsets
//! - `looping` - cursor mapping for the infinite (three-lap) strip
//!
//! Geometry is axis-agnostic: an "extent" is columns for the horizontal strip
//! and rows for the vertical list.

mod controller;
mod looping;

pub use controller::{Activation, CarouselController, SelectHandler};
pub use looping::LoopMapper;

/// Next index in a circular sequence of `len` items
pub fn cycle_index(current: usize, len: usize, direction: i64) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (current as i64 + direction).rem_euclid(len) as usize
}

/// Offset that puts the center of item `index` on the viewport center:
/// `index * W - V / 2 + W / 2`, clamped to zero
pub fn center_offset(index: usize, item_extent: u32, viewport: u32) -> u32 {
    let raw = index as i64 * item_extent as i64 - (viewport / 2) as i64 + (item_extent / 2) as i64;
    raw.clamp(0, u32::MAX as i64) as u32
}

/// Largest useful offset for a strip of `strip_len` items
pub fn max_offset(strip_len: usize, item_extent: u32, viewport: u32) -> u32 {
    let content = (strip_len as u64 * item_extent as u64).min(u32::MAX as u64) as u32;
    content.saturating_sub(viewport)
}
