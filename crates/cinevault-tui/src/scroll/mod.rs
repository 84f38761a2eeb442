//! Animated scroll offsets for the carousel strip
//!
//! # Layers
//!
//! - `easing` - Pure easing functions (cubic, quintic, exponential, in-out)
//! - `timing` - Progress and interpolation helpers
//! - `config` - Configuration types (re-exported from cinevault-core)
//! - `animation` - `OffsetAnimator`, which combines the above
//!
//! Every time-dependent call takes an explicit `Instant`, so the caller owns
//! the clock and tests can step time deterministically.
//!
//! ```ignore
//! let mut animator = OffsetAnimator::new(ScrollConfig::default());
//! animator.animate_to(48, Instant::now());
//! // each frame:
//! let offset = animator.update(Instant::now());
//! ```

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::OffsetAnimator;
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
