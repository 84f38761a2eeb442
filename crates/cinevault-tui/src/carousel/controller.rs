use std::ops::Range;
use std::time::{Duration, Instant};

use cinevault_core::{CarouselConfig, ScrollConfig};

use super::looping::LoopMapper;
use super::{center_offset, cycle_index, max_offset};
use crate::scroll::OffsetAnimator;

/// Callback receiving the activated item
pub type SelectHandler<T> = Box<dyn FnMut(&T) + Send>;

/// Result of a confirm input
#[derive(Debug, PartialEq)]
pub enum Activation<'a, T> {
    /// A registered handler received the item
    Handled,
    /// No handler; the caller performs its default navigation
    Default(&'a T),
    /// Nothing to activate
    Empty,
}

/// Focus state, input debouncing and centering for a strip of equal items
pub struct CarouselController<T> {
    items: Vec<T>,
    focused: usize,
    /// Present while infinite looping is on
    looper: Option<LoopMapper>,
    animator: OffsetAnimator,
    item_extent: u32,
    viewport: u32,
    settle_delay: Duration,
    min_key_interval: Duration,
    /// Keyboard navigation is ignored until this instant
    locked_until: Option<Instant>,
    /// Time of the last accepted keyboard step
    last_key_at: Option<Instant>,
    on_select: Option<SelectHandler<T>>,
}

impl<T> CarouselController<T> {
    pub fn new(config: &CarouselConfig, scroll: ScrollConfig) -> Self {
        Self {
            items: Vec::new(),
            focused: 0,
            looper: config.infinite.then(|| LoopMapper::new(0, 0)),
            animator: OffsetAnimator::new(scroll),
            item_extent: config.item_extent() as u32,
            viewport: 0,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            min_key_interval: Duration::from_millis(config.min_key_interval_ms),
            locked_until: None,
            last_key_at: None,
            on_select: None,
        }
    }

    /// Register a handler that receives activated items instead of the caller
    pub fn set_on_select(&mut self, handler: SelectHandler<T>) {
        self.on_select = Some(handler);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the sequence. The focus survives when still in range,
    /// otherwise it resets to the first item.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.focused >= self.items.len() {
            self.focused = 0;
        }
        if self.looper.is_some() {
            self.looper = Some(LoopMapper::new(self.items.len(), self.focused));
        }
        self.locked_until = None;
        self.jump_to_focused();
    }

    /// Move focus back to the first item without animating
    pub fn reset_focus(&mut self) {
        self.focused = 0;
        if self.looper.is_some() {
            self.looper = Some(LoopMapper::new(self.items.len(), 0));
        }
        self.jump_to_focused();
    }

    pub fn focused_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.focused)
    }

    pub fn focused_item(&self) -> Option<&T> {
        self.items.get(self.focused)
    }

    pub fn is_infinite(&self) -> bool {
        self.looper.is_some()
    }

    /// Switch infinite looping on or off, keeping the focused item
    pub fn set_infinite(&mut self, infinite: bool) {
        if infinite == self.is_infinite() {
            return;
        }
        self.looper = infinite.then(|| LoopMapper::new(self.items.len(), self.focused));
        self.jump_to_focused();
    }

    /// Cursor of the infinite strip, if looping is on
    pub fn loop_cursor(&self) -> Option<i64> {
        self.looper.map(|looper| looper.cursor())
    }

    // Geometry

    pub fn item_extent(&self) -> u32 {
        self.item_extent
    }

    pub fn viewport(&self) -> u32 {
        self.viewport
    }

    /// Update the viewport extent; a change re-centers without animation
    pub fn set_viewport(&mut self, viewport: u32) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.jump_to_focused();
        }
    }

    /// Number of cells in the rendered strip (three laps when looping)
    pub fn strip_len(&self) -> usize {
        match self.looper {
            Some(looper) => looper.strip_len(),
            None => self.items.len(),
        }
    }

    /// Strip position of the focused item
    pub fn focused_strip_index(&self) -> usize {
        match self.looper {
            Some(looper) => looper.strip_index().unwrap_or(self.items.len() + self.focused),
            None => self.focused,
        }
    }

    /// Item rendered at a strip position
    pub fn item_at_strip(&self, strip_index: usize) -> Option<&T> {
        if strip_index >= self.strip_len() {
            return None;
        }
        self.items.get(strip_index % self.items.len().max(1))
    }

    /// Current (possibly mid-animation) scroll offset
    pub fn offset(&self) -> u32 {
        self.animator.current()
    }

    /// Strip positions overlapping the viewport at the current offset
    pub fn visible_range(&self) -> Range<usize> {
        let extent = self.item_extent.max(1);
        let offset = self.offset();
        let first = (offset / extent) as usize;
        let last = (offset.saturating_add(self.viewport)).div_ceil(extent) as usize;
        first.min(self.strip_len())..last.min(self.strip_len())
    }

    /// Strip position under a pointer at `position` cells into the viewport
    pub fn strip_index_at(&self, position: u32) -> Option<usize> {
        let index = (self.offset().saturating_add(position) / self.item_extent.max(1)) as usize;
        (index < self.strip_len()).then_some(index)
    }

    // Navigation

    pub fn select_next(&mut self) -> bool {
        self.select_next_at(Instant::now())
    }

    pub fn select_previous(&mut self) -> bool {
        self.select_previous_at(Instant::now())
    }

    /// Advance focus by one, wrapping. Returns false when the input was dropped.
    pub fn select_next_at(&mut self, now: Instant) -> bool {
        self.step(1, now)
    }

    /// Retreat focus by one, wrapping. Returns false when the input was dropped.
    pub fn select_previous_at(&mut self, now: Instant) -> bool {
        self.step(-1, now)
    }

    fn step(&mut self, delta: i64, now: Instant) -> bool {
        if self.items.is_empty() {
            return false;
        }

        self.tick(now);

        if self.animator.is_animating() || self.locked_until.is_some_and(|until| now < until) {
            tracing::trace!("Navigation ignored: scroll still settling");
            return false;
        }
        if self
            .last_key_at
            .is_some_and(|last| now.saturating_duration_since(last) < self.min_key_interval)
        {
            tracing::trace!("Navigation ignored: key repeat too fast");
            return false;
        }
        self.last_key_at = Some(now);

        let off_strip = match self.looper.as_mut() {
            Some(looper) => {
                self.focused = looper.step(delta);
                looper.strip_index().is_none()
            }
            None => {
                self.focused = cycle_index(self.focused, self.items.len(), delta);
                false
            }
        };
        // A one-item loop can step past the last lap
        if off_strip {
            self.settle_loop();
        }

        if self.center_on_at(self.focused_strip_index(), now) {
            self.locked_until = Some(now + self.settle_delay);
        } else {
            // no animation in flight, so the loop can settle right away
            self.settle_loop();
        }
        true
    }

    /// Focus a strip position directly (hover or click). Never locked out;
    /// an out-of-range position is ignored.
    pub fn select_by_pointer(&mut self, strip_index: usize) -> bool {
        if strip_index >= self.strip_len() {
            return false;
        }
        match self.looper.as_mut() {
            Some(looper) => {
                looper.set_strip_index(strip_index);
                self.focused = looper.visible_index();
            }
            None => self.focused = strip_index,
        }
        true
    }

    /// Confirm the focused item
    pub fn activate(&mut self) -> Activation<'_, T> {
        let Some(item) = self.items.get(self.focused) else {
            return Activation::Empty;
        };
        match self.on_select.as_mut() {
            Some(handler) => {
                handler(item);
                Activation::Handled
            }
            None => Activation::Default(item),
        }
    }

    /// Focus and confirm a strip position (pointer click)
    pub fn activate_at(&mut self, strip_index: usize) -> Activation<'_, T> {
        if !self.select_by_pointer(strip_index) {
            return Activation::Empty;
        }
        self.activate()
    }

    pub fn center_on(&mut self, strip_index: usize) -> bool {
        self.center_on_at(strip_index, Instant::now())
    }

    /// Animate toward the offset centering `strip_index`, clamped to the
    /// strip. Returns true when an animation started.
    pub fn center_on_at(&mut self, strip_index: usize, now: Instant) -> bool {
        let target = self.target_offset(strip_index);
        self.animator.animate_to(target, now)
    }

    fn target_offset(&self, strip_index: usize) -> u32 {
        center_offset(strip_index, self.item_extent, self.viewport)
            .min(max_offset(self.strip_len(), self.item_extent, self.viewport))
    }

    fn jump_to_focused(&mut self) {
        let target = self.target_offset(self.focused_strip_index());
        self.animator.jump_to(target);
    }

    // Frame updates

    /// Advance the animation and settle the loop. Call once per frame.
    pub fn tick(&mut self, now: Instant) -> u32 {
        self.animator.update(now);
        if self.locked_until.is_some_and(|until| now >= until) {
            self.locked_until = None;
        }
        if !self.animator.is_animating() {
            self.settle_loop();
        }
        self.animator.current()
    }

    /// True while frames must be drawn at animation rate
    pub fn needs_frame(&self) -> bool {
        self.animator.is_animating()
            || self.looper.is_some_and(|looper| looper.pending_shift() != 0)
    }

    /// True while keyboard navigation is locked out
    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Pull the loop cursor back into the middle lap and jump to the offset
    /// centering it. Away from the strip ends this is a shift of one lap.
    fn settle_loop(&mut self) {
        let Some(looper) = self.looper.as_mut() else {
            return;
        };
        let shift = looper.recenter();
        if shift == 0 {
            return;
        }
        let cursor = looper.cursor();
        let target = self.target_offset(self.focused_strip_index());
        self.animator.jump_to(target);
        tracing::trace!("Loop re-centered by {} (cursor {})", shift, cursor);
    }

    /// Cancel the animation and clear all timers
    pub fn teardown(&mut self) {
        self.animator.cancel();
        self.locked_until = None;
        self.last_key_at = None;
    }
}
