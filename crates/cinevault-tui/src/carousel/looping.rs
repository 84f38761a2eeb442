//! Cursor mapping for the infinite strip
//!
//! The strip shows three laps of the sequence. The cursor lives in strip
//! coordinates and is pulled back into the middle lap once a scroll settles.

/// Unbounded cursor over a strip of three concatenated laps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopMapper {
    len: usize,
    cursor: i64,
}

impl LoopMapper {
    /// Number of laps rendered
    pub const LAPS: usize = 3;

    /// Start in the middle lap at `focused`
    pub fn new(len: usize, focused: usize) -> Self {
        let focused = if focused < len { focused } else { 0 };
        Self {
            len,
            cursor: (len + focused) as i64,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Index into the base sequence: `cursor mod len`, never negative
    pub fn visible_index(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        self.cursor.rem_euclid(self.len as i64) as usize
    }

    /// Cursor position inside the rendered strip, if it is on it
    pub fn strip_index(&self) -> Option<usize> {
        usize::try_from(self.cursor)
            .ok()
            .filter(|index| *index < self.strip_len())
    }

    pub fn strip_len(&self) -> usize {
        self.len * Self::LAPS
    }

    /// Move the cursor and return the new visible index
    pub fn step(&mut self, delta: i64) -> usize {
        if self.len > 0 {
            self.cursor += delta;
        }
        self.visible_index()
    }

    /// Put the cursor on a strip position (pointer input)
    pub fn set_strip_index(&mut self, strip_index: usize) {
        if strip_index < self.strip_len() {
            self.cursor = strip_index as i64;
        }
    }

    /// Shift needed to bring the cursor back toward the middle lap:
    /// `+len` below half a lap, `-len` at or past two and a half laps
    pub fn pending_shift(&self) -> i64 {
        let len = self.len as i64;
        if len == 0 {
            0
        } else if 2 * self.cursor < len {
            len
        } else if 2 * self.cursor >= 5 * len {
            -len
        } else {
            0
        }
    }

    /// Apply the pending shift. The visible index is unchanged.
    pub fn recenter(&mut self) -> i64 {
        let shift = self.pending_shift();
        self.cursor += shift;
        shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_middle_lap() {
        let mapper = LoopMapper::new(6, 2);
        assert_eq!(mapper.cursor(), 8);
        assert_eq!(mapper.visible_index(), 2);
        assert_eq!(mapper.strip_len(), 18);
    }

    #[test]
    fn test_visible_index_never_negative() {
        let mut mapper = LoopMapper::new(4, 0);
        for _ in 0..7 {
            mapper.step(-1);
        }
        assert_eq!(mapper.cursor(), -3);
        assert_eq!(mapper.visible_index(), 1);
    }

    #[test]
    fn test_recenter_from_third_lap() {
        // N = 10: cursor 25 is 2.5 * N
        let mut mapper = LoopMapper::new(10, 4);
        for _ in 0..11 {
            mapper.step(1);
        }
        assert_eq!(mapper.cursor(), 25);
        let visible = mapper.visible_index();

        assert_eq!(mapper.recenter(), -10);
        assert_eq!(mapper.cursor(), 15);
        assert_eq!(mapper.visible_index(), visible);
    }

    #[test]
    fn test_recenter_from_first_lap() {
        let mut mapper = LoopMapper::new(10, 0);
        for _ in 0..6 {
            mapper.step(-1);
        }
        assert_eq!(mapper.cursor(), 4);
        assert_eq!(mapper.recenter(), 10);
        assert_eq!(mapper.cursor(), 14);
        assert_eq!(mapper.visible_index(), 4);
    }

    #[test]
    fn test_no_recenter_inside_band() {
        let mut mapper = LoopMapper::new(10, 0);
        mapper.step(-5);
        assert_eq!(mapper.cursor(), 5);
        assert_eq!(mapper.recenter(), 0);

        let mut mapper = LoopMapper::new(10, 9);
        mapper.step(5);
        assert_eq!(mapper.cursor(), 24);
        assert_eq!(mapper.pending_shift(), 0);
    }

    #[test]
    fn test_odd_length_threshold() {
        // 2.5 * 3 = 7.5, so 8 is the first cursor past it
        let mut mapper = LoopMapper::new(3, 2);
        mapper.step(2);
        assert_eq!(mapper.cursor(), 7);
        assert_eq!(mapper.pending_shift(), 0);
        mapper.step(1);
        assert_eq!(mapper.pending_shift(), -3);
    }

    #[test]
    fn test_pointer_outside_strip_ignored() {
        let mut mapper = LoopMapper::new(3, 0);
        mapper.set_strip_index(9);
        assert_eq!(mapper.cursor(), 3);
        mapper.set_strip_index(7);
        assert_eq!(mapper.visible_index(), 1);
    }

    #[test]
    fn test_empty_sequence() {
        let mut mapper = LoopMapper::new(0, 0);
        assert_eq!(mapper.step(1), 0);
        assert_eq!(mapper.recenter(), 0);
        assert_eq!(mapper.strip_index(), None);
    }
}
