/// Sliding neighborhood over a materialized point sequence.
///
/// The window is an inclusive index range `[lo, hi]` into a sequence of
/// length `len`. It starts as `[0, reach]` and, after each `advance`, grows at
/// the front by one index (while indices remain) and drops its oldest index
/// once that index falls more than `reach` behind the current position, so
/// it never spans more than `2 * reach + 1` entries. For the point at
/// position `i` this yields `[max(0, i - reach), min(len - 1, i + reach)]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborhoodWindow {
    lo: usize,
    hi: usize,
    len: usize,
    reach: usize,
    /// Position of the point the window is currently centered on.
    pos: usize,
}

impl NeighborhoodWindow {
    /// Seed the window for position 0. Returns `None` for an empty sequence.
    pub fn new(len: usize, reach: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            lo: 0,
            hi: reach.min(len - 1),
            len,
            reach,
            pos: 0,
        })
    }

    #[inline]
    pub fn range(&self) -> std::ops::RangeInclusive<usize> {
        self.lo..=self.hi
    }

    #[inline]
    pub fn span(&self) -> usize {
        self.hi - self.lo + 1
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Borrow the window's slice of `seq`.
    #[inline]
    pub fn slice<'a, T>(&self, seq: &'a [T]) -> &'a [T] {
        debug_assert_eq!(seq.len(), self.len);
        &seq[self.range()]
    }

    /// Move to the next position; a no-op at the last position.
    pub fn advance(&mut self) {
        if self.pos + 1 >= self.len {
            return;
        }
        let next = self.pos + self.reach + 1;
        if next < self.len {
            self.hi = next;
        }
        self.pos += 1;
        if self.pos - self.lo > self.reach {
            self.lo += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(len: usize, reach: usize) -> Vec<(usize, usize)> {
        let mut win = NeighborhoodWindow::new(len, reach).unwrap();
        let mut out = Vec::with_capacity(len);
        for _ in 0..len {
            out.push((*win.range().start(), *win.range().end()));
            win.advance();
        }
        out
    }

    #[test]
    fn window_is_centered_on_each_position() {
        let len = 10;
        let reach = 3;
        for (i, (lo, hi)) in ranges(len, reach).into_iter().enumerate() {
            assert_eq!(lo, i.saturating_sub(reach), "lo at {i}");
            assert_eq!(hi, (i + reach).min(len - 1), "hi at {i}");
        }
    }

    #[test]
    fn window_never_exceeds_full_width() {
        let mut win = NeighborhoodWindow::new(50, 2).unwrap();
        for _ in 0..50 {
            assert!(win.span() <= 5);
            win.advance();
        }
    }

    #[test]
    fn short_sequence_is_covered_entirely() {
        assert_eq!(ranges(2, 3), vec![(0, 1), (0, 1)]);
    }

    #[test]
    fn zero_reach_holds_single_point() {
        assert_eq!(ranges(3, 0), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn advance_stops_at_last_position() {
        let mut win = NeighborhoodWindow::new(3, 1).unwrap();
        for _ in 0..5 {
            win.advance();
        }
        assert_eq!(win.position(), 2);
        assert_eq!(win.range(), 1..=2);
    }

    #[test]
    fn empty_sequence_has_no_window() {
        assert!(NeighborhoodWindow::new(0, 3).is_none());
    }

    #[test]
    fn slice_borrows_from_sequence() {
        let seq: Vec<u32> = (0..8).collect();
        let mut win = NeighborhoodWindow::new(seq.len(), 1).unwrap();
        win.advance();
        win.advance();
        assert_eq!(win.slice(&seq), &[1, 2, 3]);
        assert_eq!(win.position(), 2);
    }
}
