//! Visible window derivation.
//!
//! The window is never stored; the controller recomputes it from the current
//! index on every read.

use serde::Serialize;

/// Ordered set of item indices currently rendered, in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleWindow {
    indices: Vec<usize>,
    current: usize,
}

impl VisibleWindow {
    /// Window of `min(size, len)` indices around `current`.
    ///
    /// The window starts `size / 2` slots before `current`, so a size of 2
    /// renders `{prev, current}` and a size of 3 renders `{prev, current, next}`.
    /// `len` must be non-zero and `current < len`.
    pub fn compute(current: usize, len: usize, size: usize) -> Self {
        debug_assert!(len > 0 && current < len);
        let k = size.clamp(1, len);
        let back = k / 2;
        let start = (current + len - back % len) % len;

        let indices = (0..k).map(|offset| (start + offset) % len).collect();
        Self { indices, current }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Slot of `index` within the window (0 = leftmost).
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    /// Slot of the current item.
    pub fn center_position(&self) -> usize {
        self.position_of(self.current).unwrap_or(0)
    }

    pub fn is_leftmost(&self, index: usize) -> bool {
        self.indices.first() == Some(&index) && index != self.current
    }

    pub fn is_rightmost(&self, index: usize) -> bool {
        self.indices.last() == Some(&index) && index != self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_card_window_wraps_both_ways() {
        assert_eq!(VisibleWindow::compute(0, 6, 3).indices(), &[5, 0, 1]);
        assert_eq!(VisibleWindow::compute(5, 6, 3).indices(), &[4, 5, 0]);
        assert_eq!(VisibleWindow::compute(2, 6, 3).indices(), &[1, 2, 3]);
    }

    #[test]
    fn test_fade_window_is_prev_and_current() {
        assert_eq!(VisibleWindow::compute(0, 4, 2).indices(), &[3, 0]);
        assert_eq!(VisibleWindow::compute(3, 4, 2).indices(), &[2, 3]);
    }

    #[test]
    fn test_single_slot_window() {
        let window = VisibleWindow::compute(2, 4, 1);
        assert_eq!(window.indices(), &[2]);
        assert_eq!(window.center_position(), 0);
    }

    #[test]
    fn test_window_never_exceeds_item_count() {
        let window = VisibleWindow::compute(1, 2, 3);
        assert_eq!(window.len(), 2);
        assert_eq!(window.indices(), &[0, 1]);

        let window = VisibleWindow::compute(0, 1, 3);
        assert_eq!(window.indices(), &[0]);
    }

    #[test]
    fn test_edges() {
        let window = VisibleWindow::compute(2, 6, 3);
        assert!(window.is_leftmost(1));
        assert!(window.is_rightmost(3));
        assert!(!window.is_leftmost(2));
        assert_eq!(window.center_position(), 1);
        assert_eq!(window.position_of(4), None);
    }
}
