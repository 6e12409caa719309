//! Turns a drag gesture into turn requests.

use std::collections::VecDeque;

use crate::snake::Direction;

pub const DEFAULT_WINDOW: usize = 5;
pub const DEFAULT_MIN_DIFFERENCE: i32 = 5;

/// Tracks the last few drag deltas. The axis with the larger smoothed
/// movement decides the direction; the sign of the latest delta on that
/// axis picks which way.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    last: (i32, i32),
    diffs_x: VecDeque<i32>,
    diffs_y: VecDeque<i32>,
    min_difference: i32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        SwipeTracker::new(DEFAULT_WINDOW, DEFAULT_MIN_DIFFERENCE)
    }
}

impl SwipeTracker {
    pub fn new(window: usize, min_difference: i32) -> Self {
        let window = window.max(1);
        SwipeTracker {
            last: (0, 0),
            diffs_x: VecDeque::from(vec![0; window]),
            diffs_y: VecDeque::from(vec![0; window]),
            min_difference,
        }
    }

    /// Starts a new gesture at `(x, y)`.
    pub fn start(&mut self, x: i32, y: i32) {
        self.diffs_x.iter_mut().for_each(|diff| *diff = 0);
        self.diffs_y.iter_mut().for_each(|diff| *diff = 0);
        self.last = (x, y);
    }

    /// Feeds a drag position. Movements smaller than the minimum difference
    /// on both axes are ignored.
    pub fn track(&mut self, x: i32, y: i32) -> Option<Direction> {
        let dx = self.last.0 - x;
        let dy = self.last.1 - y;
        if dx.abs() < self.min_difference && dy.abs() < self.min_difference {
            return None;
        }
        self.last = (x, y);

        self.diffs_x.pop_front();
        self.diffs_x.push_back(dx);
        self.diffs_y.pop_front();
        self.diffs_y.push_back(dy);

        let sum_x: i32 = self.diffs_x.iter().sum();
        let sum_y: i32 = self.diffs_y.iter().sum();
        let direction = if sum_x.abs() > sum_y.abs() {
            if dx > 0 {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if dy > 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        Some(direction)
    }
}
