//! Position smoothing over a bounded window of recent hit positions
//!
//! The stabilized position is the plain arithmetic mean of the window. There is
//! no outlier rejection: one bad sample moves the output until it is evicted.

use glam::Vec3;
use std::collections::VecDeque;

/// Rolling FIFO window of recent positions
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    window: VecDeque<Vec3>,
    capacity: usize,
}

impl PositionSmoother {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a position, evicting the oldest, and return the new average
    pub fn push(&mut self, position: Vec3) -> Vec3 {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(position);

        // Non-empty after the push
        self.average().unwrap_or(position)
    }

    /// Mean of the positions currently in the window
    pub fn average(&self) -> Option<Vec3> {
        if self.window.is_empty() {
            return None;
        }
        let sum: Vec3 = self.window.iter().copied().sum();
        Some(sum / self.window.len() as f32)
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
