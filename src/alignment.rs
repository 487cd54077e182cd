//! Surface alignment classification
//!
//! Recent alignment observations are kept in a bounded FIFO window. A new
//! alignment is only committed once its votes exceed a per-alignment threshold,
//! which suppresses flicker from noisy single hit-tests. Horizontal needs more
//! votes than vertical (15 vs 10 by default), so floors are stickier than walls.
//! A hit on a concrete plane anchor bypasses the vote entirely.

use std::collections::VecDeque;
use tracing::debug;

use crate::types::PlaneAlignment;

/// Outcome of feeding one observation to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentVote {
    /// The observation disagrees with the vote history; keep the previous output
    Rejected,
    /// The observation is backed by the history (or by a plane anchor)
    Accepted {
        alignment: PlaneAlignment,
        /// The committed alignment differs from the previous one
        changed: bool,
    },
}

/// Debounced alignment classifier
#[derive(Debug, Clone)]
pub struct AlignmentClassifier {
    window: VecDeque<PlaneAlignment>,
    capacity: usize,
    horizontal_votes: usize,
    vertical_votes: usize,
    current: Option<PlaneAlignment>,
}

impl AlignmentClassifier {
    /// Create a classifier
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of observations kept in the window
    /// * `horizontal_votes` - Horizontal commits when its count exceeds this
    /// * `vertical_votes` - Vertical commits when its count exceeds this
    pub fn new(capacity: usize, horizontal_votes: usize, vertical_votes: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            horizontal_votes,
            vertical_votes,
            current: None,
        }
    }

    /// Feed one observation
    ///
    /// # Arguments
    ///
    /// * `observation` - Raw alignment of this hit, if it has one
    /// * `on_plane_anchor` - The hit landed on a concrete plane anchor
    pub fn observe(&mut self, observation: Option<PlaneAlignment>, on_plane_anchor: bool) -> AlignmentVote {
        if let Some(alignment) = observation {
            if self.window.len() == self.capacity {
                self.window.pop_front();
            }
            self.window.push_back(alignment);
        }

        let (horizontal, vertical) = self.counts();

        let backed = match observation {
            Some(PlaneAlignment::Horizontal) => horizontal > self.horizontal_votes,
            Some(PlaneAlignment::Vertical) => vertical > self.vertical_votes,
            None => false,
        };

        let alignment = match observation {
            Some(alignment) if backed || on_plane_anchor => alignment,
            _ => return AlignmentVote::Rejected,
        };

        let changed = self.current != Some(alignment);
        if changed {
            debug!(
                from = ?self.current,
                to = %alignment,
                horizontal,
                vertical,
                on_plane_anchor,
                "Alignment committed"
            );
            self.current = Some(alignment);
            self.window.clear();
        }

        AlignmentVote::Accepted { alignment, changed }
    }

    /// Occurrences of (horizontal, vertical) in the window
    pub fn counts(&self) -> (usize, usize) {
        self.window
            .iter()
            .fold((0, 0), |(h, v), alignment| match alignment {
                PlaneAlignment::Horizontal => (h + 1, v),
                PlaneAlignment::Vertical => (h, v + 1),
            })
    }

    /// Currently committed alignment (`None` until the first commit)
    pub fn current(&self) -> Option<PlaneAlignment> {
        self.current
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Forget the vote history and the committed alignment
    pub fn clear(&mut self) {
        self.window.clear();
        self.current = None;
    }
}

impl Default for AlignmentClassifier {
    fn default() -> Self {
        Self::new(20, 15, 10)
    }
}
