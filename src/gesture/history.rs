use super::{Direction, GestureState};
use std::collections::VecDeque;

/// Most-recent-N gesture states, oldest evicted first
#[derive(Debug, Clone)]
pub(crate) struct GestureHistory {
    capacity: usize,
    states: VecDeque<GestureState>,
}

impl GestureHistory {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            states: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, state: GestureState) {
        while self.states.len() >= self.capacity {
            self.states.pop_front();
        }
        self.states.push_back(state);
    }

    /// Shrink or grow the buffer; surplus oldest entries are dropped
    pub(crate) fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.states.len() > self.capacity {
            self.states.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    /// Direction agreed on by at least `quorum` of the `window` most recent
    /// entries whose confidence reaches `min_confidence`.
    ///
    /// Center never counts as agreement. Ties between two directions that both
    /// reach the quorum go to the one seen most recently.
    pub(crate) fn consistent_direction(&self, min_confidence: f64, window: usize, quorum: usize) -> Option<Direction> {
        let recent: Vec<Direction> = self
            .states
            .iter()
            .rev()
            .filter(|state| state.confidence >= min_confidence)
            .take(window)
            .map(|state| state.direction)
            .collect();

        if recent.len() < quorum {
            return None;
        }

        let mut best: Option<(Direction, usize)> = None;
        for direction in &recent {
            if !direction.is_active() {
                continue;
            }
            let votes = recent.iter().filter(|d| *d == direction).count();
            match best {
                Some((_, best_votes)) if best_votes >= votes => {}
                _ => best = Some((*direction, votes)),
            }
        }

        best.filter(|(_, votes)| *votes >= quorum).map(|(direction, _)| direction)
    }
}
