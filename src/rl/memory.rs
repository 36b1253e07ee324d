//! Experience replay memory
//!
//! A bounded FIFO buffer of transitions. Appending at capacity evicts the
//! oldest entry; sampling draws a uniform subset without replacement. There
//! is no prioritization and no deduplication.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::error::MemoryError;
use super::features::State;
use crate::game::TurnAction;

/// One experience tuple. Immutable once stored; it only ever leaves the
/// buffer by FIFO eviction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: State,
    pub action: TurnAction,
    pub reward: f32,
    pub next_state: State,
    pub done: bool,
}

/// Bounded FIFO buffer of transitions with uniform batch sampling.
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
    rng: StdRng,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    #[cfg(test)]
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Append a transition, evicting the oldest entry when at capacity.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Sample a uniform batch without replacement.
    ///
    /// Returns `min(batch_size, len)` transitions; when the buffer holds no
    /// more than `batch_size` entries, every entry is returned. Sampling an
    /// empty memory is a contract violation and fails with
    /// [`MemoryError::Empty`] — the training loop only samples after at least
    /// one completed episode.
    pub fn sample(&mut self, batch_size: usize) -> Result<Vec<Transition>, MemoryError> {
        if self.buffer.is_empty() {
            return Err(MemoryError::Empty);
        }

        if self.buffer.len() <= batch_size {
            return Ok(self.buffer.iter().copied().collect());
        }

        let indices = index::sample(&mut self.rng, self.buffer.len(), batch_size);
        Ok(indices.iter().map(|i| self.buffer[i]).collect())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether a transition is currently retrievable (test hook for the
    /// eviction order).
    #[cfg(test)]
    pub fn contains(&self, transition: &Transition) -> bool {
        self.buffer.contains(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::features::STATE_DIM;

    fn transition(tag: f32) -> Transition {
        // Tag the reward so individual transitions are distinguishable
        Transition {
            state: State([0.0; STATE_DIM]),
            action: TurnAction::Straight,
            reward: tag,
            next_state: State([0.0; STATE_DIM]),
            done: false,
        }
    }

    #[test]
    fn test_push_and_len() {
        let mut memory = ReplayMemory::new(10);
        assert!(memory.is_empty());

        memory.push(transition(1.0));
        assert_eq!(memory.len(), 1);

        for i in 0..9 {
            memory.push(transition(i as f32));
        }
        assert_eq!(memory.len(), 10);
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut memory = ReplayMemory::new(5);
        for i in 0..50 {
            memory.push(transition(i as f32));
        }
        assert_eq!(memory.len(), 5);
    }

    #[test]
    fn test_fifo_eviction_order() {
        // Capacity 3; push A, B, C, D: A must be gone, {B, C, D} retained.
        let mut memory = ReplayMemory::new(3);
        let (a, b, c, d) = (
            transition(1.0),
            transition(2.0),
            transition(3.0),
            transition(4.0),
        );

        memory.push(a);
        memory.push(b);
        memory.push(c);
        memory.push(d);

        assert_eq!(memory.len(), 3);
        assert!(!memory.contains(&a));
        assert!(memory.contains(&b));
        assert!(memory.contains(&c));
        assert!(memory.contains(&d));
    }

    #[test]
    fn test_capacity_plus_one_evicts_only_oldest() {
        let mut memory = ReplayMemory::new(100);
        for i in 0..101 {
            memory.push(transition(i as f32));
        }
        assert_eq!(memory.len(), 100);
        assert!(!memory.contains(&transition(0.0)));
        assert!(memory.contains(&transition(100.0)));
    }

    #[test]
    fn test_sample_returns_all_when_small() {
        let mut memory = ReplayMemory::with_seed(100, 7);
        for i in 0..4 {
            memory.push(transition(i as f32));
        }

        let batch = memory.sample(10).unwrap();
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_sample_exact_batch_without_duplicates() {
        let mut memory = ReplayMemory::with_seed(100, 7);
        for i in 0..50 {
            memory.push(transition(i as f32));
        }

        let batch = memory.sample(10).unwrap();
        assert_eq!(batch.len(), 10);

        // Rewards are unique tags, so duplicate rewards mean duplicate draws
        let mut tags: Vec<i64> = batch.iter().map(|t| t.reward as i64).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 10, "sample must not contain duplicates");
    }

    #[test]
    fn test_sample_empty_memory_errors() {
        let mut memory = ReplayMemory::new(10);
        assert!(matches!(memory.sample(5), Err(MemoryError::Empty)));
    }

    #[test]
    fn test_transitions_are_not_mutated_by_sampling() {
        let mut memory = ReplayMemory::with_seed(10, 3);
        let t = transition(42.0);
        memory.push(t);

        let batch = memory.sample(1).unwrap();
        assert_eq!(batch[0], t);
        // Still present and unchanged after sampling
        assert!(memory.contains(&t));
    }
}
