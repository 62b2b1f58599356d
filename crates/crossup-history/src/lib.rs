//! Crossup History - frame-keyed snapshot store for rollback
//!
//! Stores full deep copies of [`GameState`] keyed by frame number. The
//! rollback controller snapshots after every simulated frame and evicts
//! everything strictly older than its sync-frame watermark, so the store
//! stays bounded by the rollback window without a fixed capacity.
//!
//! # Example
//!
//! ```rust
//! use crossup_core::{CharacterState, Fixed, GameState, PlayerId, StateHistory};
//! use crossup_history::SnapshotStore;
//!
//! let state = GameState::new(
//!     CharacterState::spawn(PlayerId::new("p1"), Fixed::from_int(-5)),
//!     CharacterState::spawn(PlayerId::new("p2"), Fixed::from_int(5)),
//!     12345,
//! );
//!
//! let mut store = SnapshotStore::new();
//! store.save_state(0, &state);
//! assert!(store.get_state(0).is_some());
//!
//! // Advance the watermark: frame 0 is gone, nothing else is touched.
//! store.save_state(1, &state);
//! store.clear_before(1);
//! assert!(store.get_state(0).is_none());
//! assert!(store.get_state(1).is_some());
//! ```

use crossup_core::{GameState, StateHistory};
use indexmap::IndexMap;

/// A frame-keyed store of game state snapshots.
///
/// Snapshots are deep copies and are never mutated in place; re-saving a
/// frame replaces its snapshot wholesale.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    states: IndexMap<u64, GameState>,
}

impl SnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            states: IndexMap::new(),
        }
    }

    /// Create an empty store with room for `capacity` snapshots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: IndexMap::with_capacity(capacity),
        }
    }

    /// Iterate stored snapshots in insertion order (frame order under the
    /// controller's strictly-increasing save pattern)
    pub fn iter(&self) -> impl Iterator<Item = (u64, &GameState)> {
        self.states.iter().map(|(frame, state)| (*frame, state))
    }
}

impl StateHistory for SnapshotStore {
    fn save_state(&mut self, frame: u64, state: &GameState) {
        self.states.insert(frame, state.clone());
    }

    fn get_state(&self, frame: u64) -> Option<&GameState> {
        self.states.get(&frame)
    }

    fn clear_before(&mut self, frame: u64) {
        self.states.retain(|f, _| *f >= frame);
    }

    fn clear(&mut self) {
        self.states.clear();
    }

    fn len(&self) -> usize {
        self.states.len()
    }

    fn frame_range(&self) -> Option<(u64, u64)> {
        let mut frames = self.states.keys();
        let first = *frames.next()?;
        let (min, max) = frames.fold((first, first), |(min, max), f| (min.min(*f), max.max(*f)));
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossup_core::{CharacterState, Fixed, PlayerId};

    fn sample() -> GameState {
        GameState::new(
            CharacterState::spawn(PlayerId::new("p1"), Fixed::from_int(-5)),
            CharacterState::spawn(PlayerId::new("p2"), Fixed::from_int(5)),
            12345,
        )
    }

    #[test]
    fn test_save_and_get() {
        let mut store = SnapshotStore::new();
        let state = sample();

        store.save_state(10, &state);
        store.save_state(20, &state);

        assert_eq!(store.len(), 2);
        assert!(store.get_state(10).is_some());
        assert!(store.get_state(20).is_some());
        assert!(store.get_state(15).is_none());
    }

    #[test]
    fn test_missing_frame_returns_none_without_side_effects() {
        let mut store = SnapshotStore::new();
        store.save_state(5, &sample());

        assert!(store.get_state(4).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.get_state(5).is_some());
    }

    #[test]
    fn test_resave_replaces_wholesale() {
        let mut store = SnapshotStore::new();
        let mut state = sample();
        store.save_state(3, &state);

        state.player1.health = Fixed::from_int(80);
        store.save_state(3, &state);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_state(3).unwrap().player1.health,
            Fixed::from_int(80)
        );
    }

    #[test]
    fn test_saved_copy_is_independent() {
        let mut store = SnapshotStore::new();
        let mut state = sample();
        store.save_state(0, &state);

        // Mutating the live state must not touch the snapshot.
        state.player1.position.x = Fixed::from_int(99);
        assert_eq!(
            store.get_state(0).unwrap().player1.position.x,
            Fixed::from_int(-5)
        );
    }

    #[test]
    fn test_fixed_raw_survives_save_load() {
        let mut store = SnapshotStore::new();
        let mut state = sample();
        state.player2.velocity.y = Fixed::from_raw(-1);
        store.save_state(7, &state);

        let loaded = store.get_state(7).unwrap();
        assert_eq!(loaded.player2.velocity.y.raw(), -1);
        assert_eq!(*loaded, state);
    }

    #[test]
    fn test_clear_before() {
        let mut store = SnapshotStore::new();
        let state = sample();
        for frame in 0..5 {
            store.save_state(frame, &state);
        }

        store.clear_before(3);

        assert!(store.get_state(0).is_none());
        assert!(store.get_state(2).is_none());
        assert!(store.get_state(3).is_some());
        assert!(store.get_state(4).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_frame_range() {
        let mut store = SnapshotStore::new();
        let state = sample();

        assert!(store.frame_range().is_none());

        store.save_state(10, &state);
        assert_eq!(store.frame_range(), Some((10, 10)));

        store.save_state(30, &state);
        store.save_state(20, &state);
        assert_eq!(store.frame_range(), Some((10, 30)));
    }

    #[test]
    fn test_iter_follows_insertion_order() {
        let mut store = SnapshotStore::new();
        let state = sample();
        for frame in 3..7 {
            store.save_state(frame, &state);
        }

        let frames: Vec<u64> = store.iter().map(|(frame, _)| frame).collect();
        assert_eq!(frames, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_clear() {
        let mut store = SnapshotStore::new();
        store.save_state(1, &sample());
        store.clear();
        assert!(store.is_empty());
        assert!(store.frame_range().is_none());
    }
}
