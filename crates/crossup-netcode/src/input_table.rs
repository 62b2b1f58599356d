//! Per-frame input table
//!
//! One row per frame, one slot per seat. The table is where the
//! confirmed-versus-predicted overwrite rule is enforced: once a slot holds
//! a [`FrameInput::Confirmed`] it is immutable, while a
//! [`FrameInput::Predicted`] slot can be replaced by anything at any time.

use crossup_core::{FrameInput, PlayerId, PlayerInput};
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
struct Row {
    local: Option<FrameInput>,
    remote: Option<FrameInput>,
}

/// Frame-keyed input storage for both seats of a match.
#[derive(Debug, Clone)]
pub struct InputTable {
    rows: IndexMap<u64, Row>,
    local: PlayerId,
    remote: PlayerId,
}

impl InputTable {
    /// Create an empty table for the given seats
    pub fn new(local: PlayerId, remote: PlayerId) -> Self {
        Self {
            rows: IndexMap::new(),
            local,
            remote,
        }
    }

    /// Store an input for its frame and player.
    ///
    /// Returns whether the input was stored. It is not stored when the slot
    /// already holds a confirmed input (confirmations are immutable — the
    /// first one wins, and a prediction never replaces one), or when the
    /// player belongs to neither seat.
    pub fn insert(&mut self, input: FrameInput) -> bool {
        let frame = input.frame();
        let player = input.input().player.clone();
        let row = self.rows.entry(frame).or_default();
        let slot = if player == self.local {
            &mut row.local
        } else if player == self.remote {
            &mut row.remote
        } else {
            return false;
        };

        if matches!(slot, Some(FrameInput::Confirmed(_))) {
            return false;
        }
        *slot = Some(input);
        true
    }

    /// Get the stored input for a frame and player, confirmed or predicted
    pub fn get(&self, frame: u64, player: &PlayerId) -> Option<&FrameInput> {
        let row = self.rows.get(&frame)?;
        if *player == self.local {
            row.local.as_ref()
        } else if *player == self.remote {
            row.remote.as_ref()
        } else {
            None
        }
    }

    /// Get the stored input only if it is confirmed
    pub fn confirmed(&self, frame: u64, player: &PlayerId) -> Option<&PlayerInput> {
        match self.get(frame, player)? {
            FrameInput::Confirmed(input) => Some(input),
            FrameInput::Predicted(_) => None,
        }
    }

    /// Drop all rows strictly before the given frame (shares the rollback
    /// controller's eviction watermark with the snapshot store)
    pub fn clear_before(&mut self, frame: u64) {
        self.rows.retain(|f, _| *f >= frame);
    }

    /// Drop all rows
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of frames with at least one stored input
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossup_core::Buttons;

    fn table() -> InputTable {
        InputTable::new(PlayerId::new("p1"), PlayerId::new("p2"))
    }

    fn input(frame: u64, player: &str, buttons: Buttons) -> PlayerInput {
        PlayerInput::new(frame, PlayerId::new(player), buttons)
    }

    #[test]
    fn test_insert_and_get() {
        let mut t = table();
        assert!(t.insert(FrameInput::Confirmed(input(1, "p1", Buttons::NONE))));
        assert!(t.insert(FrameInput::Predicted(input(1, "p2", Buttons::NONE))));

        let p2 = PlayerId::new("p2");
        assert!(t.get(1, &p2).unwrap().is_predicted());
        assert!(t.confirmed(1, &p2).is_none());
        assert!(t.confirmed(1, &PlayerId::new("p1")).is_some());
    }

    #[test]
    fn test_prediction_never_overwrites_confirmation() {
        let mut t = table();
        let p2 = PlayerId::new("p2");
        let real = Buttons {
            jump: true,
            ..Buttons::NONE
        };

        assert!(t.insert(FrameInput::Confirmed(input(3, "p2", real))));
        assert!(!t.insert(FrameInput::Predicted(input(3, "p2", Buttons::NONE))));

        assert_eq!(t.confirmed(3, &p2).unwrap().buttons, real);
    }

    #[test]
    fn test_confirmation_replaces_prediction() {
        let mut t = table();
        let p2 = PlayerId::new("p2");
        let real = Buttons {
            attack: true,
            ..Buttons::NONE
        };

        assert!(t.insert(FrameInput::Predicted(input(3, "p2", Buttons::NONE))));
        assert!(t.insert(FrameInput::Confirmed(input(3, "p2", real))));

        assert_eq!(t.confirmed(3, &p2).unwrap().buttons, real);
    }

    #[test]
    fn test_first_confirmation_wins() {
        let mut t = table();
        let p2 = PlayerId::new("p2");
        let first = Buttons {
            left: true,
            ..Buttons::NONE
        };
        let second = Buttons {
            right: true,
            ..Buttons::NONE
        };

        assert!(t.insert(FrameInput::Confirmed(input(3, "p2", first))));
        assert!(!t.insert(FrameInput::Confirmed(input(3, "p2", second))));

        assert_eq!(t.confirmed(3, &p2).unwrap().buttons, first);
    }

    #[test]
    fn test_prediction_replaces_prediction() {
        let mut t = table();
        let p2 = PlayerId::new("p2");
        let updated = Buttons {
            guard: true,
            ..Buttons::NONE
        };

        assert!(t.insert(FrameInput::Predicted(input(3, "p2", Buttons::NONE))));
        assert!(t.insert(FrameInput::Predicted(input(3, "p2", updated))));

        assert_eq!(t.get(3, &p2).unwrap().buttons(), updated);
    }

    #[test]
    fn test_unknown_player_rejected() {
        let mut t = table();
        assert!(!t.insert(FrameInput::Confirmed(input(1, "p3", Buttons::NONE))));
        assert!(t.get(1, &PlayerId::new("p3")).is_none());
    }

    #[test]
    fn test_clear_before() {
        let mut t = table();
        for frame in 0..5 {
            t.insert(FrameInput::Confirmed(input(frame, "p1", Buttons::NONE)));
        }

        t.clear_before(3);

        assert!(t.get(2, &PlayerId::new("p1")).is_none());
        assert!(t.get(3, &PlayerId::new("p1")).is_some());
        assert_eq!(t.len(), 2);
    }
}
