//! Remote-input prediction policy
//!
//! Fighting game inputs are strongly auto-correlated frame to frame, so the
//! policy is repetition: scan backward from the frame before the target to
//! the sync frame and repeat the most recent input stored for the player —
//! confirmed or itself a prediction. With nothing to go on, predict no
//! buttons held.

use crate::input_table::InputTable;
use crossup_core::{Buttons, PlayerId, PlayerInput};

/// Synthesize a prediction for `player` at `frame`.
///
/// The result is stamped with the target frame; the caller tags it
/// [`FrameInput::Predicted`](crossup_core::FrameInput) before storing it.
pub fn predict(table: &InputTable, player: &PlayerId, frame: u64, sync_frame: u64) -> PlayerInput {
    let mut scan = frame;
    while scan > sync_frame {
        scan -= 1;
        if let Some(stored) = table.get(scan, player) {
            return PlayerInput::new(frame, player.clone(), stored.buttons());
        }
    }
    PlayerInput::new(frame, player.clone(), Buttons::NONE)
}
