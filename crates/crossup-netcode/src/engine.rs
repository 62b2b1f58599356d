//! Prediction & rollback controller
//!
//! [`RollbackEngine`] owns the live [`GameState`], the snapshot history, and
//! the per-frame input table. Every local tick it stores the local input,
//! predicts the remote one, simulates a frame, and snapshots the result.
//! When a confirmed remote input arrives it re-checks every frame above the
//! sync watermark; on a mis-prediction it reloads the last good snapshot and
//! re-simulates forward with corrected inputs, overwriting history.
//!
//! Single-threaded: there is exactly one mutator of live state, and the
//! only asynchrony is the caller invoking
//! [`receive_remote_input`](RollbackEngine::receive_remote_input) whenever a
//! packet happens to arrive. No delivery ordering is assumed.

use crate::input_table::InputTable;
use crate::prediction::predict;
use crate::{Error, Result};
use crossup_core::{
    simulate_frame, state_checksum, Buttons, Fixed, FrameInput, GameState, PlayerId, PlayerInput,
    SimInputs, StateHistory,
};
use tracing::{debug, warn};

/// The rollback netcode controller for one client.
///
/// Generic over `H: StateHistory` to allow different snapshot backends.
///
/// Two frame counters drive everything:
/// - `current_frame`: the latest locally simulated frame
/// - `sync_frame`: the highest frame whose predicted simulation is known to
///   match the inputs stored for it; always `<= current_frame`
pub struct RollbackEngine<H: StateHistory> {
    /// Live game state at `current_frame`
    state: GameState,
    /// Snapshot per simulated frame, pruned below `sync_frame - 1`
    history: H,
    /// Inputs per frame and seat, pruned with the same watermark
    inputs: InputTable,
    current_frame: u64,
    sync_frame: u64,
    local_player: PlayerId,
    remote_player: PlayerId,
    /// Fixed simulation timestep
    dt: Fixed,
}

impl<H: StateHistory> RollbackEngine<H> {
    /// Create an engine from a starting state. The initial state is
    /// snapshotted immediately so a frame-1 rollback has somewhere to land.
    pub fn new(
        initial: GameState,
        dt: Fixed,
        local_player: PlayerId,
        remote_player: PlayerId,
        mut history: H,
    ) -> Self {
        let start_frame = initial.frame;
        history.save_state(start_frame, &initial);
        Self {
            inputs: InputTable::new(local_player.clone(), remote_player.clone()),
            state: initial,
            history,
            current_frame: start_frame,
            sync_frame: start_frame,
            local_player,
            remote_player,
            dt,
        }
    }

    /// Advance one local tick.
    ///
    /// Stores the local buttons as confirmed input for the new frame,
    /// predicts the remote input, simulates, and snapshots. The frame and
    /// player stamps are applied here so a caller cannot mis-stamp them.
    pub fn update(&mut self, local: Buttons) {
        self.current_frame += 1;
        let frame = self.current_frame;

        self.inputs.insert(FrameInput::Confirmed(PlayerInput::new(
            frame,
            self.local_player.clone(),
            local,
        )));

        let predicted = predict(&self.inputs, &self.remote_player, frame, self.sync_frame);
        self.inputs.insert(FrameInput::Predicted(predicted));

        let inputs = self.sim_inputs(frame);
        simulate_frame(&mut self.state, &inputs, self.dt);
        self.history.save_state(frame, &self.state);
        self.prune();
    }

    /// Ingest a confirmed remote input, whenever it happens to arrive.
    ///
    /// The input is stored as confirmed (replacing a stale prediction for
    /// that frame, never an earlier confirmation). Mis-prediction is
    /// detected right here, against the prediction the simulation actually
    /// consumed for that frame; a match costs nothing, a mismatch triggers
    /// rollback once the watermark walk reaches the offending frame.
    ///
    /// Fails with [`Error::SnapshotMissing`] when a mis-prediction is found
    /// but the snapshot needed to rewind was evicted; live state is left
    /// untouched in that case and the session layer must resync.
    pub fn receive_remote_input(&mut self, input: PlayerInput) -> Result<()> {
        if input.player != self.remote_player {
            return Err(Error::UnexpectedPlayer(input.player));
        }
        let frame = input.frame;
        let divergent = matches!(
            self.inputs.get(frame, &self.remote_player),
            Some(FrameInput::Predicted(used)) if used.buttons != input.buttons
        );
        self.inputs.insert(FrameInput::Confirmed(input));

        if !divergent || frame > self.current_frame {
            // Prediction was right, the frame is not simulated yet (the
            // confirmation simply waits for the simulation to catch up), or
            // the prediction record was already evicted and nothing remains
            // to compare against.
            return self.check_and_rollback(None);
        }

        if frame <= self.sync_frame {
            // A confirmation contradicting a frame already inside the
            // watermark. Correct it if the snapshot survives; surface the
            // gap explicitly if eviction already ate it.
            debug!(frame, "confirmed input contradicts synced frame");
            return self.rollback(frame);
        }

        debug!(frame, "remote input mis-predicted, rolling back");
        self.check_and_rollback(Some(frame))
    }

    /// Walk frames above the sync watermark, advancing it across frames
    /// whose inputs are consistent with the latest simulation, and stopping
    /// to roll back at `mispredicted` when given. At most one rollback per
    /// call: later mismatches surface on the next arrival.
    fn check_and_rollback(&mut self, mispredicted: Option<u64>) -> Result<()> {
        let mut frame = self.sync_frame + 1;
        while frame <= self.current_frame {
            if self.inputs.get(frame, &self.local_player).is_none()
                || self.inputs.get(frame, &self.remote_player).is_none()
            {
                // A seat has no input stored here; nothing further can be
                // confirmed.
                break;
            }
            if mispredicted == Some(frame) {
                return self.rollback(frame);
            }
            self.sync_frame = frame;
            frame += 1;
        }
        self.prune();
        Ok(())
    }

    /// Rewind to just before `frame` and re-simulate through the current
    /// frame with corrected inputs, overwriting each frame's snapshot.
    ///
    /// Predictions for still-unconfirmed frames are recomputed from the
    /// corrected history, not reused from the mis-predicted run.
    fn rollback(&mut self, frame: u64) -> Result<()> {
        let restore = frame - 1;
        if !self.load_state(restore) {
            warn!(
                frame = restore,
                "rollback snapshot missing; local history cannot be corrected"
            );
            return Err(Error::SnapshotMissing(restore));
        }

        for resim in frame..=self.current_frame {
            if self.inputs.confirmed(resim, &self.remote_player).is_none() {
                let refreshed =
                    predict(&self.inputs, &self.remote_player, resim, self.sync_frame);
                self.inputs.insert(FrameInput::Predicted(refreshed));
            }
            let inputs = self.sim_inputs(resim);
            simulate_frame(&mut self.state, &inputs, self.dt);
            self.history.save_state(resim, &self.state);
        }

        debug!(
            from = frame,
            to = self.current_frame,
            "rollback re-simulation complete"
        );
        self.prune();
        Ok(())
    }

    /// Replace live state with the snapshot at `frame`, if present.
    fn load_state(&mut self, frame: u64) -> bool {
        match self.history.get_state(frame) {
            Some(snapshot) => {
                self.state = snapshot.clone();
                true
            }
            None => false,
        }
    }

    /// Evict snapshots and input rows strictly older than `sync_frame - 1`.
    /// Anything at or after the watermark may still be needed for a rollback.
    fn prune(&mut self) {
        let watermark = self.sync_frame.saturating_sub(1);
        self.history.clear_before(watermark);
        self.inputs.clear_before(watermark);
    }

    /// Build the per-seat simulation inputs for a frame from the table.
    fn sim_inputs(&self, frame: u64) -> SimInputs {
        SimInputs {
            player1: self
                .inputs
                .get(frame, &self.state.player1.id)
                .map(FrameInput::buttons),
            player2: self
                .inputs
                .get(frame, &self.state.player2.id)
                .map(FrameInput::buttons),
        }
    }

    /// A deep copy of the live state, for rendering or inspection.
    pub fn game_state(&self) -> GameState {
        self.state.clone()
    }

    /// Borrow the live state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Canonical checksum of the live state.
    pub fn checksum(&self) -> String {
        state_checksum(&self.state)
    }

    /// The latest locally simulated frame.
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    /// The sync watermark.
    pub fn sync_frame(&self) -> u64 {
        self.sync_frame
    }

    /// How many frames of the present are running on prediction.
    pub fn prediction_frames(&self) -> u64 {
        self.current_frame - self.sync_frame
    }

    /// Access the snapshot history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the snapshot history.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Reset the engine onto a fresh starting state (new match or episode).
    /// Clears history and inputs and snapshots the new state.
    pub fn reset(&mut self, initial: GameState) {
        self.current_frame = initial.frame;
        self.sync_frame = initial.frame;
        self.state = initial;
        self.history.clear();
        self.inputs.clear();
        self.history.save_state(self.current_frame, &self.state);
    }
}
