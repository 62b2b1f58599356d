//! Crossup Core - deterministic fighting game simulation
//!
//! This crate is the determinism surface of the crossup netcode stack:
//!
//! - **Fixed-point arithmetic** (`Fixed`) - identical math on every client
//! - **Input and state model** - per-frame inputs, character and game state
//! - **Simulation step** (`sim`) - pure fixed-timestep frame advance
//! - **Seed evolution** (`rng`) - fixed LCG, no non-deterministic sources
//! - **Canonical checksums** (`checksum`) - cross-client desync detection
//! - **StateHistory trait** - the seam snapshot stores implement
//!
//! Rollback, prediction, and input reconciliation live in
//! `crossup-netcode`; the frame-keyed snapshot store lives in
//! `crossup-history`. This crate has no I/O and no clock: callers feed it
//! inputs, it produces bit-identical states.

mod checksum;
mod error;
mod fixed;
mod history;
mod input;
mod rng;
pub mod sim;
mod state;

pub use checksum::{canonical_bytes, state_checksum};
pub use error::{Error, Result};
pub use fixed::{Fixed, FRACTIONAL_BITS, SCALE};
pub use history::StateHistory;
pub use input::{Buttons, FrameInput, PlayerId, PlayerInput};
pub use rng::{next_seed, Lcg};
pub use sim::{handle_collisions, simulate_character, simulate_frame, SimInputs, TIMESTEP};
pub use state::{Action, CharacterState, GameState, Rect, Vec2};
