//! Crossup Netcode - rollback synchronization for peer-to-peer play
//!
//! Two clients run the deterministic simulation from `crossup-core`
//! independently. Local input is applied immediately; the remote player's
//! input is predicted until the real thing arrives over an unreliable
//! transport. When a prediction turns out wrong, the engine rewinds to the
//! last known-good snapshot and re-simulates forward with corrected inputs.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Client                              │
//! │  ┌─────────────┐   ┌──────────────┐   ┌────────────────┐  │
//! │  │ Input Table │──▶│  Prediction  │──▶│   Simulation   │  │
//! │  └─────────────┘   └──────────────┘   └────────────────┘  │
//! │        ▲                  │                   │            │
//! │        │                  ▼                   ▼            │
//! │  ┌─────────────┐   ┌──────────────┐   ┌────────────────┐  │
//! │  │  Transport  │──▶│   Rollback   │◀──│ Snapshot Store │  │
//! │  └─────────────┘   └──────────────┘   └────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use crossup_core::{
//!     sim::TIMESTEP, Buttons, CharacterState, Fixed, GameState, PlayerId, PlayerInput,
//! };
//! use crossup_history::SnapshotStore;
//! use crossup_netcode::RollbackEngine;
//!
//! let local = PlayerId::new("p1");
//! let remote = PlayerId::new("p2");
//! let initial = GameState::new(
//!     CharacterState::spawn(local.clone(), Fixed::from_int(-5)),
//!     CharacterState::spawn(remote.clone(), Fixed::from_int(5)),
//!     12345,
//! );
//!
//! let mut engine = RollbackEngine::new(
//!     initial, TIMESTEP, local, remote.clone(), SnapshotStore::new(),
//! );
//!
//! // Every local tick: sample input, advance one predicted frame.
//! engine.update(Buttons::NONE);
//!
//! // Whenever the transport hands us a remote input, reconcile.
//! let packet = PlayerInput::new(1, remote, Buttons::NONE);
//! engine.receive_remote_input(packet)?;
//!
//! assert_eq!(engine.sync_frame(), 1);
//! # Ok::<(), crossup_netcode::Error>(())
//! ```

mod engine;
mod error;
mod input_table;
mod prediction;
mod transport;

pub use engine::RollbackEngine;
pub use error::{Error, Result};
pub use input_table::InputTable;
pub use prediction::predict;
pub use transport::{InputChannel, Packet};

// Re-export the storage trait for convenience
pub use crossup_core::StateHistory;
