//! Error types for crossup-netcode

use crossup_core::PlayerId;
use thiserror::Error;

/// Netcode error type
#[derive(Debug, Error)]
pub enum Error {
    /// A rollback needed a snapshot that was evicted or never stored.
    ///
    /// Live state is left untouched when this is returned; the session
    /// layer must force a full resync (or end the match) because local
    /// history can no longer be corrected.
    #[error("Snapshot not found for frame {0}; full resync required")]
    SnapshotMissing(u64),

    /// A remote input arrived carrying a player ID that is not the remote
    /// seat of this engine.
    #[error("Remote input from unexpected player {0}")]
    UnexpectedPlayer(PlayerId),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
