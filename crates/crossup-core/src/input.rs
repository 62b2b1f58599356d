//! Per-frame player input model
//!
//! A [`PlayerInput`] is the complete record of what one player pressed on one
//! frame. The netcode layer stores these per `(frame, player)` and needs to
//! know whether a record came from the wire or was locally guessed; that
//! distinction is a sum type ([`FrameInput`]) rather than a runtime flag, so
//! a confirmed input can never be mistaken for a prediction by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a player seat
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The button state for one frame.
///
/// Field-wise equality is what mis-prediction detection compares. `jump` is
/// carried and predicted like every other button but currently has no
/// kinematic effect in [`crate::sim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub guard: bool,
}

impl Buttons {
    /// No buttons held. Also the fallback prediction when nothing is known
    /// about the remote player yet.
    pub const NONE: Buttons = Buttons {
        left: false,
        right: false,
        jump: false,
        attack: false,
        guard: false,
    };
}

/// One player's input for one specific frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// The frame this input applies to
    pub frame: u64,
    /// The player who produced (or is guessed to have produced) it
    pub player: PlayerId,
    /// The button state
    pub buttons: Buttons,
}

impl PlayerInput {
    /// Create a new input record
    pub fn new(frame: u64, player: PlayerId, buttons: Buttons) -> Self {
        Self {
            frame,
            player,
            buttons,
        }
    }
}

/// An input record tagged by provenance.
///
/// `Confirmed` came from the owning player (locally sampled or received over
/// the wire); `Predicted` was synthesized by the prediction policy. The
/// overwrite rule the netcode layer enforces: a confirmation may replace a
/// prediction, a prediction may never replace a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameInput {
    /// Authoritative input from the player
    Confirmed(PlayerInput),
    /// Locally synthesized guess, replaceable at any time
    Predicted(PlayerInput),
}

impl FrameInput {
    /// The underlying input record, whichever the provenance
    pub fn input(&self) -> &PlayerInput {
        match self {
            FrameInput::Confirmed(input) | FrameInput::Predicted(input) => input,
        }
    }

    /// The button state
    pub fn buttons(&self) -> Buttons {
        self.input().buttons
    }

    /// The frame this input applies to
    pub fn frame(&self) -> u64 {
        self.input().frame
    }

    /// Whether this is a prediction
    pub fn is_predicted(&self) -> bool {
        matches!(self, FrameInput::Predicted(_))
    }

    /// Whether this is a confirmed input
    pub fn is_confirmed(&self) -> bool {
        matches!(self, FrameInput::Confirmed(_))
    }
}
