//! Deterministic game state
//!
//! Everything the simulation reads or writes lives here, and all of it is
//! plain data: `Clone` is the deep copy the snapshot store relies on, and it
//! preserves every [`Fixed`] raw value bit-for-bit.

use crate::input::PlayerId;
use crate::Fixed;
use serde::{Deserialize, Serialize};

/// A 2D vector in fixed-point space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: Fixed,
    pub y: Fixed,
}

impl Vec2 {
    /// The zero vector
    pub const ZERO: Vec2 = Vec2 {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Create a new vector
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box, as an offset from a character's position plus an
/// extent. The box's top edge is at `y` and it extends `height` downward
/// (the world is y-up with the ground at y = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Fixed,
    pub y: Fixed,
    pub width: Fixed,
    pub height: Fixed,
}

impl Rect {
    /// Create a new box
    pub const fn new(x: Fixed, y: Fixed, width: Fixed, height: Fixed) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A character's action state machine.
///
/// New actions are only enterable from `Idle` or `Moving`; `Attacking`,
/// `Guarding` and `Hitstun` run to completion and ignore raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Moving,
    Attacking,
    Guarding,
    Hitstun,
}

impl Action {
    /// Stable discriminant for canonical encoding. Never reorder these.
    pub fn code(self) -> u8 {
        match self {
            Action::Idle => 0,
            Action::Moving => 1,
            Action::Attacking => 2,
            Action::Guarding => 3,
            Action::Hitstun => 4,
        }
    }
}

/// Spawn-time hurtbox: half a unit left of the character, one unit square.
const SPAWN_HURTBOX: Rect = Rect::new(
    Fixed::from_raw(-32768), // -0.5
    Fixed::ZERO,
    Fixed::ONE,
    Fixed::ONE,
);

const SPAWN_HEALTH: Fixed = Fixed::from_int(100);

/// The deterministic state of a single character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterState {
    /// The player controlling this character
    pub id: PlayerId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: Fixed,
    pub is_grounded: bool,
    /// Current action state
    pub action: Action,
    /// Frames since the last action transition; resets to 0 on every change
    pub action_frame: u32,
    /// Present only while an attack's active window is open
    pub hitbox: Option<Rect>,
    /// Always present, fixed relative to the character's position
    pub hurtbox: Rect,
}

impl CharacterState {
    /// A freshly spawned character at the given horizontal position:
    /// grounded, idle, full health.
    pub fn spawn(id: PlayerId, x: Fixed) -> Self {
        Self {
            id,
            position: Vec2::new(x, Fixed::ZERO),
            velocity: Vec2::ZERO,
            health: SPAWN_HEALTH,
            is_grounded: true,
            action: Action::Idle,
            action_frame: 0,
            hitbox: None,
            hurtbox: SPAWN_HURTBOX,
        }
    }
}

/// The complete deterministic state of a match at one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Increments by exactly one per simulation step, never skipped
    pub frame: u64,
    pub player1: CharacterState,
    pub player2: CharacterState,
    /// Evolves by a fixed LCG once per simulated frame; the only seed for
    /// in-simulation randomness
    pub random_seed: u32,
}

impl GameState {
    /// Create a frame-zero state from two spawned characters
    pub fn new(player1: CharacterState, player2: CharacterState, seed: u32) -> Self {
        Self {
            frame: 0,
            player1,
            player2,
            random_seed: seed,
        }
    }

    /// Look up a character by player ID
    pub fn character(&self, id: &PlayerId) -> Option<&CharacterState> {
        if self.player1.id == *id {
            Some(&self.player1)
        } else if self.player2.id == *id {
            Some(&self.player2)
        } else {
            None
        }
    }

    /// Look up a character mutably by player ID
    pub fn character_mut(&mut self, id: &PlayerId) -> Option<&mut CharacterState> {
        if self.player1.id == *id {
            Some(&mut self.player1)
        } else if self.player2.id == *id {
            Some(&mut self.player2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameState {
        GameState::new(
            CharacterState::spawn(PlayerId::new("p1"), Fixed::from_int(-5)),
            CharacterState::spawn(PlayerId::new("p2"), Fixed::from_int(5)),
            12345,
        )
    }

    #[test]
    fn test_spawn_defaults() {
        let ch = CharacterState::spawn(PlayerId::new("p1"), Fixed::from_int(-5));
        assert_eq!(ch.position.x, Fixed::from_int(-5));
        assert_eq!(ch.position.y, Fixed::ZERO);
        assert_eq!(ch.velocity, Vec2::ZERO);
        assert_eq!(ch.health, Fixed::from_int(100));
        assert!(ch.is_grounded);
        assert_eq!(ch.action, Action::Idle);
        assert_eq!(ch.action_frame, 0);
        assert!(ch.hitbox.is_none());
    }

    #[test]
    fn test_character_lookup() {
        let mut state = sample();
        assert!(state.character(&PlayerId::new("p1")).is_some());
        assert!(state.character(&PlayerId::new("p3")).is_none());

        let p2 = PlayerId::new("p2");
        state.character_mut(&p2).unwrap().health = Fixed::from_int(90);
        assert_eq!(state.player2.health, Fixed::from_int(90));
    }

    #[test]
    fn test_clone_is_exact_deep_copy() {
        let mut state = sample();
        state.player1.velocity.x = Fixed::from_raw(12_345);
        let copy = state.clone();
        assert_eq!(copy, state);
        assert_eq!(
            copy.player1.velocity.x.raw(),
            state.player1.velocity.x.raw()
        );
    }

    #[test]
    fn test_serde_round_trip_exact() {
        let mut state = sample();
        state.player2.position.y = Fixed::from_raw(-1);
        let bytes = bincode::serialize(&state).unwrap();
        let restored: GameState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.player2.position.y.raw(), -1);
    }
}
