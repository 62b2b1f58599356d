//! Deterministic simulation step
//!
//! [`simulate_frame`] is the whole determinism surface: same state plus same
//! inputs always yields a bit-identical successor state. It is a free
//! function over plain data, independent of any engine object, so the
//! netcode layer can re-run it during rollback and tests can drive it
//! without a full engine.
//!
//! Per frame, in order: each character advances with its own input, a single
//! collision pass resolves hit/hurt-box overlap, and the random seed steps
//! once unconditionally.

use crate::input::Buttons;
use crate::rng::next_seed;
use crate::state::{Action, CharacterState, GameState, Rect, Vec2};
use crate::Fixed;

/// Fixed timestep for 60 Hz simulation
pub const TIMESTEP: Fixed = Fixed::from_raw(1092); // 1/60

/// Horizontal acceleration while a direction is held
pub const MOVE_SPEED: Fixed = Fixed::from_raw(131072); // 2.0

/// Per-frame downward acceleration
pub const GRAVITY: Fixed = Fixed::from_raw(6554); // 0.1

/// Multiplicative horizontal friction while no direction is held
pub const FRICTION: Fixed = Fixed::from_raw(58982); // 0.9

/// Horizontal speeds below this snap to exact zero
pub const REST_EPSILON: Fixed = Fixed::from_raw(6554); // 0.1

/// The ground plane
pub const GROUND_LEVEL: Fixed = Fixed::ZERO;

/// Health lost to a connecting hit
pub const HIT_DAMAGE: Fixed = Fixed::from_int(10);

/// First `action_frame` on which an attack's hitbox is active (inclusive)
pub const ATTACK_ACTIVE_START: u32 = 2;

/// Last `action_frame` on which an attack's hitbox is active (inclusive)
pub const ATTACK_ACTIVE_END: u32 = 4;

/// An attack returns to idle once `action_frame` exceeds this
pub const ATTACK_RECOVERY_END: u32 = 5;

/// Hitstun returns to idle once `action_frame` exceeds this
pub const HITSTUN_END: u32 = 7;

/// The attack hitbox, relative to the attacker's position
pub const ATTACK_HITBOX: Rect = Rect::new(
    Fixed::from_raw(39322), // 0.6
    Fixed::from_raw(32768), // 0.5
    Fixed::from_raw(52429), // 0.8
    Fixed::from_raw(19661), // 0.3
);

/// The input set for one frame of [`simulate_frame`].
///
/// `None` means that player's input is unknown and unpredicted for the
/// frame: the character holds position, velocity and action unchanged.
/// Degraded behavior by contract, not an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimInputs {
    pub player1: Option<Buttons>,
    pub player2: Option<Buttons>,
}

/// Advance the game state by exactly one frame.
pub fn simulate_frame(state: &mut GameState, inputs: &SimInputs, dt: Fixed) {
    state.frame += 1;

    simulate_character(&mut state.player1, inputs.player1, dt);
    simulate_character(&mut state.player2, inputs.player2, dt);

    handle_collisions(state);

    // Unconditional: the seed must not depend on what happened this frame.
    state.random_seed = next_seed(state.random_seed);
}

fn enter(ch: &mut CharacterState, action: Action) {
    ch.action = action;
    ch.action_frame = 0;
}

/// Advance one character by one frame using its own input.
pub fn simulate_character(ch: &mut CharacterState, input: Option<Buttons>, dt: Fixed) {
    let Some(buttons) = input else {
        // No input for this frame: the character does not advance at all.
        return;
    };

    // Action selection. Committed actions run to completion; raw input is
    // only honored from idle or moving.
    let mut next = ch.action;
    if matches!(ch.action, Action::Idle | Action::Moving) {
        next = if buttons.attack {
            Action::Attacking
        } else if buttons.guard {
            Action::Guarding
        } else if buttons.left || buttons.right {
            Action::Moving
        } else {
            Action::Idle
        };
    }

    if next != ch.action {
        enter(ch, next);
    } else {
        ch.action_frame += 1;
    }

    ch.hitbox = None;

    match ch.action {
        Action::Attacking => {
            if (ATTACK_ACTIVE_START..=ATTACK_ACTIVE_END).contains(&ch.action_frame) {
                ch.hitbox = Some(ATTACK_HITBOX);
            }
            if ch.action_frame > ATTACK_RECOVERY_END {
                enter(ch, Action::Idle);
            }
        }
        Action::Hitstun => {
            if ch.action_frame > HITSTUN_END {
                enter(ch, Action::Idle);
            }
        }
        Action::Guarding => {
            ch.velocity.x = Fixed::ZERO;
        }
        Action::Moving | Action::Idle => {
            if buttons.left {
                ch.velocity.x = ch.velocity.x - MOVE_SPEED.mul(dt);
            } else if buttons.right {
                ch.velocity.x = ch.velocity.x + MOVE_SPEED.mul(dt);
            } else {
                ch.velocity.x = ch.velocity.x.mul(FRICTION);
                if ch.velocity.x.abs() < REST_EPSILON {
                    ch.velocity.x = Fixed::ZERO;
                }
            }
        }
    }

    // Gravity applies in every action state.
    ch.velocity.y = ch.velocity.y - GRAVITY.mul(dt);

    ch.position.x = ch.position.x + ch.velocity.x.mul(dt);
    ch.position.y = ch.position.y + ch.velocity.y.mul(dt);

    if ch.position.y < GROUND_LEVEL {
        ch.position.y = GROUND_LEVEL;
        ch.velocity.y = Fixed::ZERO;
        ch.is_grounded = true;
    }
}

/// Resolve hit/hurt-box overlap for the frame, once, after both characters
/// have moved.
///
/// Both ordered (attacker, defender) pairs are evaluated against the state
/// as it stands at the start of the pass, then both results are applied:
/// mutual hits in one frame both land.
pub fn handle_collisions(state: &mut GameState) {
    let p1_connects = hitbox_meets_hurtbox(&state.player1, &state.player2);
    let p2_connects = hitbox_meets_hurtbox(&state.player2, &state.player1);

    if p1_connects {
        apply_hit(&mut state.player2);
    }
    if p2_connects {
        apply_hit(&mut state.player1);
    }
}

fn hitbox_meets_hurtbox(attacker: &CharacterState, defender: &CharacterState) -> bool {
    let Some(hitbox) = &attacker.hitbox else {
        return false;
    };
    boxes_overlap(
        attacker.position,
        hitbox,
        defender.position,
        &defender.hurtbox,
    )
}

fn apply_hit(defender: &mut CharacterState) {
    // Guard blocks the transition and the damage entirely.
    if defender.action == Action::Guarding {
        return;
    }
    enter(defender, Action::Hitstun);
    defender.health = defender.health - HIT_DAMAGE;
}

/// Strict AABB overlap of two boxes placed at their owners' positions.
fn boxes_overlap(a_pos: Vec2, a: &Rect, b_pos: Vec2, b: &Rect) -> bool {
    let a_left = a_pos.x + a.x;
    let a_right = a_left + a.width;
    let a_top = a_pos.y + a.y;
    let a_bottom = a_top - a.height;

    let b_left = b_pos.x + b.x;
    let b_right = b_left + b.width;
    let b_top = b_pos.y + b.y;
    let b_bottom = b_top - b.height;

    a_left < b_right && a_right > b_left && a_bottom < b_top && a_top > b_bottom
}
