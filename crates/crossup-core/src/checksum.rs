//! Canonical state serialization and checksums
//!
//! Cross-client desync detection works by comparing digests of the full game
//! state after each frame. The encoding here is owned by this crate and
//! versioned: an explicit little-endian walk of every field, so the digest
//! can never change out from under us because some serialization library
//! reordered or re-tagged fields.

use crate::state::{CharacterState, GameState, Rect};
use crate::Fixed;
use sha2::{Digest, Sha256};

/// Bump on any change to the byte layout below.
const FORMAT_VERSION: u8 = 1;

/// Encode the complete game state into its canonical byte form.
///
/// Fixed-point values are written as their raw `i32`, little-endian; the
/// float projection never appears anywhere in the encoding.
pub fn canonical_bytes(state: &GameState) -> Vec<u8> {
    let mut buf = Vec::with_capacity(160);
    buf.push(FORMAT_VERSION);
    buf.extend_from_slice(&state.frame.to_le_bytes());
    encode_character(&mut buf, &state.player1);
    encode_character(&mut buf, &state.player2);
    buf.extend_from_slice(&state.random_seed.to_le_bytes());
    buf
}

/// SHA-256 digest of the canonical bytes, as lowercase hex.
///
/// Two engines fed identical input streams from identical initial state
/// produce identical strings after every frame, on every platform.
pub fn state_checksum(state: &GameState) -> String {
    hex::encode(Sha256::digest(canonical_bytes(state)))
}

fn encode_character(buf: &mut Vec<u8>, ch: &CharacterState) {
    let id = ch.id.as_str().as_bytes();
    buf.extend_from_slice(&(id.len() as u32).to_le_bytes());
    buf.extend_from_slice(id);

    encode_fixed(buf, ch.position.x);
    encode_fixed(buf, ch.position.y);
    encode_fixed(buf, ch.velocity.x);
    encode_fixed(buf, ch.velocity.y);
    encode_fixed(buf, ch.health);
    buf.push(ch.is_grounded as u8);
    buf.push(ch.action.code());
    buf.extend_from_slice(&ch.action_frame.to_le_bytes());

    match &ch.hitbox {
        Some(rect) => {
            buf.push(1);
            encode_rect(buf, rect);
        }
        None => buf.push(0),
    }
    encode_rect(buf, &ch.hurtbox);
}

fn encode_rect(buf: &mut Vec<u8>, rect: &Rect) {
    encode_fixed(buf, rect.x);
    encode_fixed(buf, rect.y);
    encode_fixed(buf, rect.width);
    encode_fixed(buf, rect.height);
}

fn encode_fixed(buf: &mut Vec<u8>, value: Fixed) {
    buf.extend_from_slice(&value.raw().to_le_bytes());
}
