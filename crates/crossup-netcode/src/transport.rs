//! Transport seam for peer-to-peer input exchange
//!
//! The engine itself has no network surface: something outside it moves
//! [`Packet`]s between peers and feeds arriving inputs into
//! [`RollbackEngine::receive_remote_input`](crate::RollbackEngine::receive_remote_input).
//! This trait is that seam. Implement it for your chosen stack (WebRTC data
//! channel, UDP socket, in-process queue in tests) and pass the channel
//! object into your session layer explicitly — the engine never reaches for
//! global state.
//!
//! No delivery guarantee is assumed: packets may arrive late, duplicated,
//! or out of order, and the engine is built to absorb all three.

use crossup_core::PlayerInput;
use serde::{Deserialize, Serialize};

/// A message exchanged between two peers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Packet {
    /// A confirmed input for one frame
    Input(PlayerInput),
    /// A state digest for one frame, for cross-client desync detection.
    /// Comparing digests and forcing a resync on mismatch is session-layer
    /// policy; the engine only produces the digest.
    Checksum { frame: u64, digest: String },
}

/// A bidirectional, non-blocking packet channel to the remote peer.
pub trait InputChannel {
    /// Error type for this channel
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a packet to the peer (best effort)
    fn send(&self, packet: &Packet) -> Result<(), Self::Error>;

    /// Receive the next pending packet, if any.
    ///
    /// Returns `Ok(None)` when nothing has arrived; never blocks.
    fn poll(&self) -> Result<Option<Packet>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RollbackEngine;
    use crossup_core::{sim::TIMESTEP, Buttons, CharacterState, Fixed, GameState, PlayerId};
    use crossup_history::SnapshotStore;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::convert::Infallible;

    /// In-process channel: a pair of shared queues.
    struct LoopbackChannel {
        outgoing: RefCell<VecDeque<Packet>>,
        incoming: RefCell<VecDeque<Packet>>,
    }

    impl LoopbackChannel {
        fn new() -> Self {
            Self {
                outgoing: RefCell::new(VecDeque::new()),
                incoming: RefCell::new(VecDeque::new()),
            }
        }

        fn deliver(&self, packet: Packet) {
            self.incoming.borrow_mut().push_back(packet);
        }

        fn sent(&self) -> Vec<Packet> {
            self.outgoing.borrow().iter().cloned().collect()
        }
    }

    impl InputChannel for LoopbackChannel {
        type Error = Infallible;

        fn send(&self, packet: &Packet) -> Result<(), Self::Error> {
            self.outgoing.borrow_mut().push_back(packet.clone());
            Ok(())
        }

        fn poll(&self) -> Result<Option<Packet>, Self::Error> {
            Ok(self.incoming.borrow_mut().pop_front())
        }
    }

    fn engine() -> RollbackEngine<SnapshotStore> {
        let p1 = PlayerId::new("p1");
        let p2 = PlayerId::new("p2");
        let initial = GameState::new(
            CharacterState::spawn(p1.clone(), Fixed::from_int(-5)),
            CharacterState::spawn(p2.clone(), Fixed::from_int(5)),
            12345,
        );
        RollbackEngine::new(initial, TIMESTEP, p1, p2, SnapshotStore::new())
    }

    #[test]
    fn test_packet_serde_round_trip() {
        let input = Packet::Input(crossup_core::PlayerInput::new(
            12,
            PlayerId::new("p2"),
            Buttons {
                jump: true,
                ..Buttons::NONE
            },
        ));
        let digest = Packet::Checksum {
            frame: 12,
            digest: "ab".repeat(32),
        };

        for packet in [input, digest] {
            let bytes = bincode::serialize(&packet).unwrap();
            let restored: Packet = bincode::deserialize(&bytes).unwrap();
            assert_eq!(restored, packet);
        }
    }

    #[test]
    fn test_channel_feeds_engine() {
        let mut e = engine();
        let channel = LoopbackChannel::new();

        // A session loop: tick, publish our input, drain whatever arrived.
        for frame in 1..=8u64 {
            e.update(Buttons::NONE);
            channel
                .send(&Packet::Input(PlayerInput::new(
                    frame,
                    PlayerId::new("p1"),
                    Buttons::NONE,
                )))
                .unwrap();

            // The peer's inputs show up two frames late.
            if frame >= 3 {
                channel.deliver(Packet::Input(PlayerInput::new(
                    frame - 2,
                    PlayerId::new("p2"),
                    Buttons::NONE,
                )));
            }

            while let Some(packet) = channel.poll().unwrap() {
                match packet {
                    Packet::Input(input) => e.receive_remote_input(input).unwrap(),
                    Packet::Checksum { .. } => {}
                }
            }
        }

        assert_eq!(e.current_frame(), 8);
        assert_eq!(e.sync_frame(), 8);
        assert_eq!(channel.sent().len(), 8);
    }
}
