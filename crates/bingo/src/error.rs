//! Unified error type for the bingo server.

use bingo_protocol::ProtocolError;
use bingo_room::RoomError;
use bingo_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// `#[from]` on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BingoError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid card).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (already joined, actor unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}
