//! Error types for the room layer.
//!
//! Game events themselves never fail: marking a number in a room that
//! doesn't exist, or disconnecting from one, is a silent no-op. These
//! errors cover the plumbing around the room actors.

use bingo_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The connection already joined a room and tried to join again.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player is not in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
