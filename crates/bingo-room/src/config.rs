//! Room configuration and the per-player turn state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a [`RoomManager`](crate::RoomManager)
/// creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Line count a player must hit *exactly* to win. A player who jumps
    /// past it in one call (4 → 6) does not win.
    pub winning_lines: usize,

    /// Capacity of each room actor's command channel. When full, callers
    /// wait (backpressure).
    pub channel_size: usize,

    /// Events queued per player before the room gives up on them. A
    /// player whose queue is full is dropped from delivery and their
    /// connection is closed.
    pub outbound_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            winning_lines: 5,
            channel_size: 64,
            outbound_buffer: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// TurnStatus
// ---------------------------------------------------------------------------

/// Whether a player has taken their turn.
///
/// ```text
/// Waiting → Taken
/// ```
///
/// Every player starts in `Waiting`. Bingo calls are shared by the whole
/// room, so no built-in operation advances this; it is kept on each
/// [`Player`](crate::Player) for turn-based variants to drive through
/// [`TurnStatus::next`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum TurnStatus {
    #[default]
    Waiting,
    Taken,
}

impl TurnStatus {
    /// Returns the next state, or `None` from the terminal state.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Taken),
            Self::Taken => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl std::fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Taken => write!(f, "Taken"),
        }
    }
}
