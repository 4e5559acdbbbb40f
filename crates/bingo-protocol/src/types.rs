//! Core protocol types for the Bingo Hall wire format.
//!
//! Every event is adjacently tagged: `{"event": "<name>", "data": <payload>}`.
//! Event names and payload fields are camelCase because the clients are
//! browser apps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Card, Number};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// Assigned by the server when a connection is accepted, so two players
/// who pick the same display name are still told apart. Serialized as a
/// plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// The name of a room, chosen by whoever joins it first.
///
/// Newtype over `String` so a room name can't be confused with a player
/// name. Serialized as a plain string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Creates a room id from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// ---------------------------------------------------------------------------
// Recipient: who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who in a room should receive a server event.
///
/// Room logic returns `(Recipient, ServerEvent)` pairs; the room actor
/// resolves each recipient against the current member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,

    /// One specific player.
    Player(PlayerId),

    /// Everyone except the specified player.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// Disconnects are not an event: the server infers them from the socket
/// closing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// `{"event":"joinRoom","data":{"name":"Alice","room":"R1"}}`
    JoinRoom { name: String, room: RoomId },

    /// `{"event":"markNumber","data":{"number":7}}`
    ///
    /// Applies to the room this connection joined.
    MarkNumber { number: Number },
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A player as shown in the join-time `roomUpdate` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub card: Card,
    pub marked: Vec<Number>,
}

/// A player's entry in an `updateRoomState` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub card: Card,
    pub marked: Vec<Number>,
    /// Completed lines (rows, columns, diagonals), `0..=12`.
    pub bingos: usize,
}

/// Payload of `roomUpdate`.
///
/// The event is sent with full player views when someone joins and with
/// bare names when someone leaves, so the payload is untagged: clients
/// tell the two apart by element type.
///
/// An empty list carries no element type and decodes as `Players`, the
/// variant listed first. The server never sends one: a join always has
/// the joiner in it, and a leave that empties the room has nobody left
/// to tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomUpdate {
    Players(Vec<PlayerView>),
    Names(Vec<String>),
}

/// Payload of `updateRoomState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_state: Vec<PlayerState>,
    /// Name of the winning player, `null` if nobody won on this call.
    pub winner: Option<String>,
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Someone else joined the room. Carries their display name.
    UserJoined(String),

    /// The room's member list changed.
    RoomUpdate(RoomUpdate),

    /// Your card. Sent only to the player who just joined.
    BingoCard(Card),

    /// Every player's card, marks and line count after a number was called.
    UpdateRoomState(RoomSnapshot),

    /// A player reached the winning line count.
    GameOver { winner: String },

    /// The server could not process something this connection sent.
    /// `code` follows HTTP conventions (400 = bad request).
    Error { code: u16, message: String },
}
