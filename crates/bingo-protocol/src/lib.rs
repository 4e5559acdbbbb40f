//! Wire protocol for Bingo Hall.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Card`], etc.):
//!   the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those events
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while encoding,
//!   decoding, or building a card.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the room
//! layer (game state). It doesn't know about connections or rooms; it
//! only knows the shape of the events.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEvent / ServerEvent) → Room (BingoRoom)
//! ```

mod card;
mod codec;
mod error;
mod types;

pub use card::{CARD_CELLS, CARD_SIZE, Card, Grid, Number};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, PlayerId, PlayerState, PlayerView, Recipient, RoomId,
    RoomSnapshot, RoomUpdate, ServerEvent,
};
