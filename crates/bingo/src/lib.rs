//! # Bingo Hall
//!
//! Real-time multiplayer bingo server.
//!
//! Clients connect over WebSocket, join a named room, and get a random
//! 5x5 card. Any player can call a number; it is marked for the whole
//! room and everyone receives every card's state plus the winner, if a
//! player just completed exactly five lines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bingo::prelude::*;
//!
//! # async fn run() -> Result<(), BingoError> {
//! let server = BingoServer::builder()
//!     .bind("0.0.0.0:4000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{
    BIND_ADDR_ENV, IDLE_TIMEOUT_ENV, OUTBOUND_BUFFER_ENV, ROOM_CHANNEL_SIZE_ENV,
    ServerConfig,
};
pub use error::BingoError;
pub use server::{BingoServer, BingoServerBuilder};

/// Everything needed to run a server or talk to one in tests.
pub mod prelude {
    pub use crate::{BingoError, BingoServer, BingoServerBuilder, ServerConfig};
    pub use bingo_protocol::{
        Card, ClientEvent, Codec, JsonCodec, Number, PlayerId, PlayerState,
        PlayerView, RoomId, RoomSnapshot, RoomUpdate, ServerEvent,
    };
    pub use bingo_room::RoomConfig;
}
