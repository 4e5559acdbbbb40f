//! Room lifecycle and game rules for Bingo Hall.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! player list and dispatches events to its members.
//!
//! # Key types
//!
//! - [`BingoRoom`]: the synchronous game state; every operation returns
//!   the events it produces instead of sending them
//! - [`RoomManager`]: creates rooms on first join, destroys them when empty
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`generate_card`] / [`count_lines`]: card dealing and win detection
//! - [`RoomConfig`]: per-room settings

mod bingo;
mod card;
mod config;
mod error;
mod game;
mod manager;
mod room;

pub use bingo::{LINE_COUNT, count_lines, is_winning_count};
pub use card::generate_card;
pub use config::{RoomConfig, TurnStatus};
pub use error::RoomError;
pub use game::{BingoRoom, Player};
pub use manager::RoomManager;
pub use room::{PlayerSender, RoomHandle, RoomInfo};
