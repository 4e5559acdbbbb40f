//! Room manager: the room table and the player → room index.

use std::collections::HashMap;

use bingo_protocol::{Number, PlayerId, RoomId};

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Manages all live rooms and tracks which player is in which room.
///
/// Rooms exist exactly as long as they have players: the first join to a
/// name spawns the room actor, and the last player leaving shuts it down
/// and drops the entry.
pub struct RoomManager {
    config: RoomConfig,

    /// Live rooms, keyed by name.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each player to the room they're in. A player is in at most
    /// one room.
    player_rooms: HashMap<PlayerId, RoomId>,
}

impl RoomManager {
    /// Creates an empty manager with the default room config.
    pub fn new() -> Self {
        Self::with_config(RoomConfig::default())
    }

    /// Creates an empty manager whose rooms use `config`.
    pub fn with_config(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
        }
    }

    /// Seats a player in `room_id`, creating the room if it doesn't exist.
    ///
    /// Room events for this player are delivered to `sender`.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if the player already joined a room.
    /// - [`RoomError::Unavailable`] if the room actor is gone.
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        name: impl Into<String>,
        room_id: RoomId,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, current.clone()));
        }

        let existing = self.rooms.get(&room_id).cloned();
        let created = existing.is_none();
        let handle = match existing {
            Some(handle) => handle,
            None => {
                let handle = spawn_room(room_id.clone(), &self.config);
                self.rooms.insert(room_id.clone(), handle.clone());
                tracing::info!(%room_id, "room created");
                handle
            }
        };

        if let Err(e) = handle.join(player_id, name.into(), sender).await {
            if created {
                self.destroy_room(&room_id).await;
            }
            return Err(e);
        }

        self.player_rooms.insert(player_id, room_id);
        Ok(())
    }

    /// Calls `number` in `room_id`.
    ///
    /// An unknown room is a silent no-op.
    pub async fn mark_number(
        &self,
        room_id: &RoomId,
        number: Number,
    ) -> Result<(), RoomError> {
        match self.rooms.get(room_id) {
            Some(handle) => handle.mark_number(number).await,
            None => {
                tracing::debug!(%room_id, number, "mark for unknown room, ignoring");
                Ok(())
            }
        }
    }

    /// Removes `player_id` from `room_id`, destroying the room if it is
    /// now empty.
    ///
    /// An unknown room is a silent no-op.
    ///
    /// # Errors
    /// - [`RoomError::NotInRoom`] if the room exists but the player isn't
    ///   in it.
    /// - [`RoomError::Unavailable`] if the room actor is gone.
    pub async fn disconnect(
        &mut self,
        room_id: &RoomId,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        let Some(handle) = self.rooms.get(room_id) else {
            tracing::debug!(%room_id, %player_id, "disconnect from unknown room, ignoring");
            return Ok(());
        };

        let remaining = handle.leave(player_id).await?;
        self.player_rooms.remove(&player_id);

        if remaining == 0 {
            self.destroy_room(room_id).await;
        }
        Ok(())
    }

    /// Removes a player from whatever room they are in. No-op if none.
    pub async fn leave(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        match self.player_rooms.get(&player_id).cloned() {
            Some(room_id) => self.disconnect(&room_id, player_id).await,
            None => Ok(()),
        }
    }

    /// Returns the room a player is in, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    /// Returns info about a room, or `None` if it doesn't exist.
    pub async fn get_room_info(
        &self,
        room_id: &RoomId,
    ) -> Result<Option<RoomInfo>, RoomError> {
        match self.rooms.get(room_id) {
            Some(handle) => handle.get_info().await.map(Some),
            None => Ok(None),
        }
    }

    /// Returns the number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all live room names.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    /// Shuts a room down and drops every index entry pointing at it.
    async fn destroy_room(&mut self, room_id: &RoomId) {
        if let Some(handle) = self.rooms.remove(room_id) {
            let _ = handle.shutdown().await;
            self.player_rooms.retain(|_, rid| rid != room_id);
            tracing::info!(%room_id, "room destroyed");
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}
