//! Room actor: an isolated Tokio task that owns one [`BingoRoom`].
//!
//! Each room runs in its own task and is reached only through an mpsc
//! channel, so two events for the same room are always applied one after
//! the other. No locks around game state.

use std::collections::HashMap;

use bingo_protocol::{Number, PlayerId, Recipient, RoomId, ServerEvent};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::game::Outbound;
use crate::{BingoRoom, RoomConfig, RoomError};

/// Channel sender for delivering events to one player's connection.
///
/// Bounded by [`RoomConfig::outbound_buffer`]. The room never waits on
/// it: a player whose queue is full is dropped from delivery, which
/// closes their receiver once it drains.
pub type PlayerSender = mpsc::Sender<ServerEvent>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the answer on it.
pub(crate) enum RoomCommand {
    /// Seat a player and start delivering room events to `sender`.
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a player. Replies with how many players remain.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },

    /// Call a number for the whole room.
    MarkNumber { number: Number },

    /// Request a snapshot of room metadata.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub player_count: usize,
}

/// Handle to a running room actor.
///
/// Cheap to clone, it wraps an `mpsc::Sender`. The
/// [`RoomManager`](crate::RoomManager) holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }

    /// Seats a player in the room.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a player and returns the number of players left.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Calls a number (fire-and-forget).
    pub async fn mark_number(&self, number: Number) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::MarkNumber { number })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    game: BingoRoom,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        let room_id = self.game.room_id().clone();
        tracing::info!(%room_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    name,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, name, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::MarkNumber { number } => {
                    let msgs = self.game.mark_number(number);
                    tracing::debug!(%room_id, number, "number called");
                    self.dispatch(msgs);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(%room_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(%room_id, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let msgs = self.game.join(player_id, name)?;
        self.senders.insert(player_id, sender);

        tracing::info!(
            room_id = %self.game.room_id(),
            %player_id,
            players = self.game.player_count(),
            "player joined"
        );

        self.dispatch(msgs);
        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<usize, RoomError> {
        let msgs = self.game.leave(player_id)?;
        self.senders.remove(&player_id);

        tracing::info!(
            room_id = %self.game.room_id(),
            %player_id,
            players = self.game.player_count(),
            "player left"
        );

        self.dispatch(msgs);
        Ok(self.game.player_count())
    }

    /// Dispatches outbound events to the correct recipients.
    fn dispatch(&mut self, msgs: Outbound) {
        let mut dropped = Vec::new();

        for (recipient, event) in msgs {
            for (pid, sender) in &self.senders {
                let wanted = match &recipient {
                    Recipient::All => true,
                    Recipient::Player(target) => pid == target,
                    Recipient::AllExcept(excluded) => pid != excluded,
                };
                if !wanted || dropped.contains(pid) {
                    continue;
                }
                match sender.try_send(event.clone()) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(
                            room_id = %self.game.room_id(),
                            player_id = %pid,
                            "outbound queue full, dropping player"
                        );
                        dropped.push(*pid);
                    }
                    // Receiver gone; the disconnect is on its way.
                    Err(TrySendError::Closed(_)) => {}
                }
            }
        }

        for pid in dropped {
            self.senders.remove(&pid);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.game.room_id().clone(),
            player_count: self.game.player_count(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
pub(crate) fn spawn_room(room_id: RoomId, config: &RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size);

    let actor = RoomActor {
        game: BingoRoom::new(room_id.clone(), config),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
