//! Per-connection handler: event decoding and routing into rooms.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The loop waits on three things at once:
//!   1. Room events queued for this player → encode and send
//!   2. Frames from the client → decode `joinRoom` / `markNumber`
//!   3. The idle deadline, when one is configured

use std::sync::Arc;

use bingo_protocol::{ClientEvent, Codec, PlayerId, RoomId, ServerEvent};
use bingo_room::PlayerSender;
use bingo_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::BingoError;
use crate::server::ServerState;

/// Drop guard that takes the player out of their room when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the removal runs in a spawned task.
struct MembershipGuard<C: Codec> {
    player_id: PlayerId,
    room: Option<RoomId>,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for MembershipGuard<C> {
    fn drop(&mut self) {
        let Some(room_id) = self.room.take() else {
            return;
        };
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut rooms = state.rooms.lock().await;
            if let Err(e) = rooms.disconnect(&room_id, player_id).await {
                tracing::debug!(%player_id, %room_id, error = %e, "disconnect failed");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), BingoError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, %player_id, "handling new connection");

    // The room gets the only sender on join, so the receiver closes if
    // the room stops delivering to this player.
    let (outbound_tx, mut outbound_rx) =
        mpsc::channel(state.outbound_buffer.max(1));
    let mut outbound = Some(outbound_tx);
    let mut guard = MembershipGuard {
        player_id,
        room: None,
        state: Arc::clone(&state),
    };

    let idle = state.idle_timeout;
    let mut deadline = idle.map(|d| Instant::now() + d);

    loop {
        tokio::select! {
            event = outbound_rx.recv() => {
                let Some(event) = event else {
                    tracing::info!(%player_id, "room stopped delivering, closing");
                    let _ = conn.close().await;
                    break;
                };
                send_event(&conn, &state.codec, &event).await?;
            }
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };
                deadline = idle.map(|d| Instant::now() + d);
                handle_frame(&conn, &state, &mut guard, &mut outbound, &data)
                    .await?;
            }
            () = idle_expired(deadline) => {
                tracing::info!(%player_id, "connection timed out");
                let _ = conn.close().await;
                break;
            }
        }
    }

    // guard drops here → room disconnect fires.
    Ok(())
}

/// Decodes one client frame and applies it.
async fn handle_frame<C: Codec>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<C>>,
    guard: &mut MembershipGuard<C>,
    outbound: &mut Option<PlayerSender>,
    data: &[u8],
) -> Result<(), BingoError> {
    let player_id = guard.player_id;

    let event: ClientEvent = match state.codec.decode(data) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "failed to decode event");
            let error = ServerEvent::Error {
                code: 400,
                message: format!("invalid event: {e}"),
            };
            return send_event(conn, &state.codec, &error).await;
        }
    };

    match event {
        ClientEvent::JoinRoom { name, room } => {
            if let Some(current) = &guard.room {
                tracing::debug!(
                    %player_id, %current, requested = %room,
                    "already in a room, ignoring join"
                );
                return Ok(());
            }

            let Some(sender) = outbound.take() else {
                return Ok(());
            };
            let mut rooms = state.rooms.lock().await;
            let joined =
                rooms.join(player_id, name, room.clone(), sender).await;
            match joined {
                Ok(()) => guard.room = Some(room),
                Err(e) => {
                    tracing::debug!(%player_id, error = %e, "join failed");
                }
            }
        }
        ClientEvent::MarkNumber { number } => {
            let Some(room) = &guard.room else {
                tracing::debug!(%player_id, number, "mark before join, ignoring");
                return Ok(());
            };

            let rooms = state.rooms.lock().await;
            if let Err(e) = rooms.mark_number(room, number).await {
                tracing::debug!(%player_id, error = %e, "mark failed");
            }
        }
    }

    Ok(())
}

async fn send_event<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    event: &ServerEvent,
) -> Result<(), BingoError> {
    let bytes = codec.encode(event)?;
    conn.send(&bytes).await?;
    Ok(())
}

/// Resolves at `deadline`, or never when there is none.
async fn idle_expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
