//! Integration tests for the room system: manager, actors and delivery.

use std::time::Duration;

use bingo_protocol::{PlayerId, RoomId, RoomUpdate, ServerEvent};
use bingo_room::{PlayerSender, RoomError, RoomManager};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

type Inbox = mpsc::Receiver<ServerEvent>;

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn room(name: &str) -> RoomId {
    RoomId::new(name)
}

fn channel() -> (PlayerSender, Inbox) {
    mpsc::channel(64)
}

/// Waits for the next event, failing the test after a second.
async fn next(inbox: &mut Inbox) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(1), inbox.recv())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed")
}

/// Asserts nothing else arrives for a short while.
async fn assert_quiet(inbox: &mut Inbox) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    if let Ok(event) = inbox.try_recv() {
        panic!("unexpected event: {event:?}");
    }
}

/// Joins and drains the joiner's own roomUpdate + bingoCard.
async fn join(
    mgr: &mut RoomManager,
    id: u64,
    name: &str,
    room_name: &str,
) -> Inbox {
    let (tx, mut rx) = channel();
    mgr.join(pid(id), name, room(room_name), tx).await.unwrap();
    assert!(matches!(next(&mut rx).await, ServerEvent::RoomUpdate(_)));
    assert!(matches!(next(&mut rx).await, ServerEvent::BingoCard(_)));
    rx
}

// =========================================================================
// Join
// =========================================================================

#[tokio::test]
async fn test_first_join_creates_room() {
    let mut mgr = RoomManager::new();
    let (tx, mut rx) = channel();

    mgr.join(pid(1), "Alice", room("R1"), tx).await.unwrap();
    assert_eq!(mgr.room_count(), 1);
    assert_eq!(mgr.player_room(&pid(1)), Some(&room("R1")));

    match next(&mut rx).await {
        ServerEvent::RoomUpdate(RoomUpdate::Players(players)) => {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].name, "Alice");
            assert_eq!(players[0].id, pid(1));
            assert!(players[0].marked.is_empty());
        }
        other => panic!("expected roomUpdate, got {other:?}"),
    }

    match next(&mut rx).await {
        ServerEvent::BingoCard(card) => {
            let mut numbers: Vec<u8> = card.numbers().collect();
            numbers.sort_unstable();
            assert_eq!(numbers, (1..=25).collect::<Vec<u8>>());
        }
        other => panic!("expected bingoCard, got {other:?}"),
    }

    // The joiner is not told about their own arrival.
    assert_quiet(&mut rx).await;
}

#[tokio::test]
async fn test_second_join_notifies_existing_players() {
    let mut mgr = RoomManager::new();
    let mut alice = join(&mut mgr, 1, "Alice", "R1").await;

    let (tx, mut bob) = channel();
    mgr.join(pid(2), "Bob", room("R1"), tx).await.unwrap();
    assert_eq!(mgr.room_count(), 1);

    assert_eq!(next(&mut alice).await, ServerEvent::UserJoined("Bob".into()));
    match next(&mut alice).await {
        ServerEvent::RoomUpdate(RoomUpdate::Players(players)) => {
            let names: Vec<&str> =
                players.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, ["Alice", "Bob"]);
        }
        other => panic!("expected roomUpdate, got {other:?}"),
    }
    assert_quiet(&mut alice).await;

    assert!(matches!(next(&mut bob).await, ServerEvent::RoomUpdate(_)));
    assert!(matches!(next(&mut bob).await, ServerEvent::BingoCard(_)));
    assert_quiet(&mut bob).await;
}

#[tokio::test]
async fn test_join_twice_from_same_player_is_rejected() {
    let mut mgr = RoomManager::new();
    let _alice = join(&mut mgr, 1, "Alice", "R1").await;

    let (tx, _rx) = channel();
    let err = mgr.join(pid(1), "Alice", room("R2"), tx).await.unwrap_err();
    assert!(matches!(err, RoomError::AlreadyInRoom(_, ref r) if *r == room("R1")));
    assert_eq!(mgr.room_count(), 1);
}

#[tokio::test]
async fn test_get_room_info_counts_players() {
    let mut mgr = RoomManager::new();
    let _a = join(&mut mgr, 1, "Alice", "R1").await;
    let _b = join(&mut mgr, 2, "Bob", "R1").await;

    let info = mgr.get_room_info(&room("R1")).await.unwrap().unwrap();
    assert_eq!(info.room_id, room("R1"));
    assert_eq!(info.player_count, 2);

    assert!(mgr.get_room_info(&room("nope")).await.unwrap().is_none());
}

// =========================================================================
// MarkNumber
// =========================================================================

#[tokio::test]
async fn test_mark_number_broadcasts_room_state() {
    let mut mgr = RoomManager::new();
    let mut alice = join(&mut mgr, 1, "Alice", "R1").await;
    let mut bob = join(&mut mgr, 2, "Bob", "R1").await;
    // Alice also saw Bob arrive.
    next(&mut alice).await;
    next(&mut alice).await;

    mgr.mark_number(&room("R1"), 7).await.unwrap();

    for inbox in [&mut alice, &mut bob] {
        match next(inbox).await {
            ServerEvent::UpdateRoomState(snapshot) => {
                assert_eq!(snapshot.room_state.len(), 2);
                assert!(snapshot.room_state.iter().all(|p| p.marked == [7]));
                assert!(snapshot.winner.is_none());
            }
            other => panic!("expected updateRoomState, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_mark_number_unknown_room_is_silent_noop() {
    let mut mgr = RoomManager::new();
    let mut alice = join(&mut mgr, 1, "Alice", "R1").await;

    mgr.mark_number(&room("ghost"), 3).await.unwrap();

    assert_eq!(mgr.room_count(), 1);
    assert_quiet(&mut alice).await;
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let mut mgr = RoomManager::new();
    let mut alice = join(&mut mgr, 1, "Alice", "R1").await;
    let mut bob = join(&mut mgr, 2, "Bob", "R2").await;
    assert_eq!(mgr.room_count(), 2);

    mgr.mark_number(&room("R1"), 5).await.unwrap();
    assert!(matches!(
        next(&mut alice).await,
        ServerEvent::UpdateRoomState(_)
    ));
    assert_quiet(&mut bob).await;
}

// =========================================================================
// Disconnect
// =========================================================================

#[tokio::test]
async fn test_disconnect_broadcasts_remaining_names() {
    let mut mgr = RoomManager::new();
    let mut alice = join(&mut mgr, 1, "Alice", "R1").await;
    let mut bob = join(&mut mgr, 2, "Bob", "R1").await;
    next(&mut alice).await;
    next(&mut alice).await;

    mgr.disconnect(&room("R1"), pid(1)).await.unwrap();

    assert_eq!(
        next(&mut bob).await,
        ServerEvent::RoomUpdate(RoomUpdate::Names(vec!["Bob".into()]))
    );
    assert_eq!(mgr.player_room(&pid(1)), None);
    assert_eq!(mgr.room_count(), 1);
    assert_quiet(&mut alice).await;
}

#[tokio::test]
async fn test_disconnect_with_duplicate_names_removes_one() {
    let mut mgr = RoomManager::new();
    let _a1 = join(&mut mgr, 1, "Alice", "R1").await;
    let mut a2 = join(&mut mgr, 2, "Alice", "R1").await;

    mgr.disconnect(&room("R1"), pid(1)).await.unwrap();

    assert_eq!(
        next(&mut a2).await,
        ServerEvent::RoomUpdate(RoomUpdate::Names(vec!["Alice".into()]))
    );
    let info = mgr.get_room_info(&room("R1")).await.unwrap().unwrap();
    assert_eq!(info.player_count, 1);
}

#[tokio::test]
async fn test_disconnect_unknown_room_is_silent_noop() {
    let mut mgr = RoomManager::new();
    let mut alice = join(&mut mgr, 1, "Alice", "R1").await;

    mgr.disconnect(&room("ghost"), pid(1)).await.unwrap();

    assert_eq!(mgr.player_room(&pid(1)), Some(&room("R1")));
    assert_quiet(&mut alice).await;
}

#[tokio::test]
async fn test_disconnect_player_not_in_room_is_error() {
    let mut mgr = RoomManager::new();
    let _alice = join(&mut mgr, 1, "Alice", "R1").await;

    let err = mgr.disconnect(&room("R1"), pid(9)).await.unwrap_err();
    assert!(matches!(err, RoomError::NotInRoom(..)));
}

#[tokio::test]
async fn test_last_player_leaving_destroys_room() {
    let mut mgr = RoomManager::new();
    let _alice = join(&mut mgr, 1, "Alice", "R1").await;

    mgr.disconnect(&room("R1"), pid(1)).await.unwrap();

    assert_eq!(mgr.room_count(), 0);
    assert!(mgr.room_ids().is_empty());
    assert!(mgr.get_room_info(&room("R1")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_rejoining_destroyed_room_starts_fresh() {
    let mut mgr = RoomManager::new();
    let _alice = join(&mut mgr, 1, "Alice", "R1").await;
    mgr.mark_number(&room("R1"), 4).await.unwrap();
    mgr.disconnect(&room("R1"), pid(1)).await.unwrap();

    let (tx, mut bob) = channel();
    mgr.join(pid(2), "Bob", room("R1"), tx).await.unwrap();
    match next(&mut bob).await {
        ServerEvent::RoomUpdate(RoomUpdate::Players(players)) => {
            assert_eq!(players.len(), 1);
            assert!(players[0].marked.is_empty());
        }
        other => panic!("expected roomUpdate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_leave_uses_player_index() {
    let mut mgr = RoomManager::new();
    let _alice = join(&mut mgr, 1, "Alice", "R1").await;

    mgr.leave(pid(1)).await.unwrap();
    assert_eq!(mgr.room_count(), 0);

    // Leaving again is a no-op.
    mgr.leave(pid(1)).await.unwrap();
}

#[tokio::test]
async fn test_dropped_receiver_does_not_break_room() {
    let mut mgr = RoomManager::new();
    let alice = join(&mut mgr, 1, "Alice", "R1").await;
    let mut bob = join(&mut mgr, 2, "Bob", "R1").await;
    drop(alice);

    mgr.mark_number(&room("R1"), 1).await.unwrap();
    assert!(matches!(
        next(&mut bob).await,
        ServerEvent::UpdateRoomState(_)
    ));
}

#[tokio::test]
async fn test_player_with_full_queue_is_dropped() {
    let mut mgr = RoomManager::new();

    // Alice has room for four events and never reads: roomUpdate + bingoCard, then userJoined +
    // roomUpdate for Bob fill her queue.
    let (tx, mut alice) = mpsc::channel(4);
    mgr.join(pid(1), "Alice", room("R1"), tx).await.unwrap();
    let mut bob = join(&mut mgr, 2, "Bob", "R1").await;

    mgr.mark_number(&room("R1"), 3).await.unwrap();
    assert!(matches!(
        next(&mut bob).await,
        ServerEvent::UpdateRoomState(_)
    ));

    // The four queued events drain, then her channel is closed.
    for _ in 0..4 {
        next(&mut alice).await;
    }
    let closed = tokio::time::timeout(Duration::from_secs(1), alice.recv())
        .await
        .expect("timed out waiting for close");
    assert!(closed.is_none());

    // Bob keeps getting events.
    mgr.mark_number(&room("R1"), 4).await.unwrap();
    assert!(matches!(
        next(&mut bob).await,
        ServerEvent::UpdateRoomState(_)
    ));
}
