//! The bingo game state of one room.
//!
//! [`BingoRoom`] is plain synchronous data. Each operation mutates the
//! room and returns the `(Recipient, ServerEvent)` pairs it produces; the
//! room actor in `room.rs` is what actually delivers them. Keeping I/O
//! out of here means every rule can be tested without a runtime.

use bingo_protocol::{
    Card, Number, PlayerId, PlayerState, PlayerView, Recipient, RoomId,
    RoomSnapshot, RoomUpdate, ServerEvent,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    RoomConfig, RoomError, TurnStatus, count_lines, generate_card,
    is_winning_count,
};

/// Events produced by one room operation, in delivery order.
pub type Outbound = Vec<(Recipient, ServerEvent)>;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A player seated in a room.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    card: Card,
    /// Numbers in the order they were called. Append-only, no duplicates.
    marked: Vec<Number>,
    turn: TurnStatus,
}

impl Player {
    fn new(id: PlayerId, name: String, card: Card) -> Self {
        Self {
            id,
            name,
            card,
            marked: Vec::new(),
            turn: TurnStatus::default(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name. Not unique within a room.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn marked(&self) -> &[Number] {
        &self.marked
    }

    pub fn turn(&self) -> TurnStatus {
        self.turn
    }

    /// Lines currently completed on this player's card.
    pub fn bingos(&self) -> usize {
        count_lines(&self.card, &self.marked)
    }

    fn mark(&mut self, number: Number) {
        if !self.marked.contains(&number) {
            self.marked.push(number);
        }
    }

    fn view(&self) -> PlayerView {
        PlayerView {
            id: self.id,
            name: self.name.clone(),
            card: self.card,
            marked: self.marked.clone(),
        }
    }

    fn state(&self, bingos: usize) -> PlayerState {
        PlayerState {
            id: self.id,
            name: self.name.clone(),
            card: self.card,
            marked: self.marked.clone(),
            bingos,
        }
    }
}

// ---------------------------------------------------------------------------
// BingoRoom
// ---------------------------------------------------------------------------

/// One room's players and the rng that deals their cards.
///
/// Players are kept in join order. That order is what the clients display
/// and what breaks ties when several players win on the same call.
pub struct BingoRoom {
    room_id: RoomId,
    winning_lines: usize,
    players: Vec<Player>,
    rng: StdRng,
}

impl BingoRoom {
    /// Creates an empty room whose cards are dealt from OS entropy.
    pub fn new(room_id: RoomId, config: &RoomConfig) -> Self {
        Self::with_rng(room_id, config, StdRng::from_os_rng())
    }

    /// Creates an empty room with a deterministic card sequence.
    pub fn with_seed(room_id: RoomId, config: &RoomConfig, seed: u64) -> Self {
        Self::with_rng(room_id, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(room_id: RoomId, config: &RoomConfig, rng: StdRng) -> Self {
        Self {
            room_id,
            winning_lines: config.winning_lines,
            players: Vec::new(),
            rng,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Seats a player with a freshly dealt card.
    ///
    /// Produces, in order: `userJoined` to everyone else, `roomUpdate`
    /// with every player's full view to everyone, and `bingoCard` to the
    /// new player alone.
    ///
    /// # Errors
    /// [`RoomError::AlreadyInRoom`] if `player_id` is already seated.
    /// Duplicate *names* are fine.
    pub fn join(
        &mut self,
        player_id: PlayerId,
        name: impl Into<String>,
    ) -> Result<Outbound, RoomError> {
        let card = generate_card(&mut self.rng);
        self.join_with_card(player_id, name, card)
    }

    /// Same as [`join`](Self::join) but with a card chosen by the caller.
    pub fn join_with_card(
        &mut self,
        player_id: PlayerId,
        name: impl Into<String>,
        card: Card,
    ) -> Result<Outbound, RoomError> {
        if self.player(player_id).is_some() {
            return Err(RoomError::AlreadyInRoom(
                player_id,
                self.room_id.clone(),
            ));
        }

        let player = Player::new(player_id, name.into(), card);
        let joined = ServerEvent::UserJoined(player.name.clone());
        self.players.push(player);

        let views = self.players.iter().map(Player::view).collect();
        Ok(vec![
            (Recipient::AllExcept(player_id), joined),
            (
                Recipient::All,
                ServerEvent::RoomUpdate(RoomUpdate::Players(views)),
            ),
            (Recipient::Player(player_id), ServerEvent::BingoCard(card)),
        ])
    }

    /// Calls `number` for the whole room.
    ///
    /// The number is added to every player's marked set (once), then each
    /// player's lines are counted against their own card. The first player
    /// in join order whose count equals the winning line count exactly is
    /// the winner of this call. Produces `updateRoomState` for everyone,
    /// followed by `gameOver` when there is a winner.
    ///
    /// An empty room produces nothing.
    pub fn mark_number(&mut self, number: Number) -> Outbound {
        if self.players.is_empty() {
            return Vec::new();
        }

        for player in &mut self.players {
            player.mark(number);
        }

        let mut winner: Option<String> = None;
        let room_state = self
            .players
            .iter()
            .map(|player| {
                let bingos = player.bingos();
                if winner.is_none()
                    && is_winning_count(bingos, self.winning_lines)
                {
                    winner = Some(player.name.clone());
                }
                player.state(bingos)
            })
            .collect();

        let mut out = vec![(
            Recipient::All,
            ServerEvent::UpdateRoomState(RoomSnapshot {
                room_state,
                winner: winner.clone(),
            }),
        )];

        if let Some(winner) = winner {
            tracing::info!(
                room_id = %self.room_id,
                number,
                %winner,
                "bingo winner"
            );
            out.push((Recipient::All, ServerEvent::GameOver { winner }));
        }

        out
    }

    /// Removes a player and tells the rest who is left.
    ///
    /// Only the entry with this id is removed; other players sharing the
    /// name stay. Produces `roomUpdate` with the remaining *names*.
    ///
    /// # Errors
    /// [`RoomError::NotInRoom`] if nobody with that id is seated.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<Outbound, RoomError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| {
                RoomError::NotInRoom(player_id, self.room_id.clone())
            })?;
        self.players.remove(idx);

        let names = self.players.iter().map(|p| p.name.clone()).collect();
        Ok(vec![(
            Recipient::All,
            ServerEvent::RoomUpdate(RoomUpdate::Names(names)),
        )])
    }
}
