//! The bingo card: a 5x5 grid holding each of `1..=25` exactly once.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Width and height of a card.
pub const CARD_SIZE: usize = 5;

/// Number of cells on a card, and also the highest number on it.
pub const CARD_CELLS: usize = CARD_SIZE * CARD_SIZE;

/// A called number. Signed and wide because clients may send anything;
/// numbers outside `1..=25` are accepted and simply never match a cell.
pub type Number = i64;

/// Raw row-major cell layout of a card.
pub type Grid = [[u8; CARD_SIZE]; CARD_SIZE];

/// A player's card.
///
/// The only way to get a `Card` is through [`Card::new`] (or its
/// `TryFrom` / `Deserialize` equivalents), all of which reject grids that
/// are not a permutation of `1..=25`. Code holding a `Card` can rely on
/// that invariant.
///
/// On the wire a card is a plain array of 5 rows of 5 numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Grid", into = "Grid")]
pub struct Card {
    rows: Grid,
}

impl Card {
    /// Builds a card from its rows.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidCard`] if a cell is outside
    /// `1..=25` or a number appears more than once.
    pub fn new(rows: Grid) -> Result<Self, ProtocolError> {
        let mut seen = [false; CARD_CELLS + 1];
        for &n in rows.iter().flatten() {
            let idx = usize::from(n);
            if idx == 0 || idx > CARD_CELLS {
                return Err(ProtocolError::InvalidCard(format!(
                    "number {n} is outside 1..={CARD_CELLS}"
                )));
            }
            if seen[idx] {
                return Err(ProtocolError::InvalidCard(format!(
                    "number {n} appears more than once"
                )));
            }
            seen[idx] = true;
        }
        Ok(Self { rows })
    }

    /// Builds a card from 25 numbers laid out row-major.
    pub fn from_numbers(
        numbers: [u8; CARD_CELLS],
    ) -> Result<Self, ProtocolError> {
        let mut rows = [[0; CARD_SIZE]; CARD_SIZE];
        for (i, n) in numbers.into_iter().enumerate() {
            rows[i / CARD_SIZE][i % CARD_SIZE] = n;
        }
        Self::new(rows)
    }

    /// Returns the rows of the card.
    pub fn rows(&self) -> &Grid {
        &self.rows
    }

    /// Returns the number at `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is `>= CARD_SIZE`.
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        self.rows[row][col]
    }

    /// Iterates over all 25 numbers, row-major.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().flatten().copied()
    }
}

impl TryFrom<Grid> for Card {
    type Error = ProtocolError;

    fn try_from(rows: Grid) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<Card> for Grid {
    fn from(card: Card) -> Self {
        card.rows
    }
}
