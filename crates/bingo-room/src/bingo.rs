//! Win detection: counting completed lines on a card.

use bingo_protocol::{CARD_SIZE, Card, Number};

/// Number of candidate lines on a card: every row, every column, and the
/// two diagonals.
pub const LINE_COUNT: usize = 2 * CARD_SIZE + 2;

/// Counts the lines of `card` whose every cell is in `marked`.
///
/// Rows, then columns, then the main diagonal (top-left to bottom-right)
/// and the anti-diagonal (top-right to bottom-left). The result is in
/// `0..=LINE_COUNT`. Numbers in `marked` that aren't on the card are
/// ignored.
pub fn count_lines(card: &Card, marked: &[Number]) -> usize {
    let is_marked = |row: usize, col: usize| {
        marked.contains(&Number::from(card.cell(row, col)))
    };

    let rows = (0..CARD_SIZE)
        .filter(|&r| (0..CARD_SIZE).all(|c| is_marked(r, c)))
        .count();
    let cols = (0..CARD_SIZE)
        .filter(|&c| (0..CARD_SIZE).all(|r| is_marked(r, c)))
        .count();
    let diagonal = (0..CARD_SIZE).all(|i| is_marked(i, i));
    let anti_diagonal = (0..CARD_SIZE).all(|i| is_marked(i, CARD_SIZE - 1 - i));

    rows + cols + usize::from(diagonal) + usize::from(anti_diagonal)
}

/// Exact equality, not "at least": skipping over the target never wins.
pub fn is_winning_count(count: usize, winning_lines: usize) -> bool {
    count == winning_lines
}
