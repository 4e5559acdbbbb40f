//! Card dealing.

use bingo_protocol::{CARD_CELLS, Card};
use rand::Rng;
use rand::seq::SliceRandom;

/// Deals a fresh card: a uniformly random permutation of `1..=25`, laid
/// out row-major.
///
/// `SliceRandom::shuffle` is a Fisher–Yates shuffle, so every arrangement
/// is equally likely. Pass a seeded rng for reproducible cards.
pub fn generate_card<R: Rng + ?Sized>(rng: &mut R) -> Card {
    let mut numbers: [u8; CARD_CELLS] =
        std::array::from_fn(|i| (i + 1) as u8);
    numbers.as_mut_slice().shuffle(rng);
    Card::from_numbers(numbers).expect("shuffled 1..=25 is a valid card")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bingo_protocol::CARD_SIZE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generated_card_is_permutation() {
        for seed in 0..200 {
            let card = generate_card(&mut StdRng::seed_from_u64(seed));
            let mut numbers: Vec<u8> = card.numbers().collect();
            numbers.sort_unstable();
            let expected: Vec<u8> = (1..=CARD_CELLS as u8).collect();
            assert_eq!(numbers, expected, "seed {seed}");
        }
    }

    #[test]
    fn test_same_seed_same_card() {
        let a = generate_card(&mut StdRng::seed_from_u64(42));
        let b = generate_card(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cards_vary_between_deals() {
        let mut rng = StdRng::seed_from_u64(1);
        let cards: HashSet<_> = (0..50)
            .map(|_| *generate_card(&mut rng).rows())
            .collect();
        assert!(cards.len() > 45);
    }

    #[test]
    fn test_number_one_lands_everywhere() {
        // A biased comparator shuffle keeps numbers near their start; a
        // proper shuffle spreads `1` over the whole grid.
        let mut rng = StdRng::seed_from_u64(9);
        let mut positions = HashSet::new();
        for _ in 0..1000 {
            let card = generate_card(&mut rng);
            for r in 0..CARD_SIZE {
                for c in 0..CARD_SIZE {
                    if card.cell(r, c) == 1 {
                        positions.insert((r, c));
                    }
                }
            }
        }
        assert_eq!(positions.len(), CARD_CELLS);
    }
}
