use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const CARDS_PER_STRIP: usize = 6;
pub const NUMBERS_PER_CARD: usize = 15;
pub const COLUMNS: usize = 9;
pub const MAX_NUMBER: u8 = 90;

// Tens-column of a number: [1-9] -> 0, [10-19] -> 1, ... [80-90] -> 8.
// 90 folds into the last column, which therefore holds 11 numbers.
pub fn column_of(n: u8) -> usize {
    if n == MAX_NUMBER { 8 } else { (n / 10) as usize }
}

pub fn column_numbers(col: usize) -> Vec<u8> {
    match col {
        0 => (1..=9).collect(),
        8 => (80..=90).collect(),
        _ => {
            let lo = (col as u8) * 10;
            (lo..=lo + 9).collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub numbers: Vec<u8>,
}

impl Card {
    // Canonical key for uniqueness checks: two cards are the same ticket
    // iff their sorted number sequences match.
    pub fn signature(&self) -> String {
        let mut sorted = self.numbers.clone();
        sorted.sort_unstable();
        sorted
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strip {
    pub cards: Vec<Card>,
}

// Builds one strip whose 6 cards partition 1..=90, with the numbers of each
// column spread evenly across the cards.
//
// Per column: shuffle the column's pool, deal one base number to every card,
// then deal the leftover 3-5 numbers round-robin starting at card
// (col + i) % 6. Rotating the start by column index keeps the extras from
// piling onto the low card indices, so every card ends up with exactly 15
// numbers and never more than 2 from the same column.
pub fn generate_strip<R: Rng + ?Sized>(rng: &mut R) -> Strip {
    let mut cards: Vec<Vec<u8>> = vec![Vec::with_capacity(NUMBERS_PER_CARD); CARDS_PER_STRIP];

    for col in 0..COLUMNS {
        let mut pool = column_numbers(col);
        pool.shuffle(rng);

        for (card, &n) in cards.iter_mut().zip(pool.iter()) {
            card.push(n);
        }
        for (i, &n) in pool[CARDS_PER_STRIP..].iter().enumerate() {
            cards[(col + i) % CARDS_PER_STRIP].push(n);
        }
    }

    for card in &mut cards {
        card.sort_unstable();
    }

    Strip {
        cards: cards.into_iter().map(|numbers| Card { numbers }).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_column_of_boundaries() {
        assert_eq!(column_of(1), 0);
        assert_eq!(column_of(9), 0);
        assert_eq!(column_of(10), 1);
        assert_eq!(column_of(19), 1);
        assert_eq!(column_of(79), 7);
        assert_eq!(column_of(80), 8);
        assert_eq!(column_of(89), 8);
        assert_eq!(column_of(90), 8);
    }

    #[test]
    fn test_column_numbers_sizes() {
        assert_eq!(column_numbers(0).len(), 9);
        for col in 1..8 {
            assert_eq!(column_numbers(col).len(), 10);
        }
        assert_eq!(column_numbers(8).len(), 11);

        let total: usize = (0..COLUMNS).map(|c| column_numbers(c).len()).sum();
        assert_eq!(total, 90);
    }

    #[test]
    fn test_strip_covers_1_to_90() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let strip = generate_strip(&mut rng);
            let mut all: Vec<u8> = strip
                .cards
                .iter()
                .flat_map(|c| c.numbers.iter().copied())
                .collect();
            all.sort_unstable();
            let expected: Vec<u8> = (1..=90).collect();
            assert_eq!(all, expected);
        }
    }

    #[test]
    fn test_strip_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let strip = generate_strip(&mut rng);
        assert_eq!(strip.cards.len(), CARDS_PER_STRIP);
        for card in &strip.cards {
            assert_eq!(card.numbers.len(), NUMBERS_PER_CARD);
            let mut sorted = card.numbers.clone();
            sorted.sort_unstable();
            assert_eq!(card.numbers, sorted, "card numbers must be ascending");
        }
    }

    #[test]
    fn test_at_most_two_per_column_per_card() {
        // Column 8 is the worst case: 11 numbers, 5 extras dealt from
        // offset (8 + i) % 6, which must still cap every card at 2.
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let strip = generate_strip(&mut rng);
            for card in &strip.cards {
                let mut per_col = [0usize; COLUMNS];
                for &n in &card.numbers {
                    per_col[column_of(n)] += 1;
                }
                for (col, &count) in per_col.iter().enumerate() {
                    assert!(count >= 1, "column {col} missing from card");
                    assert!(count <= 2, "column {col} has {count} numbers on one card");
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_strip() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(generate_strip(&mut a), generate_strip(&mut b));
    }

    #[test]
    fn test_signature_ignores_input_order() {
        let card = Card {
            numbers: vec![5, 1, 3],
        };
        let reordered = Card {
            numbers: vec![3, 5, 1],
        };
        assert_eq!(card.signature(), reordered.signature());
        assert_eq!(card.signature(), "1-3-5");
    }
}
