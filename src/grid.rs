use crate::strip::{COLUMNS, Card, column_of};

pub const GRID_ROWS: usize = 3;
pub const NUMBERS_PER_ROW: usize = 5;

pub type CardGrid = [[Option<u8>; COLUMNS]; GRID_ROWS];

// Lays a card's 15 numbers out on the printed 3x9 ticket: each number sits
// in its tens-column, each row ends up with exactly 5 numbers. Placement
// walks the columns left to right (ascending within a column, which the
// card's sort order already gives us) and drops each number into the
// least-filled row, lowest row first on ties, skipping rows that are full
// or whose cell in this column is taken. The walk order matters: it is what
// keeps the result stable for a given card.
pub fn card_grid(card: &Card) -> CardGrid {
    let mut grid: CardGrid = [[None; COLUMNS]; GRID_ROWS];
    let mut row_fill = [0usize; GRID_ROWS];

    let mut buckets: [Vec<u8>; COLUMNS] = Default::default();
    for &n in &card.numbers {
        buckets[column_of(n)].push(n);
    }

    for (col, bucket) in buckets.iter().enumerate() {
        for &n in bucket {
            let mut order: Vec<usize> = (0..GRID_ROWS).collect();
            order.sort_by_key(|&r| (row_fill[r], r));
            for r in order {
                if row_fill[r] < NUMBERS_PER_ROW && grid[r][col].is_none() {
                    grid[r][col] = Some(n);
                    row_fill[r] += 1;
                    break;
                }
            }
        }
    }

    grid
}
