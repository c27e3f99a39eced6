use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("cannot draw {requested} distinct codes from a {capacity}-value space")]
    Infeasible { requested: usize, capacity: u64 },
}

// Draws `count` distinct zero-padded numeric codes of the given digit width,
// e.g. "0427" at width 4. Fails up front when the digit space is too small
// to ever satisfy the request; otherwise keeps sampling until the set is
// full. No attempt cap: the caller sizes `digits` so the space is dense
// enough for the batch at hand.
pub fn generate_unique_codes<R: Rng + ?Sized>(
    count: usize,
    digits: u32,
    rng: &mut R,
) -> Result<Vec<String>, CodeError> {
    // Widths past 19 digits overflow u64; the space is unbounded for any
    // realistic count at that point, so saturate instead.
    let capacity = 10u64.checked_pow(digits).unwrap_or(u64::MAX);
    if count as u64 > capacity {
        return Err(CodeError::Infeasible {
            requested: count,
            capacity,
        });
    }

    let mut drawn: HashSet<u64> = HashSet::with_capacity(count);
    let mut codes = Vec::with_capacity(count);
    while codes.len() < count {
        let value = rng.random_range(0..capacity);
        if drawn.insert(value) {
            codes.push(format!("{value:0width$}", width = digits as usize));
        }
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_codes_are_distinct_and_padded() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let codes = generate_unique_codes(5, 4, &mut rng).unwrap();
        assert_eq!(codes.len(), 5);
        let distinct: HashSet<&String> = codes.iter().collect();
        assert_eq!(distinct.len(), 5);
        for code in &codes {
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_infeasible_request_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let err = generate_unique_codes(10_001, 4, &mut rng).unwrap_err();
        assert_eq!(
            err,
            CodeError::Infeasible {
                requested: 10_001,
                capacity: 10_000,
            }
        );
    }

    #[test]
    fn test_exhausting_a_tiny_space() {
        // Width 1 has exactly 10 values; asking for all of them must
        // terminate and produce every digit once.
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut codes = generate_unique_codes(10, 1, &mut rng).unwrap();
        codes.sort();
        let expected: Vec<String> = (0..10).map(|d| d.to_string()).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        assert!(generate_unique_codes(0, 4, &mut rng).unwrap().is_empty());
    }
}
