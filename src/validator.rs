use serde::Serialize;

use crate::strip::{MAX_NUMBER, Strip};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripReport {
    pub ok: bool,
    pub missing: Vec<u8>,
    pub duplicates: Vec<u8>,
}

// Checks that a strip's cards partition 1..=90 exactly. Takes any strip,
// well-formed or not, and reports problems instead of erroring: numbers in
// [1,90] seen zero times land in `missing`, numbers seen twice or more in
// `duplicates`. Out-of-range values still count toward the 90-element total,
// so they can never make a broken strip pass.
pub fn validate_strip(strip: &Strip) -> StripReport {
    let mut counts = [0u32; MAX_NUMBER as usize + 1];
    let mut total = 0usize;

    for card in &strip.cards {
        for &n in &card.numbers {
            total += 1;
            if (1..=MAX_NUMBER).contains(&n) {
                counts[n as usize] += 1;
            }
        }
    }

    let missing: Vec<u8> = (1..=MAX_NUMBER).filter(|&n| counts[n as usize] == 0).collect();
    let duplicates: Vec<u8> = (1..=MAX_NUMBER).filter(|&n| counts[n as usize] >= 2).collect();
    let ok = missing.is_empty() && duplicates.is_empty() && total == MAX_NUMBER as usize;

    StripReport {
        ok,
        missing,
        duplicates,
    }
}
