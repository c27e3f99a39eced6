use std::collections::HashSet;

use rand::Rng;

use crate::strip::{Strip, generate_strip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Complete,
    // The attempt budget ran out before `count` strips were accepted; the
    // batch holds whatever was accepted so far.
    BudgetExhausted,
}

#[derive(Debug, Clone)]
pub struct Batch {
    pub strips: Vec<Strip>,
    pub attempts: u32,
    pub outcome: BatchOutcome,
}

// Heuristic cap on generation attempts. Practically unreachable for the
// 1..=9999 request range, but it keeps the rejection loop bounded.
pub fn default_attempt_budget(count: usize) -> u32 {
    2000u32.max(count as u32 * 200)
}

pub fn generate_batch<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Batch {
    generate_batch_with_budget(count, default_attempt_budget(count), rng)
}

// Accumulates strips until `count` are accepted or the budget runs out.
// A candidate strip is rejected outright if any of its 6 cards repeats a
// card already accepted into the batch. Rejection is all-or-nothing:
// swapping out a single colliding card would break the column balance the
// strip generator guarantees, so the whole strip is regenerated instead.
pub fn generate_batch_with_budget<R: Rng + ?Sized>(
    count: usize,
    budget: u32,
    rng: &mut R,
) -> Batch {
    let mut strips = Vec::with_capacity(count);
    let mut seen: HashSet<String> = HashSet::new();
    let mut attempts = 0u32;

    while strips.len() < count && attempts < budget {
        attempts += 1;
        let candidate = generate_strip(rng);
        let signatures: Vec<String> = candidate.cards.iter().map(|c| c.signature()).collect();
        if signatures.iter().any(|sig| seen.contains(sig)) {
            continue;
        }
        seen.extend(signatures);
        strips.push(candidate);
    }

    let outcome = if strips.len() == count {
        BatchOutcome::Complete
    } else {
        BatchOutcome::BudgetExhausted
    };

    Batch {
        strips,
        attempts,
        outcome,
    }
}
