//! Random draws: lucky number sets and distinct winning indices.
//!
//! Every draw takes an optional seed. A seeded draw is fully reproducible,
//! which is what testing mode relies on; an unseeded draw pulls from OS
//! entropy. The `*_with` variants take any [`Rng`] for callers that manage
//! their own generator.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::DrawError;
use crate::numbers::{NumberSet, MAX_NUMBER, NUMBER_COUNT};

/// Build the generator for a draw.
pub fn draw_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draw a number set: shuffle `1..=35` and keep the first seven.
pub fn draw_number_set(seed: Option<u64>) -> NumberSet {
    draw_number_set_with(&mut draw_rng(seed))
}

/// Draw a number set from a caller-supplied generator.
pub fn draw_number_set_with<R: Rng + ?Sized>(rng: &mut R) -> NumberSet {
    let mut population: Vec<u8> = (1..=MAX_NUMBER).collect();
    population.shuffle(rng);

    let mut picked = [0u8; NUMBER_COUNT];
    picked.copy_from_slice(&population[..NUMBER_COUNT]);
    NumberSet::from_drawn(picked)
}

/// Draw `k` distinct indices from `0..pool_size`, in draw order.
///
/// Indices are sampled one at a time and a repeat is simply drawn again, so
/// the first index returned is the first distinct one drawn. Callers rely on
/// that order to rank winners.
pub fn draw_distinct_indices(
    pool_size: usize,
    k: usize,
    seed: Option<u64>,
) -> Result<Vec<usize>, DrawError> {
    draw_distinct_indices_with(&mut draw_rng(seed), pool_size, k)
}

/// Draw `k` distinct indices from a caller-supplied generator.
pub fn draw_distinct_indices_with<R: Rng + ?Sized>(
    rng: &mut R,
    pool_size: usize,
    k: usize,
) -> Result<Vec<usize>, DrawError> {
    if k > pool_size {
        return Err(DrawError::InsufficientPool {
            requested: k,
            available: pool_size,
        });
    }

    let mut chosen = Vec::with_capacity(k);
    let mut seen = HashSet::with_capacity(k);
    while chosen.len() < k {
        let idx = rng.gen_range(0..pool_size);
        if seen.insert(idx) {
            chosen.push(idx);
        }
    }
    Ok(chosen)
}
