//! Fixed prize tables.
//!
//! | Matches | Prize  |   | Pick rank | Prize  |
//! |---------|--------|---|-----------|--------|
//! | 7       | 50000  |   | 1st       | 50000  |
//! | 6       | 5000   |   | 2nd       | 5000   |
//! | 5       | 1000   |   | 3rd       | 1000   |
//! | 4       | 500    |   |           |        |
//! | 3       | 100    |   |           |        |
//! | 2       | 50     |   |           |        |
//! | 0-1     | 0      |   |           |        |

/// Prizes indexed by match count.
const MATCH_PRIZES: [u32; 8] = [0, 0, 50, 100, 500, 1000, 5000, 50_000];

/// Prizes indexed by pick rank (0 = first distinct entry drawn).
pub const PICK_PRIZES: [u32; 3] = [50_000, 5000, 1000];

/// Prize for an entry sharing `match_count` numbers with the lucky set.
pub fn tier_prize(match_count: usize) -> u32 {
    MATCH_PRIZES.get(match_count).copied().unwrap_or(0)
}

/// Prize for the entry drawn at position `rank` of a random pick.
pub fn pick_prize(rank: usize) -> u32 {
    PICK_PRIZES.get(rank).copied().unwrap_or(0)
}
