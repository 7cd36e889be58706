//! One win per member: deduplication, totals and the winner report.
//!
//! The resolver does not care how raw prizes were scored. Lucky numbers and
//! random pick competitions both hand it `(entry, member, raw prize)` triples
//! and get back the final prize of every entry.

use tracing::debug;

use crate::competition::Outcome;
use crate::entry::{Entry, EntryId, EntryOrigin};
use crate::error::DrawError;
use crate::numbers::NumberSet;
use crate::records::{MemberId, RecordSource};

/// An entry as seen by the resolver.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    pub entry_id: EntryId,
    pub member_id: &'a MemberId,
    pub raw_prize: u32,
}

/// Final prizes after deduplication, in the order candidates were given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub final_prizes: Vec<u32>,
    pub winner_count: usize,
    pub total_prize: u64,
}

/// Keep at most one winning entry per member.
///
/// Walks every pair `(i, j)` with `i` before `j` in entry id order. When both
/// still hold a prize and belong to the same member, the lower prize is
/// zeroed; on a tie the earlier entry keeps its prize. The prize of `i` is
/// read once at the start of its row, and rows are visited in increasing
/// order, so a zeroed entry is never revived.
pub fn resolve(candidates: &[Candidate<'_>]) -> Resolution {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&idx| candidates[idx].entry_id);

    let mut prizes: Vec<u32> = candidates.iter().map(|c| c.raw_prize).collect();

    for (pos, &i) in order.iter().enumerate() {
        let prize_i = prizes[i];
        if prize_i == 0 {
            continue;
        }
        for &j in &order[pos + 1..] {
            if prizes[j] == 0 || candidates[i].member_id != candidates[j].member_id {
                continue;
            }
            let loser = if prize_i >= prizes[j] { j } else { i };
            debug!(
                member = %candidates[i].member_id,
                kept = %candidates[if loser == j { i } else { j }].entry_id,
                dropped = %candidates[loser].entry_id,
                "Duplicate member win removed"
            );
            prizes[loser] = 0;
        }
    }

    let winner_count = prizes.iter().filter(|&&p| p > 0).count();
    let total_prize = prizes.iter().map(|&p| p as u64).sum();

    Resolution {
        final_prizes: prizes,
        winner_count,
        total_prize,
    }
}

/// A winning entry resolved to its member.
#[derive(Clone, Debug, PartialEq)]
pub struct Winner {
    pub entry_id: EntryId,
    pub member_id: MemberId,
    pub member_name: String,
    pub prize: u32,
    pub numbers: Option<NumberSet>,
    pub origin: EntryOrigin,
}

/// Result of drawing a competition.
#[derive(Clone, Debug, PartialEq)]
pub struct WinnerReport {
    pub outcome: Outcome,
    /// Winners in ascending entry id order.
    pub winners: Vec<Winner>,
    pub winner_count: usize,
    pub total_prize: u64,
}

impl WinnerReport {
    /// Build the report from entries whose `prize` already holds the final
    /// prize.
    pub fn build<R: RecordSource>(
        outcome: Outcome,
        entries: &[Entry],
        records: &R,
    ) -> Result<Self, DrawError> {
        let mut winning: Vec<&Entry> = entries.iter().filter(|e| e.is_winner()).collect();
        winning.sort_by_key(|e| e.id);

        let winners = winning
            .into_iter()
            .map(|entry| {
                let member = records
                    .get_member(&entry.member_id)
                    .ok_or_else(|| DrawError::MemberUnresolved(entry.bill_id.clone()))?;
                Ok(Winner {
                    entry_id: entry.id,
                    member_id: entry.member_id.clone(),
                    member_name: member.name.clone(),
                    prize: entry.prize,
                    numbers: entry.numbers,
                    origin: entry.origin,
                })
            })
            .collect::<Result<Vec<_>, DrawError>>()?;

        let total_prize = winners.iter().map(|w| w.prize as u64).sum();
        Ok(Self {
            outcome,
            winner_count: winners.len(),
            winners,
            total_prize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> MemberId {
        MemberId::parse(id).unwrap()
    }

    fn candidates<'a>(rows: &[(u64, &'a MemberId, u32)]) -> Vec<Candidate<'a>> {
        rows.iter()
            .map(|&(id, member_id, raw_prize)| Candidate {
                entry_id: EntryId(id),
                member_id,
                raw_prize,
            })
            .collect()
    }

    #[test]
    fn test_same_member_keeps_higher_prize() {
        let ada = member("000001");
        let resolution = resolve(&candidates(&[(1, &ada, 500), (2, &ada, 1000)]));
        assert_eq!(resolution.final_prizes, vec![0, 1000]);
        assert_eq!(resolution.winner_count, 1);
        assert_eq!(resolution.total_prize, 1000);
    }

    #[test]
    fn test_tie_keeps_earlier_entry() {
        let ada = member("000001");
        let resolution = resolve(&candidates(&[(1, &ada, 100), (2, &ada, 100), (3, &ada, 100)]));
        assert_eq!(resolution.final_prizes, vec![100, 0, 0]);
    }

    #[test]
    fn test_different_members_untouched() {
        let ada = member("000001");
        let bob = member("000002");
        let resolution = resolve(&candidates(&[(1, &ada, 50), (2, &bob, 50), (3, &ada, 0)]));
        assert_eq!(resolution.final_prizes, vec![50, 50, 0]);
        assert_eq!(resolution.winner_count, 2);
        assert_eq!(resolution.total_prize, 100);
    }

    #[test]
    fn test_best_prize_wins_across_many_entries() {
        let ada = member("000001");
        let bob = member("000002");
        let resolution = resolve(&candidates(&[
            (1, &ada, 100),
            (2, &bob, 5000),
            (3, &ada, 1000),
            (4, &ada, 500),
            (5, &bob, 5000),
            (6, &ada, 1000),
        ]));
        assert_eq!(resolution.final_prizes, vec![0, 5000, 1000, 0, 0, 0]);
        assert_eq!(resolution.total_prize, 6000);
    }

    #[test]
    fn test_order_follows_entry_ids_not_slice_order() {
        let ada = member("000001");
        // Same prize: entry 2 is earlier than entry 9 even though it's given second.
        let resolution = resolve(&candidates(&[(9, &ada, 50), (2, &ada, 50)]));
        assert_eq!(resolution.final_prizes, vec![0, 50]);
    }

    #[test]
    fn test_empty() {
        let resolution = resolve(&[]);
        assert!(resolution.final_prizes.is_empty());
        assert_eq!(resolution.winner_count, 0);
        assert_eq!(resolution.total_prize, 0);
    }
}
