//! Competitions: the entries they own and how they are drawn.
//!
//! ## Kinds
//!
//! | Kind          | Entries           | Outcome                         |
//! |---------------|-------------------|---------------------------------|
//! | LuckyNumbers  | 7 numbers each    | A drawn lucky number set        |
//! | RandomPick    | No numbers        | Winning entries in draw order   |
//!
//! Scoring is the only kind-specific step. Both kinds share the resolver's
//! one-win-per-member pass.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocator::Allocation;
use crate::config::DrawMode;
use crate::draw::{draw_distinct_indices, draw_number_set};
use crate::entry::{Entry, EntryId};
use crate::error::DrawError;
use crate::numbers::NumberSet;
use crate::records::{BillId, RecordSource};
use crate::resolver::{resolve, Candidate, WinnerReport};
use crate::tiers::{pick_prize, tier_prize};

/// Session-wide competition identifier, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompetitionId(pub u32);

impl fmt::Display for CompetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionKind {
    LuckyNumbers,
    RandomPick,
}

impl fmt::Display for CompetitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitionKind::LuckyNumbers => f.write_str("LuckyNumbersCompetition"),
            CompetitionKind::RandomPick => f.write_str("RandomPickCompetition"),
        }
    }
}

/// What a draw produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    LuckyNumbers(NumberSet),
    /// Winning entries, first drawn first.
    RandomPick(Vec<EntryId>),
}

impl Outcome {
    /// The competition kind this outcome belongs to.
    pub fn kind(&self) -> CompetitionKind {
        match self {
            Outcome::LuckyNumbers(_) => CompetitionKind::LuckyNumbers,
            Outcome::RandomPick(_) => CompetitionKind::RandomPick,
        }
    }
}

/// The id range one bill contributed to a competition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRange {
    pub bill_id: BillId,
    pub start_id: EntryId,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub name: String,
    pub kind: CompetitionKind,
    entries: Vec<Entry>,
    ranges: Vec<BillRange>,
    outcome: Option<Outcome>,
    /// Final prize of every winning entry.
    winners: BTreeMap<EntryId, u32>,
    total_prize: u64,
}

impl Competition {
    pub fn new(id: CompetitionId, name: impl Into<String>, kind: CompetitionKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            entries: Vec::new(),
            ranges: Vec::new(),
            outcome: None,
            winners: BTreeMap::new(),
            total_prize: 0,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn bill_ranges(&self) -> &[BillRange] {
        &self.ranges
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_drawn(&self) -> bool {
        self.outcome.is_some()
    }

    /// Final prize for `entry`, 0 if it did not win.
    pub fn prize_of(&self, entry: EntryId) -> u32 {
        self.winners.get(&entry).copied().unwrap_or(0)
    }

    pub fn winner_count(&self) -> usize {
        self.winners.len()
    }

    pub fn total_prize(&self) -> u64 {
        self.total_prize
    }

    /// Take ownership of the entries allocated for one bill.
    pub fn add_allocation(&mut self, allocation: Allocation) -> Result<(), DrawError> {
        if self.is_drawn() {
            return Err(DrawError::AlreadyDrawn(self.id));
        }
        self.ranges.push(BillRange {
            bill_id: allocation.bill_id,
            start_id: allocation.start_id,
            count: allocation.entries.len(),
        });
        self.entries.extend(allocation.entries);
        Ok(())
    }

    /// Draw this competition's outcome.
    ///
    /// Testing mode seeds the draw with the competition id.
    pub fn draw_outcome(&self, mode: DrawMode, pick_winners: usize) -> Result<Outcome, DrawError> {
        let seed = mode.seed_for(u64::from(self.id.0));
        match self.kind {
            CompetitionKind::LuckyNumbers => Ok(Outcome::LuckyNumbers(draw_number_set(seed))),
            CompetitionKind::RandomPick => {
                let picks = draw_distinct_indices(self.entries.len(), pick_winners, seed)?;
                Ok(Outcome::RandomPick(
                    picks.into_iter().map(|idx| self.entries[idx].id).collect(),
                ))
            }
        }
    }

    /// Raw prize of every entry against `outcome`, before deduplication.
    pub fn score(&self, outcome: &Outcome) -> Vec<u32> {
        match outcome {
            Outcome::LuckyNumbers(lucky) => self
                .entries
                .iter()
                .map(|entry| {
                    entry
                        .numbers
                        .map(|numbers| tier_prize(numbers.match_count(lucky)))
                        .unwrap_or(0)
                })
                .collect(),
            Outcome::RandomPick(picked) => self
                .entries
                .iter()
                .map(|entry| {
                    picked
                        .iter()
                        .position(|id| *id == entry.id)
                        .map(pick_prize)
                        .unwrap_or(0)
                })
                .collect(),
        }
    }

    /// Draw, score, keep one win per member and report the winners.
    pub fn draw_and_resolve<R: RecordSource>(
        &mut self,
        records: &R,
        mode: DrawMode,
        pick_winners: usize,
    ) -> Result<WinnerReport, DrawError> {
        if self.is_drawn() {
            return Err(DrawError::AlreadyDrawn(self.id));
        }
        if self.entries.is_empty() {
            return Err(DrawError::NoEntries(self.id));
        }

        let outcome = self.draw_outcome(mode, pick_winners)?;
        self.apply_outcome(outcome, records)
    }

    /// Resolve winners against an outcome that was drawn elsewhere.
    ///
    /// The outcome must match this competition's kind, and a competition
    /// takes exactly one outcome.
    pub fn apply_outcome<R: RecordSource>(
        &mut self,
        outcome: Outcome,
        records: &R,
    ) -> Result<WinnerReport, DrawError> {
        if self.is_drawn() {
            return Err(DrawError::AlreadyDrawn(self.id));
        }
        if outcome.kind() != self.kind {
            return Err(DrawError::OutcomeKindMismatch {
                competition: self.id,
                expected: self.kind,
                found: outcome.kind(),
            });
        }

        let raw = self.score(&outcome);
        let candidates: Vec<Candidate<'_>> = self
            .entries
            .iter()
            .zip(&raw)
            .map(|(entry, &raw_prize)| Candidate {
                entry_id: entry.id,
                member_id: &entry.member_id,
                raw_prize,
            })
            .collect();
        let resolution = resolve(&candidates);

        let report_entries: Vec<Entry> = self
            .entries
            .iter()
            .zip(&resolution.final_prizes)
            .map(|(entry, &prize)| Entry {
                prize,
                ..entry.clone()
            })
            .collect();
        let report = WinnerReport::build(outcome.clone(), &report_entries, records)?;

        self.entries = report_entries;
        self.winners = self
            .entries
            .iter()
            .filter(|e| e.is_winner())
            .map(|e| (e.id, e.prize))
            .collect();
        self.total_prize = resolution.total_prize;
        self.outcome = Some(outcome);

        info!(
            competition = self.id.0,
            kind = %self.kind,
            entries = self.entries.len(),
            winners = resolution.winner_count,
            total_prize = resolution.total_prize,
            "Competition drawn"
        );

        Ok(report)
    }
}
