//! A draw session: the context every operation runs in.
//!
//! The session carries the entry id counter and used bill set (inside the
//! allocator) across all competitions created in it, so ids never repeat and
//! a bill can only be entered once per session. When the session ends, the
//! record store writes the used flag of every consumed bill back to storage.

use tracing::info;

use crate::allocator::{Allocation, EntryAllocator};
use crate::competition::{Competition, CompetitionId, CompetitionKind};
use crate::config::DrawConfig;
use crate::error::{ConfigError, DrawError};
use crate::numbers::NumberSet;
use crate::records::{Bill, BillId, RecordBook, RecordSource};
use crate::resolver::WinnerReport;

/// Per-competition line of the session report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompetitionSummary {
    pub id: CompetitionId,
    pub name: String,
    pub kind: CompetitionKind,
    pub entries: usize,
    pub drawn: bool,
    pub winner_count: usize,
    pub total_prize: u64,
}

#[derive(Debug)]
pub struct Session {
    config: DrawConfig,
    allocator: EntryAllocator,
    competitions: Vec<Competition>,
    next_competition_id: u32,
}

impl Session {
    /// Start a session. `config` is validated first.
    pub fn new(config: DrawConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            allocator: EntryAllocator::new(config.entry_unit_amount),
            config,
            competitions: Vec::new(),
            next_competition_id: 1,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Entries a bill of `amount` dollars would earn.
    pub fn entry_count(&self, amount: f64) -> usize {
        self.allocator.entry_count(amount)
    }

    pub fn create_competition(
        &mut self,
        name: impl Into<String>,
        kind: CompetitionKind,
    ) -> CompetitionId {
        let id = CompetitionId(self.next_competition_id);
        self.next_competition_id += 1;

        let competition = Competition::new(id, name, kind);
        info!(competition = id.0, name = %competition.name, kind = %kind, "Competition created");
        self.competitions.push(competition);
        id
    }

    pub fn competition(&self, id: CompetitionId) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    fn index_of(&self, id: CompetitionId) -> Result<usize, DrawError> {
        self.competitions
            .iter()
            .position(|c| c.id == id)
            .ok_or(DrawError::UnknownCompetition(id))
    }

    /// Allocate `bill`'s entries into competition `id`.
    ///
    /// Returns the allocation so the caller can show the new entries.
    pub fn add_entries<R: RecordSource>(
        &mut self,
        id: CompetitionId,
        bill: &Bill,
        manual_sets: &[NumberSet],
        records: &R,
    ) -> Result<Allocation, DrawError> {
        let idx = self.index_of(id)?;
        let competition = &mut self.competitions[idx];
        if competition.is_drawn() {
            return Err(DrawError::AlreadyDrawn(id));
        }

        let allocation = self.allocator.allocate_entries_for_bill(
            bill,
            records,
            manual_sets,
            competition.kind,
            self.config.mode,
        )?;
        competition.add_allocation(allocation.clone())?;
        Ok(allocation)
    }

    /// Like [`Session::add_entries`], looking the bill up by its raw id.
    pub fn add_entries_by_id<R: RecordSource>(
        &mut self,
        id: CompetitionId,
        bill_id: &str,
        manual_sets: &[NumberSet],
        records: &R,
    ) -> Result<Allocation, DrawError> {
        let bill_id = BillId::parse(bill_id)?;
        let bill = records
            .get_bill(&bill_id)
            .ok_or(DrawError::UnknownBill(bill_id))?;
        self.add_entries(id, bill, manual_sets, records)
    }

    /// Draw competition `id` and resolve its winners.
    pub fn draw_and_resolve<R: RecordSource>(
        &mut self,
        id: CompetitionId,
        records: &R,
    ) -> Result<WinnerReport, DrawError> {
        let idx = self.index_of(id)?;
        self.competitions[idx].draw_and_resolve(records, self.config.mode, self.config.pick_winners)
    }

    /// One line per competition, in creation order.
    pub fn summary(&self) -> Vec<CompetitionSummary> {
        self.competitions
            .iter()
            .map(|c| CompetitionSummary {
                id: c.id,
                name: c.name.clone(),
                kind: c.kind,
                entries: c.entries().len(),
                drawn: c.is_drawn(),
                winner_count: c.winner_count(),
                total_prize: c.total_prize(),
            })
            .collect()
    }

    /// Bills consumed by this session, in id order.
    pub fn consumed_bills(&self) -> Vec<BillId> {
        self.allocator.used_bills().cloned().collect()
    }

    /// Flag every consumed bill as used in `book`. Returns how many changed.
    pub fn write_back_used(&self, book: &mut RecordBook) -> usize {
        let changed = book.mark_used(self.allocator.used_bills());
        info!(bills = changed, "Marked consumed bills as used");
        changed
    }
}
