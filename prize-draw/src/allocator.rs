//! Turning bills into numbered entries.
//!
//! The allocator owns the two pieces of session state that span
//! competitions: the entry id counter and the set of bills consumed so far.
//! A bill's stored used flag is only written back when the session ends, so
//! the in-memory set is what stops a bill being entered twice within one
//! session.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::competition::CompetitionKind;
use crate::config::DrawMode;
use crate::draw::draw_number_set;
use crate::entry::{Entry, EntryId, EntryOrigin};
use crate::error::DrawError;
use crate::numbers::NumberSet;
use crate::records::{Bill, BillId, MemberId, RecordSource};

/// Most entries a single bill may earn. Larger bills are refused.
pub const MAX_ENTRIES_PER_BILL: usize = 10_000;

/// Number of entries earned by `amount` at `unit_amount` dollars per entry.
///
/// Negative or non-finite amounts earn nothing, as does any amount when the
/// unit is not a positive finite number. Counts beyond `usize` saturate.
pub fn entry_count(amount: f64, unit_amount: f64) -> usize {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    if !unit_amount.is_finite() || unit_amount <= 0.0 {
        return 0;
    }
    (amount / unit_amount).floor() as usize
}

/// A bill that passed every eligibility check.
///
/// Only [`EntryAllocator::check_bill`] builds one, so an entry allocated from
/// it always carries a resolvable member.
#[derive(Clone, Debug, PartialEq)]
pub struct EligibleBill {
    pub bill_id: BillId,
    pub member_id: MemberId,
    pub amount: f64,
    /// Entries this bill earns.
    pub entries: usize,
}

/// Entries produced for one bill. Their ids form the contiguous range
/// `start_id..start_id + entries.len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Allocation {
    pub bill_id: BillId,
    pub start_id: EntryId,
    pub entries: Vec<Entry>,
}

impl Allocation {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn manual_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.origin == EntryOrigin::Manual)
            .count()
    }
}

#[derive(Clone, Debug)]
pub struct EntryAllocator {
    next_id: u64,
    unit_amount: f64,
    used_bills: BTreeSet<BillId>,
}

impl EntryAllocator {
    /// Create an allocator whose first entry id is 1.
    pub fn new(unit_amount: f64) -> Self {
        Self {
            next_id: 1,
            unit_amount,
            used_bills: BTreeSet::new(),
        }
    }

    pub fn entry_count(&self, amount: f64) -> usize {
        entry_count(amount, self.unit_amount)
    }

    /// Id the next allocated entry will receive.
    pub fn next_id(&self) -> EntryId {
        EntryId(self.next_id)
    }

    /// Whether `bill` was consumed earlier in this session.
    pub fn is_used(&self, bill: &BillId) -> bool {
        self.used_bills.contains(bill)
    }

    /// Bills consumed this session, in id order.
    pub fn used_bills(&self) -> impl Iterator<Item = &BillId> {
        self.used_bills.iter()
    }

    fn take_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Run the eligibility checks for `bill`.
    pub fn check_bill<R: RecordSource>(
        &self,
        bill: &Bill,
        records: &R,
    ) -> Result<EligibleBill, DrawError> {
        let member_id = bill
            .member_id
            .as_ref()
            .filter(|id| records.get_member(id).is_some())
            .ok_or_else(|| DrawError::MemberUnresolved(bill.id.clone()))?;

        if bill.used || self.is_used(&bill.id) {
            return Err(DrawError::BillAlreadyUsed(bill.id.clone()));
        }

        let entries = self.entry_count(bill.total_amount);
        if entries == 0 {
            return Err(DrawError::BillIneligible {
                bill: bill.id.clone(),
                amount: bill.total_amount,
            });
        }
        if entries > MAX_ENTRIES_PER_BILL {
            return Err(DrawError::TooManyEntries {
                bill: bill.id.clone(),
                entries,
                max: MAX_ENTRIES_PER_BILL,
            });
        }

        Ok(EligibleBill {
            bill_id: bill.id.clone(),
            member_id: member_id.clone(),
            amount: bill.total_amount,
            entries,
        })
    }

    /// Allocate an entry carrying customer-chosen numbers.
    pub fn allocate_manual(&mut self, numbers: NumberSet, bill: &EligibleBill) -> Entry {
        let id = self.take_id();
        self.build(id, Some(numbers), EntryOrigin::Manual, bill)
    }

    /// Allocate an entry with drawn numbers.
    ///
    /// In testing mode the draw is seeded with `id - 1`, so each auto entry
    /// of a run is reproducible on its own.
    pub fn allocate_auto(&mut self, bill: &EligibleBill, mode: DrawMode) -> Entry {
        let id = self.take_id();
        let numbers = draw_number_set(mode.seed_for(id.0 - 1));
        self.build(id, Some(numbers), EntryOrigin::Auto, bill)
    }

    /// Allocate a plain entry for a random pick competition.
    pub fn allocate_pick(&mut self, bill: &EligibleBill) -> Entry {
        let id = self.take_id();
        self.build(id, None, EntryOrigin::Pick, bill)
    }

    fn build(
        &self,
        id: EntryId,
        numbers: Option<NumberSet>,
        origin: EntryOrigin,
        bill: &EligibleBill,
    ) -> Entry {
        Entry {
            id,
            numbers,
            prize: 0,
            origin,
            bill_id: bill.bill_id.clone(),
            member_id: bill.member_id.clone(),
        }
    }

    /// Check `bill` and allocate all of its entries.
    ///
    /// Lucky numbers competitions get the manual sets first, then auto
    /// entries for the rest of the bill's allowance. Random pick competitions
    /// get plain entries and refuse manual sets. Nothing is allocated and the
    /// bill stays unused if any check fails.
    pub fn allocate_entries_for_bill<R: RecordSource>(
        &mut self,
        bill: &Bill,
        records: &R,
        manual_sets: &[NumberSet],
        kind: CompetitionKind,
        mode: DrawMode,
    ) -> Result<Allocation, DrawError> {
        let eligible = self.check_bill(bill, records).inspect_err(|err| {
            warn!(bill = %bill.id, error = %err, "Bill rejected");
        })?;

        if kind == CompetitionKind::RandomPick && !manual_sets.is_empty() {
            return Err(DrawError::ManualEntriesNotAllowed);
        }
        if manual_sets.len() > eligible.entries {
            return Err(DrawError::TooManyManualEntries {
                requested: manual_sets.len(),
                allowed: eligible.entries,
            });
        }

        let start_id = self.next_id();
        let mut entries = Vec::new();
        match kind {
            CompetitionKind::LuckyNumbers => {
                for numbers in manual_sets {
                    entries.push(self.allocate_manual(*numbers, &eligible));
                }
                for _ in manual_sets.len()..eligible.entries {
                    entries.push(self.allocate_auto(&eligible, mode));
                }
            }
            CompetitionKind::RandomPick => {
                for _ in 0..eligible.entries {
                    entries.push(self.allocate_pick(&eligible));
                }
            }
        }
        self.used_bills.insert(eligible.bill_id.clone());

        debug!(
            bill = %eligible.bill_id,
            member = %eligible.member_id,
            start_id = start_id.0,
            count = entries.len(),
            manual = manual_sets.len(),
            "Allocated entries"
        );

        Ok(Allocation {
            bill_id: eligible.bill_id,
            start_id,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Member, RecordBook};
    use assert_matches::assert_matches;

    fn book() -> RecordBook {
        let mut book = RecordBook::new();
        let member = MemberId::parse("200001").unwrap();
        book.insert_member(Member::new(member.clone(), "Ada", "ada@example.com"));
        book.insert_bill(Bill::new(BillId::parse("100001").unwrap(), Some(member.clone()), 375.0));
        book.insert_bill(Bill::new(BillId::parse("100002").unwrap(), Some(member.clone()), 40.0));
        book.insert_bill(Bill::new(BillId::parse("100003").unwrap(), None, 120.0));
        book.insert_bill(Bill::new(
            BillId::parse("100004").unwrap(),
            MemberId::parse("299999"),
            120.0,
        ));
        let mut used = Bill::new(BillId::parse("100005").unwrap(), Some(member), 120.0);
        used.used = true;
        book.insert_bill(used);
        book
    }

    fn bill(book: &RecordBook, id: &str) -> Bill {
        book.get_bill(&BillId::parse(id).unwrap()).unwrap().clone()
    }

    fn set(values: [u8; 7]) -> NumberSet {
        NumberSet::new(values).unwrap()
    }

    #[test]
    fn test_entry_count() {
        assert_eq!(entry_count(0.0, 50.0), 0);
        assert_eq!(entry_count(49.99, 50.0), 0);
        assert_eq!(entry_count(50.0, 50.0), 1);
        assert_eq!(entry_count(375.0, 50.0), 7);
        assert_eq!(entry_count(-10.0, 50.0), 0);
        assert_eq!(entry_count(f64::NAN, 50.0), 0);
        assert_eq!(entry_count(f64::INFINITY, 50.0), 0);
        assert_eq!(entry_count(120.0, 0.0), 0);
        assert_eq!(entry_count(120.0, -50.0), 0);
        assert_eq!(entry_count(120.0, f64::NAN), 0);
        assert_eq!(entry_count(1e30, 50.0), usize::MAX);
    }

    #[test]
    fn test_huge_bill_refused() {
        let mut book = book();
        let member = MemberId::parse("200001").unwrap();
        book.insert_bill(Bill::new(BillId::parse("100006").unwrap(), Some(member.clone()), 1e30));
        book.insert_bill(Bill::new(
            BillId::parse("100007").unwrap(),
            Some(member),
            50.0 * MAX_ENTRIES_PER_BILL as f64,
        ));
        let mut allocator = EntryAllocator::new(50.0);

        assert_matches!(
            allocator.allocate_entries_for_bill(
                &bill(&book, "100006"),
                &book,
                &[],
                CompetitionKind::RandomPick,
                DrawMode::Testing,
            ),
            Err(DrawError::TooManyEntries { entries: usize::MAX, max: MAX_ENTRIES_PER_BILL, .. })
        );
        assert_eq!(allocator.next_id(), EntryId(1));
        assert!(!allocator.is_used(&BillId::parse("100006").unwrap()));

        // The ceiling itself is still allowed.
        let allocation = allocator
            .allocate_entries_for_bill(
                &bill(&book, "100007"),
                &book,
                &[],
                CompetitionKind::RandomPick,
                DrawMode::Testing,
            )
            .unwrap();
        assert_eq!(allocation.count(), MAX_ENTRIES_PER_BILL);
    }

    #[test]
    fn test_non_positive_unit_earns_nothing() {
        let book = book();
        let mut allocator = EntryAllocator::new(0.0);

        assert_matches!(
            allocator.allocate_entries_for_bill(
                &bill(&book, "100001"),
                &book,
                &[],
                CompetitionKind::LuckyNumbers,
                DrawMode::Testing,
            ),
            Err(DrawError::BillIneligible { amount, .. }) if amount == 375.0
        );
    }

    #[test]
    fn test_manual_then_auto() {
        let book = book();
        let mut allocator = EntryAllocator::new(50.0);
        let manual = [set([1, 2, 3, 4, 5, 6, 7]), set([8, 9, 10, 11, 12, 13, 14])];

        let allocation = allocator
            .allocate_entries_for_bill(
                &bill(&book, "100001"),
                &book,
                &manual,
                CompetitionKind::LuckyNumbers,
                DrawMode::Testing,
            )
            .unwrap();

        assert_eq!(allocation.count(), 7);
        assert_eq!(allocation.manual_count(), 2);
        assert_eq!(allocation.start_id, EntryId(1));

        let ids: Vec<u64> = allocation.entries.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(allocation.entries[0].numbers, Some(manual[0]));
        assert_eq!(allocation.entries[1].origin, EntryOrigin::Manual);
        assert!(allocation.entries[2..].iter().all(|e| e.is_auto()));

        // Auto entry 3 is seeded with 2.
        assert_eq!(allocation.entries[2].numbers, Some(draw_number_set(Some(2))));
        assert_eq!(allocator.next_id(), EntryId(8));
    }

    #[test]
    fn test_rejections() {
        let book = book();
        let mut allocator = EntryAllocator::new(50.0);
        let lucky = CompetitionKind::LuckyNumbers;

        assert_matches!(
            allocator.allocate_entries_for_bill(&bill(&book, "100002"), &book, &[], lucky, DrawMode::Testing),
            Err(DrawError::BillIneligible { amount, .. }) if amount == 40.0
        );
        assert_matches!(
            allocator.allocate_entries_for_bill(&bill(&book, "100003"), &book, &[], lucky, DrawMode::Testing),
            Err(DrawError::MemberUnresolved(_))
        );
        assert_matches!(
            allocator.allocate_entries_for_bill(&bill(&book, "100004"), &book, &[], lucky, DrawMode::Testing),
            Err(DrawError::MemberUnresolved(_))
        );
        assert_matches!(
            allocator.allocate_entries_for_bill(&bill(&book, "100005"), &book, &[], lucky, DrawMode::Testing),
            Err(DrawError::BillAlreadyUsed(_))
        );

        // Failed checks consume neither ids nor bills.
        assert_eq!(allocator.next_id(), EntryId(1));
        assert_eq!(allocator.used_bills().count(), 0);
    }

    #[test]
    fn test_bill_used_once_per_session() {
        let book = book();
        let mut allocator = EntryAllocator::new(50.0);
        let target = bill(&book, "100001");

        allocator
            .allocate_entries_for_bill(&target, &book, &[], CompetitionKind::RandomPick, DrawMode::Normal)
            .unwrap();
        assert!(allocator.is_used(&target.id));
        assert_matches!(
            allocator.allocate_entries_for_bill(&target, &book, &[], CompetitionKind::LuckyNumbers, DrawMode::Normal),
            Err(DrawError::BillAlreadyUsed(_))
        );
    }

    #[test]
    fn test_too_many_manual_sets() {
        let book = book();
        let mut allocator = EntryAllocator::new(50.0);
        let manual = vec![set([1, 2, 3, 4, 5, 6, 7]); 8];

        assert_matches!(
            allocator.allocate_entries_for_bill(
                &bill(&book, "100001"),
                &book,
                &manual,
                CompetitionKind::LuckyNumbers,
                DrawMode::Testing,
            ),
            Err(DrawError::TooManyManualEntries { requested: 8, allowed: 7 })
        );
        assert!(!allocator.is_used(&BillId::parse("100001").unwrap()));
    }

    #[test]
    fn test_pick_entries_refuse_manual_sets() {
        let book = book();
        let mut allocator = EntryAllocator::new(50.0);
        let target = bill(&book, "100001");

        assert_matches!(
            allocator.allocate_entries_for_bill(
                &target,
                &book,
                &[set([1, 2, 3, 4, 5, 6, 7])],
                CompetitionKind::RandomPick,
                DrawMode::Testing,
            ),
            Err(DrawError::ManualEntriesNotAllowed)
        );

        let allocation = allocator
            .allocate_entries_for_bill(&target, &book, &[], CompetitionKind::RandomPick, DrawMode::Testing)
            .unwrap();
        assert_eq!(allocation.count(), 7);
        assert!(allocation
            .entries
            .iter()
            .all(|e| e.numbers.is_none() && e.origin == EntryOrigin::Pick));
    }
}
