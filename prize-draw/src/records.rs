//! Bill and member records, and the lookup seam to whoever stores them.
//!
//! Loading records from disk and writing the used flag back are the job of
//! the record store. The engine only needs [`RecordSource`] lookups; the
//! in-memory [`RecordBook`] is what a store hands over once it has parsed its
//! files.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DrawError;

/// Width of bill and member identifiers.
pub const ID_WIDTH: usize = 6;

fn is_fixed_width_numeric(s: &str) -> bool {
    s.len() == ID_WIDTH && s.bytes().all(|b| b.is_ascii_digit())
}

/// A 6-digit bill identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillId(String);

impl BillId {
    pub fn parse(s: &str) -> Result<Self, DrawError> {
        let s = s.trim();
        if is_fixed_width_numeric(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(DrawError::InvalidBillId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 6-digit member identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(String);

impl MemberId {
    /// Parse a member id. Returns `None` unless `s` is exactly six digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        is_fixed_width_numeric(s).then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A purchase record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    /// Owning member. `None` when the bill was never assigned to one, which
    /// makes it unusable for competitions.
    pub member_id: Option<MemberId>,
    /// Total amount in dollars.
    pub total_amount: f64,
    /// Set once the bill has been consumed by a saved competition.
    pub used: bool,
}

impl Bill {
    pub fn new(id: BillId, member_id: Option<MemberId>, total_amount: f64) -> Self {
        Self {
            id,
            member_id,
            total_amount,
            used: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub address: String,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Read-only record lookups consumed by the engine.
pub trait RecordSource {
    fn get_bill(&self, id: &BillId) -> Option<&Bill>;

    fn get_member(&self, id: &MemberId) -> Option<&Member>;
}

/// In-memory bill and member tables.
#[derive(Clone, Debug, Default)]
pub struct RecordBook {
    bills: HashMap<BillId, Bill>,
    members: HashMap<MemberId, Member>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a bill, returning the previous record.
    pub fn insert_bill(&mut self, bill: Bill) -> Option<Bill> {
        self.bills.insert(bill.id.clone(), bill)
    }

    /// Insert or replace a member, returning the previous record.
    pub fn insert_member(&mut self, member: Member) -> Option<Member> {
        self.members.insert(member.id.clone(), member)
    }

    /// Flip the used flag of every listed bill.
    ///
    /// Returns how many bills changed from unused to used; unknown ids and
    /// bills already flagged are skipped.
    pub fn mark_used<'a>(&mut self, ids: impl IntoIterator<Item = &'a BillId>) -> usize {
        let mut changed = 0;
        for id in ids {
            if let Some(bill) = self.bills.get_mut(id) {
                if !bill.used {
                    bill.used = true;
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl RecordSource for RecordBook {
    fn get_bill(&self, id: &BillId) -> Option<&Bill> {
        self.bills.get(id)
    }

    fn get_member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_id_validation() {
        assert_eq!(BillId::parse("123456").unwrap().as_str(), "123456");
        assert_eq!(BillId::parse(" 000001 ").unwrap().as_str(), "000001");
        assert!(matches!(BillId::parse("12345"), Err(DrawError::InvalidBillId(_))));
        assert!(matches!(BillId::parse("1234567"), Err(DrawError::InvalidBillId(_))));
        assert!(matches!(BillId::parse("12a456"), Err(DrawError::InvalidBillId(_))));
    }

    #[test]
    fn test_member_id_validation() {
        assert!(MemberId::parse("654321").is_some());
        assert!(MemberId::parse("").is_none());
        assert!(MemberId::parse("65432x").is_none());
    }

    #[test]
    fn test_mark_used() {
        let mut book = RecordBook::new();
        let a = BillId::parse("100001").unwrap();
        let b = BillId::parse("100002").unwrap();
        let missing = BillId::parse("999999").unwrap();
        book.insert_bill(Bill::new(a.clone(), MemberId::parse("200001"), 60.0));
        book.insert_bill(Bill::new(b.clone(), MemberId::parse("200001"), 80.0));

        assert_eq!(book.mark_used([&a, &missing]), 1);
        assert!(book.get_bill(&a).unwrap().used);
        assert!(!book.get_bill(&b).unwrap().used);

        // Already flagged bills are not counted twice.
        assert_eq!(book.mark_used([&a, &b]), 1);
    }
}
