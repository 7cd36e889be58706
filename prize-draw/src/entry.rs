//! Competition entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::numbers::NumberSet;
use crate::records::{BillId, MemberId};

/// Session-wide entry identifier. Ids start at 1 and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an entry came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryOrigin {
    /// Numbers chosen by the customer.
    Manual,
    /// Numbers drawn on the customer's behalf.
    Auto,
    /// Plain entry in a random pick competition, carries no numbers.
    Pick,
}

/// One chance in a competition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Present only for lucky numbers competitions.
    pub numbers: Option<NumberSet>,
    /// Prize awarded after the draw; 0 means no prize.
    pub prize: u32,
    pub origin: EntryOrigin,
    /// Bill that earned this entry.
    pub bill_id: BillId,
    /// Owner of `bill_id`, resolved when the entry was allocated.
    pub member_id: MemberId,
}

impl Entry {
    pub fn is_auto(&self) -> bool {
        self.origin == EntryOrigin::Auto
    }

    pub fn is_winner(&self) -> bool {
        self.prize > 0
    }
}
