//! Prize draws funded by purchase bills.
//!
//! A bill of at least $50 earns one entry per $50 spent. Entries go into a
//! competition, the competition is drawn, and each member keeps only their
//! best prize.
//!
//! ## Competition Types
//!
//! | Type          | Entry                          | Winners                          |
//! |---------------|--------------------------------|----------------------------------|
//! | Lucky numbers | 7 numbers in 1-35, manual/auto | 2+ numbers shared with lucky set |
//! | Random pick   | Plain entry                    | 3 entries drawn at random        |
//!
//! ## Key Concepts
//!
//! - **Session**: Explicit context holding the entry id counter, the set of
//!   bills consumed so far, and every competition created.
//! - **Testing mode**: Draws are seeded (auto entries by `entry_id - 1`,
//!   outcomes by competition id) so a run can be replayed exactly.
//! - **Deduplication**: A member holding several winning entries keeps the
//!   highest prize; ties go to the earliest entry.
//!
//! ## Usage
//!
//! ```
//! use prize_draw::{
//!     Bill, BillId, CompetitionKind, DrawConfig, Member, MemberId, RecordBook, Session,
//! };
//!
//! let mut records = RecordBook::new();
//! let member = MemberId::parse("000001").unwrap();
//! records.insert_member(Member::new(member.clone(), "Ada", "ada@example.com"));
//! records.insert_bill(Bill::new(BillId::parse("100001").unwrap(), Some(member), 120.0));
//!
//! let mut session = Session::new(DrawConfig::testing()).unwrap();
//! let id = session.create_competition("Spring", CompetitionKind::RandomPick);
//! session.add_entries_by_id(id, "100001", &[], &records).unwrap();
//!
//! // Two entries, three prizes: not enough entries to draw.
//! assert!(session.draw_and_resolve(id, &records).is_err());
//! ```

pub mod allocator;
pub mod competition;
pub mod config;
pub mod draw;
pub mod error;
pub mod records;
pub mod resolver;
pub mod tiers;

mod entry;
mod numbers;
mod session;

pub use allocator::{entry_count, Allocation, EligibleBill, EntryAllocator, MAX_ENTRIES_PER_BILL};
pub use competition::{BillRange, Competition, CompetitionId, CompetitionKind, Outcome};
pub use config::{DrawConfig, DrawMode};
pub use draw::{draw_distinct_indices, draw_number_set};
pub use entry::{Entry, EntryId, EntryOrigin};
pub use error::{ConfigError, DrawError, NumbersError};
pub use numbers::{NumberSet, MAX_NUMBER, NUMBER_COUNT};
pub use records::{Bill, BillId, Member, MemberId, RecordBook, RecordSource};
pub use resolver::{resolve, Candidate, Resolution, Winner, WinnerReport};
pub use session::{CompetitionSummary, Session};
pub use tiers::{pick_prize, tier_prize};
