//! Error types for entry allocation and draws.
//!
//! Every variant is a recoverable condition: the caller rejects the offending
//! bill or input and carries on with the rest of the session.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::competition::{CompetitionId, CompetitionKind};
use crate::records::BillId;

/// Reasons a number set fails validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NumbersError {
    /// Fewer than seven numbers were supplied.
    #[error("fewer than 7 numbers provided (got {0})")]
    TooFew(usize),

    /// More than seven numbers were supplied.
    #[error("more than 7 numbers provided (got {0})")]
    TooMany(usize),

    /// A number lies outside 1..=35.
    #[error("number {0} is outside the range 1 to 35")]
    OutOfRange(i64),

    /// A number appears more than once.
    #[error("number {0} appears more than once")]
    Duplicate(u8),

    /// A token could not be read as an integer.
    #[error("'{0}' is not a number")]
    NotNumeric(String),
}

/// Errors surfaced by the allocation and draw operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DrawError {
    #[error("invalid numbers: {0}")]
    InvalidNumbers(#[from] NumbersError),

    /// More distinct winners were requested than there are entries.
    #[error("cannot draw {requested} distinct winners from {available} entries")]
    InsufficientPool { requested: usize, available: usize },

    /// Bill amount is below the single-entry unit.
    #[error("bill {bill} (${amount}) is not eligible for an entry")]
    BillIneligible { bill: BillId, amount: f64 },

    /// Bill amount earns more entries than one bill may hold.
    #[error("bill {bill} would earn {entries} entries, more than the limit of {max}")]
    TooManyEntries { bill: BillId, entries: usize, max: usize },

    /// Bill was consumed earlier in this session or in a previous one.
    #[error("bill {0} has already been used for a competition")]
    BillAlreadyUsed(BillId),

    /// Bill has no member attached, or the member is unknown.
    #[error("bill {0} has no resolvable member")]
    MemberUnresolved(BillId),

    /// Bill id is not a 6-digit number.
    #[error("invalid bill id '{0}': must be a 6-digit number")]
    InvalidBillId(String),

    /// No bill with this id exists.
    #[error("bill {0} does not exist")]
    UnknownBill(BillId),

    #[error("{requested} manual entries requested but the bill only earns {allowed}")]
    TooManyManualEntries { requested: usize, allowed: usize },

    /// Manual number sets were supplied to a random pick competition.
    #[error("random pick competitions do not accept manual number entries")]
    ManualEntriesNotAllowed,

    #[error("competition {0} does not exist")]
    UnknownCompetition(CompetitionId),

    #[error("competition {0} has already been drawn")]
    AlreadyDrawn(CompetitionId),

    #[error("competition {0} has no entries")]
    NoEntries(CompetitionId),

    /// An outcome of one kind was applied to a competition of the other.
    #[error("competition {competition} is a {expected} and cannot take a {found} outcome")]
    OutcomeKindMismatch {
        competition: CompetitionId,
        expected: CompetitionKind,
        found: CompetitionKind,
    },
}

/// Errors loading a [`crate::DrawConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
