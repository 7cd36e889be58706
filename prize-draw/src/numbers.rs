//! Seven-number sets used by lucky numbers competitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NumbersError;

/// How many numbers a set holds.
pub const NUMBER_COUNT: usize = 7;

/// Largest number that may appear in a set. The smallest is 1.
pub const MAX_NUMBER: u8 = 35;

/// An ascending set of exactly [`NUMBER_COUNT`] distinct values in
/// `1..=MAX_NUMBER`.
///
/// Construction validates; once built a set can't be modified, so every
/// `NumberSet` in the system is well-formed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct NumberSet([u8; NUMBER_COUNT]);

impl NumberSet {
    /// Validate a caller-supplied collection of numbers.
    ///
    /// Count is checked first, then range, then uniqueness.
    pub fn new<I>(numbers: I) -> Result<Self, NumbersError>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let raw: Vec<i64> = numbers.into_iter().map(Into::into).collect();

        if raw.len() < NUMBER_COUNT {
            return Err(NumbersError::TooFew(raw.len()));
        }
        if raw.len() > NUMBER_COUNT {
            return Err(NumbersError::TooMany(raw.len()));
        }
        if let Some(&bad) = raw.iter().find(|&&n| n < 1 || n > MAX_NUMBER as i64) {
            return Err(NumbersError::OutOfRange(bad));
        }

        let mut values = [0u8; NUMBER_COUNT];
        for (slot, n) in values.iter_mut().zip(&raw) {
            *slot = *n as u8;
        }
        values.sort_unstable();

        if let Some(pair) = values.windows(2).find(|w| w[0] == w[1]) {
            return Err(NumbersError::Duplicate(pair[0]));
        }

        Ok(Self(values))
    }

    /// Build from values already known to be distinct and in range.
    pub(crate) fn from_drawn(mut values: [u8; NUMBER_COUNT]) -> Self {
        values.sort_unstable();
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(values.iter().all(|&n| (1..=MAX_NUMBER).contains(&n)));
        Self(values)
    }

    /// The numbers in ascending order.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    /// Size of the set intersection with `other`.
    ///
    /// Both sides are sorted, so this is a single merge walk.
    pub fn match_count(&self, other: &NumberSet) -> usize {
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < NUMBER_COUNT && j < NUMBER_COUNT {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }
}

impl TryFrom<Vec<u8>> for NumberSet {
    type Error = NumbersError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(numbers)
    }
}

impl From<NumberSet> for Vec<u8> {
    fn from(set: NumberSet) -> Self {
        set.0.to_vec()
    }
}

impl FromStr for NumberSet {
    type Err = NumbersError;

    /// Parse whitespace-separated numbers, e.g. `"3 11 5 20 35 1 7"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = s
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| NumbersError::NotNumeric(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(numbers)
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, n) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{n}")?;
        }
        Ok(())
    }
}
