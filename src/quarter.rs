use crate::error::{InsightError, Result};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reporting quarter such as `"2023 Q2"`.
///
/// Ordering is plain lexicographic ordering of the label. That matches
/// chronological order only while years have four digits and quarter numbers
/// a single digit, which is why [`Quarter::parse`] rejects anything else.
///
/// Labels decoded from stored records are kept verbatim (see
/// [`From<String>`]); user-supplied bounds should go through `parse`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Quarter(String);

impl Quarter {
    /// Strictly parses `"<4-digit year> Q<1-4>"`, normalising the `q` to upper case.
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = || InsightError::InvalidQuarter(label.to_string());

        let mut tokens = label.split_whitespace();
        let (year, quarter) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(y), Some(q), None) => (y, q),
            _ => return Err(invalid()),
        };

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = parse_quarter_token(quarter).ok_or_else(invalid)?;

        Ok(Self(format!("{} Q{}", year, number)))
    }

    /// The quarter containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04} Q{}", date.year(), (date.month() - 1) / 3 + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn year(&self) -> Option<i32> {
        self.0.split_whitespace().next()?.parse().ok()
    }

    pub fn number(&self) -> Option<u32> {
        parse_quarter_token(self.0.split_whitespace().nth(1)?)
    }

    /// The following quarter, or `None` when this label is not well formed.
    pub fn next(&self) -> Option<Self> {
        let year = self.year()?;
        let number = self.number()?;
        let (year, number) = if number >= 4 {
            (year + 1, 1)
        } else {
            (year, number + 1)
        };
        Some(Self(format!("{:04} Q{}", year, number)))
    }

    /// True when `self` lies within the optional inclusive bounds.
    pub fn within(&self, start: Option<&Quarter>, end: Option<&Quarter>) -> bool {
        start.map_or(true, |s| s <= self) && end.map_or(true, |e| self <= e)
    }
}

/// Every quarter from `start` to `end` inclusive; empty when `start > end`.
pub fn quarter_range(start: &Quarter, end: &Quarter) -> Vec<Quarter> {
    let mut quarters = Vec::new();
    let mut current = Some(start.clone());

    while let Some(quarter) = current {
        if &quarter > end {
            break;
        }
        current = quarter.next();
        quarters.push(quarter);
    }

    quarters
}

fn parse_quarter_token(token: &str) -> Option<u32> {
    let digits = token.strip_prefix('Q').or_else(|| token.strip_prefix('q'))?;
    if digits.len() != 1 {
        return None;
    }
    let number: u32 = digits.parse().ok()?;
    (1..=4).contains(&number).then_some(number)
}

impl From<String> for Quarter {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl From<&str> for Quarter {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl FromStr for Quarter {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Quarter {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
