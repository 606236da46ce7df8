use crate::quarter::Quarter;
use crate::schema::{
    CompanyRecord, GeneralInsightRecord, InvestmentRecord, PerformanceRecord, ThemeKind, VcPerformanceRecord,
};
use crate::utils::display_fund_name;
use log::debug;
use std::collections::BTreeSet;

/// Sectors offered by the sector picker; "All" expands to this list.
pub const KNOWN_SECTORS: [&str; 8] = [
    "Financials",
    "Energy",
    "Health Care",
    "Communication Services",
    "Industrials",
    "Information Technology",
    "Consumer Discretionary",
    "Real Estate",
];

/// Parameters for [`filter_records`]. The default filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFilter {
    /// Allowed sectors; empty means no sector filter.
    pub sectors: BTreeSet<String>,
    pub start: Option<Quarter>,
    pub end: Option<Quarter>,
    /// Only keep positions opened in the quarter ("newly added").
    pub pitched: bool,
    /// Only keep positions exited in the quarter.
    pub exited: bool,
}

impl CompanyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sectors<I, S>(mut self, sectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sectors = sectors.into_iter().map(Into::into).collect();
        self
    }

    /// Selects every entry of [`KNOWN_SECTORS`].
    pub fn all_sectors(self) -> Self {
        self.sectors(KNOWN_SECTORS)
    }

    pub fn between(mut self, start: Option<Quarter>, end: Option<Quarter>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn pitched(mut self, pitched: bool) -> Self {
        self.pitched = pitched;
        self
    }

    pub fn exited(mut self, exited: bool) -> Self {
        self.exited = exited;
        self
    }

    /// Only an explicit `"0"` excludes a record under the pitched/exited
    /// flags; unknown statuses are kept.
    pub fn matches(&self, record: &CompanyRecord) -> bool {
        if !self.sectors.is_empty() && !self.sectors.contains(&record.sector) {
            return false;
        }
        if !record.date.within(self.start.as_ref(), self.end.as_ref()) {
            return false;
        }
        if self.pitched && record.position_open.is_no() {
            return false;
        }
        if self.exited && record.position_close.is_no() {
            return false;
        }
        true
    }
}

/// Keeps the records accepted by `filter`, in their original order.
pub fn filter_records(records: &[CompanyRecord], filter: &CompanyFilter) -> Vec<CompanyRecord> {
    let kept: Vec<CompanyRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    debug!("Company filter kept {} of {} records", kept.len(), records.len());
    kept
}

/// Fund pickers offer display names (see
/// [`unique_fund_names`](crate::aggregate::unique_fund_names)), so stored
/// names are compared without their `", LP"` suffix.
fn is_fund(stored: &str, selected: &str) -> bool {
    display_fund_name(stored) == display_fund_name(selected)
}

fn in_funds(funds: &[String], stored: &str) -> bool {
    funds.is_empty() || funds.iter().any(|fund| is_fund(stored, fund))
}

/// Performance rows for the given funds (all funds when `funds` is empty)
/// within the inclusive quarter bounds.
pub fn filter_performance<'a>(
    records: &'a [PerformanceRecord],
    funds: &[String],
    start: Option<&Quarter>,
    end: Option<&Quarter>,
) -> Vec<&'a PerformanceRecord> {
    records
        .iter()
        .filter(|r| in_funds(funds, &r.fund_name))
        .filter(|r| r.date.within(start, end))
        .collect()
}

/// The positioning commentary of the first row for `fund` in `quarter`, or
/// an empty string.
pub fn positioning_for<'a>(records: &'a [PerformanceRecord], fund: &str, quarter: &Quarter) -> &'a str {
    records
        .iter()
        .find(|r| is_fund(&r.fund_name, fund) && &r.date == quarter)
        .and_then(|r| r.portfolio_positioning.as_deref())
        .unwrap_or("")
}

/// Letters whose `kind` themes mention any of `themes` (substring match),
/// within the quarter bounds and restricted to `funds` when any are given.
pub fn filter_by_themes<'a>(
    records: &'a [GeneralInsightRecord],
    kind: ThemeKind,
    themes: &[String],
    start: Option<&Quarter>,
    end: Option<&Quarter>,
    funds: &[String],
) -> Vec<&'a GeneralInsightRecord> {
    records
        .iter()
        .filter(|r| {
            let listed = r.themes(kind).unwrap_or("");
            themes.iter().any(|theme| listed.contains(theme.as_str()))
        })
        .filter(|r| r.date.within(start, end))
        .filter(|r| in_funds(funds, &r.fund_name))
        .collect()
}

/// Reporting history of one venture fund, in stored order.
pub fn filter_vc_performance<'a>(records: &'a [VcPerformanceRecord], fund: &str) -> Vec<&'a VcPerformanceRecord> {
    records.iter().filter(|r| is_fund(&r.fund_name, fund)).collect()
}

/// Invested amount ranges, in millions of USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountBucket {
    UnderOne,
    OneToTen,
    OverTen,
}

impl AmountBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::UnderOne => "<$1m",
            Self::OneToTen => "$1m-$10m",
            Self::OverTen => ">$10m",
        }
    }

    pub fn contains(self, millions: f64) -> bool {
        match self {
            Self::UnderOne => millions < 1.0,
            Self::OneToTen => (1.0..=10.0).contains(&millions),
            Self::OverTen => millions > 10.0,
        }
    }
}

/// Filters for the venture investment table. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentFilter {
    pub investment_type: Option<String>,
    pub amount: Option<AmountBucket>,
    pub fair_value: Option<String>,
}

impl InvestmentFilter {
    /// An investment whose amount does not parse never falls in a bucket.
    pub fn matches(&self, record: &InvestmentRecord) -> bool {
        if let Some(kind) = &self.investment_type {
            if &record.investment_type != kind {
                return false;
            }
        }
        if let Some(bucket) = self.amount {
            match record.amount_millions() {
                Some(millions) if bucket.contains(millions) => {}
                _ => return false,
            }
        }
        if let Some(value) = &self.fair_value {
            if record.fair_value.as_ref() != Some(value) {
                return false;
            }
        }
        true
    }
}

pub fn filter_investments<'a>(
    records: &'a [InvestmentRecord],
    filter: &InvestmentFilter,
) -> Vec<&'a InvestmentRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}
