//! Tabular shapes handed to the presentation layer.

use crate::aggregate::top_n_by_numeric;
use crate::error::Result;
use crate::quarter::Quarter;
use crate::schema::{CompanyRecord, InvestmentRecord, PerformanceRecord, VcPerformanceRecord};
use crate::utils::{format_percentage, format_usd, parse_numeric};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Borrow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRow {
    #[serde(rename = "Fund Name")]
    pub fund_name: String,
    #[serde(rename = "Date")]
    pub date: Quarter,
    #[serde(rename = "Quarterly Performance Net of Fees")]
    pub net_performance: String,
}

/// The `n` best fund-quarters by net performance, formatted as percentages.
/// Rows whose performance is not a number are listed last, verbatim.
pub fn performance_table<T: Borrow<PerformanceRecord>>(records: &[T], n: usize) -> Vec<PerformanceRow> {
    let top = top_n_by_numeric(
        records,
        |r| <T as Borrow<PerformanceRecord>>::borrow(r).net_performance.as_deref(),
        n,
        true,
    );
    top.into_iter()
        .map(|r| {
            let r = <T as Borrow<PerformanceRecord>>::borrow(r);
            PerformanceRow {
                fund_name: r.fund_name.clone(),
                date: r.date.clone(),
                net_performance: format_percentage(r.net_performance.as_deref().unwrap_or("")),
            }
        })
        .collect()
}

/// One point per row for a performance line chart; gaps are `None`.
pub fn performance_series<T: Borrow<PerformanceRecord>>(records: &[T]) -> Vec<(Quarter, Option<f64>)> {
    records
        .iter()
        .map(|r| {
            let r = <T as Borrow<PerformanceRecord>>::borrow(r);
            (r.date.clone(), r.net_performance.as_deref().and_then(parse_numeric))
        })
        .collect()
}

/// Company records as JSON objects without the long `Description` column.
pub fn company_table(records: &[CompanyRecord]) -> Result<Vec<Map<String, Value>>> {
    records
        .iter()
        .map(|record| {
            let mut row = match serde_json::to_value(record)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            row.remove("Description");
            Ok(row)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentRow {
    #[serde(rename = "Fund")]
    pub fund: String,
    #[serde(rename = "Date")]
    pub date: Quarter,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Type of Investment")]
    pub investment_type: String,
    #[serde(rename = "Amount Invested")]
    pub amount_invested: String,
    #[serde(rename = "Date invested")]
    pub date_invested: String,
    #[serde(rename = "Fair Value of the Investment")]
    pub fair_value: String,
    #[serde(rename = "Summary")]
    pub summary: String,
}

/// Venture investments with amounts rendered as dollars. Amounts that do
/// not parse are shown as stored.
pub fn investment_table<T: Borrow<InvestmentRecord>>(records: &[T]) -> Vec<InvestmentRow> {
    records
        .iter()
        .map(|r| {
            let r = <T as Borrow<InvestmentRecord>>::borrow(r);
            InvestmentRow {
                fund: r.fund.clone(),
                date: r.date.clone(),
                company: r.company.clone(),
                investment_type: r.investment_type.clone(),
                amount_invested: match r.amount_millions() {
                    Some(amount) => format_usd(amount),
                    None => r.amount_invested.clone().unwrap_or_default(),
                },
                date_invested: r.date_invested.clone().unwrap_or_default(),
                fair_value: r.fair_value.clone().unwrap_or_default(),
                summary: r.summary.clone().unwrap_or_default(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VcPerformanceRow {
    #[serde(rename = "Date")]
    pub date: Quarter,
    #[serde(rename = "Net IRR")]
    pub net_irr: String,
    #[serde(rename = "Percentage Capital Commitments Called")]
    pub capital_called: String,
}

pub fn vc_performance_table<T: Borrow<VcPerformanceRecord>>(records: &[T]) -> Vec<VcPerformanceRow> {
    records
        .iter()
        .map(|r| {
            let r = <T as Borrow<VcPerformanceRecord>>::borrow(r);
            VcPerformanceRow {
                date: r.date.clone(),
                net_irr: r.net_irr.clone().unwrap_or_default(),
                capital_called: r.capital_called.clone().unwrap_or_default(),
            }
        })
        .collect()
}

/// `"Energy (4 mentions)"` lines for a [`top_sectors`](crate::aggregate::top_sectors) result.
pub fn sector_mentions(top: &[(String, usize)]) -> Vec<String> {
    top.iter()
        .map(|(sector, count)| format!("{} ({} mentions)", sector, count))
        .collect()
}
