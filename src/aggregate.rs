use crate::filter::{filter_records, CompanyFilter};
use crate::quarter::Quarter;
use crate::schema::{CompanyRecord, GeneralInsightRecord, InvestmentRecord, PerformanceRecord, ThemeKind};
use crate::utils::{display_fund_name, parse_numeric};
use log::debug;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_TOP_SECTORS: usize = 3;
pub const DEFAULT_TOP_N: usize = 5;

/// Applies `filter` to each fund's records and concatenates the results,
/// fund by fund in the order given.
pub fn aggregate(funds: &[(String, Vec<CompanyRecord>)], filter: &CompanyFilter) -> Vec<CompanyRecord> {
    funds
        .iter()
        .flat_map(|(fund, records)| {
            let kept = filter_records(records, filter);
            debug!("{}: {} matching companies", fund, kept.len());
            kept
        })
        .collect()
}

/// The `n` most frequent sectors with their counts, most frequent first.
/// Equal counts keep the order in which the sectors were first seen.
pub fn top_sectors(records: &[CompanyRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index.get(record.sector.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(record.sector.as_str(), counts.len());
                counts.push((record.sector.clone(), 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Ranking key shared by [`best_by`] and [`top_n_by_numeric`]: anything that
/// fails to parse ranks below every parsed value.
fn rank_key<T>(record: &T, field: &impl Fn(&T) -> Option<&str>) -> Option<f64> {
    field(record).and_then(parse_numeric)
}

/// The record with the largest parsed `field`. Records whose field does not
/// parse are skipped; `None` when nothing parses. The first record wins ties.
pub fn best_by<'a, T, F>(records: &'a [T], field: F) -> Option<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut best: Option<(&'a T, f64)> = None;
    for record in records {
        if let Some(value) = rank_key(record, &field) {
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((record, value));
            }
        }
    }
    best.map(|(record, _)| record)
}

/// Best quarter by net performance across the given rows.
pub fn best_performer(records: &[PerformanceRecord]) -> Option<&PerformanceRecord> {
    best_by(records, |r| r.net_performance.as_deref())
}

/// The first `n` records ordered by parsed `field`. Unparseable values are
/// kept but always sort after parsed ones, in either direction. Equal values
/// keep their input order.
pub fn top_n_by_numeric<'a, T, F>(records: &'a [T], field: F, n: usize, descending: bool) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    let mut keyed: Vec<(Option<f64>, &'a T)> = records
        .iter()
        .map(|record| (rank_key(record, &field), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(y).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().take(n).map(|(_, record)| record).collect()
}

/// Distinct fund names with any `", LP"` suffix removed, sorted.
pub fn unique_fund_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(display_fund_name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct quarters reported by `fund`, matched by display name.
pub fn available_quarters(records: &[GeneralInsightRecord], fund: &str) -> Vec<Quarter> {
    let fund = display_fund_name(fund);
    records
        .iter()
        .filter(|r| display_fund_name(&r.fund_name) == fund)
        .map(|r| r.date.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct themes of `kind`; each record lists them comma separated.
pub fn unique_themes(records: &[GeneralInsightRecord], kind: ThemeKind) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.themes(kind))
        .flat_map(|listed| listed.split(", "))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct investment types, for the type picker.
pub fn investment_types(records: &[InvestmentRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.investment_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct fair value labels, for the fair value picker.
pub fn fair_values(records: &[InvestmentRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.fair_value.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TriState;
    use std::collections::BTreeMap;

    fn company(sector: &str, date: &str) -> CompanyRecord {
        CompanyRecord {
            fund_name: None,
            sector: sector.to_string(),
            date: Quarter::from(date),
            position_open: TriState::Unknown,
            position_close: TriState::Unknown,
            description: None,
            extra: BTreeMap::new(),
        }
    }

    fn performance(fund: &str, date: &str, value: Option<&str>) -> PerformanceRecord {
        PerformanceRecord {
            fund_name: fund.to_string(),
            date: Quarter::from(date),
            net_performance: value.map(str::to_string),
            key_contributors: None,
            key_detractors: None,
            portfolio_positioning: None,
        }
    }

    fn net(record: &PerformanceRecord) -> Option<&str> {
        record.net_performance.as_deref()
    }

    #[test]
    fn test_aggregate_preserves_fund_order() {
        let funds = vec![
            ("b".to_string(), vec![company("Energy", "2023 Q1"), company("Financials", "2023 Q2")]),
            ("a".to_string(), vec![company("Energy", "2022 Q1")]),
        ];
        let combined = aggregate(&funds, &CompanyFilter::new().sectors(["Energy"]));
        let dates: Vec<&str> = combined.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2023 Q1", "2022 Q1"]);
    }

    #[test]
    fn test_top_sectors_tie_break_first_seen() {
        let records = vec![
            company("Energy", "2023 Q1"),
            company("Financials", "2023 Q1"),
            company("Financials", "2023 Q1"),
            company("Real Estate", "2023 Q1"),
            company("Energy", "2023 Q1"),
            company("Industrials", "2023 Q1"),
        ];
        let top = top_sectors(&records, DEFAULT_TOP_SECTORS);
        assert_eq!(
            top,
            vec![
                ("Energy".to_string(), 2),
                ("Financials".to_string(), 2),
                ("Real Estate".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_sectors_empty() {
        assert!(top_sectors(&[], 3).is_empty());
    }

    #[test]
    fn test_best_performer_skips_garbage() {
        let rows = vec![
            performance("A", "2023 Q1", Some("abc")),
            performance("B", "2023 Q1", Some("4.0")),
            performance("C", "2023 Q2", Some("7.5")),
            performance("D", "2023 Q2", Some("7.5")),
        ];
        assert_eq!(best_performer(&rows).map(|r| r.fund_name.as_str()), Some("C"));
    }

    #[test]
    fn test_best_performer_empty() {
        let rows = vec![performance("A", "2023 Q1", Some("n/a")), performance("B", "2023 Q1", None)];
        assert!(best_performer(&rows).is_none());
    }

    #[test]
    fn test_top_n_unparseable_last_both_directions() {
        let rows = vec![
            performance("A", "2023 Q1", Some("n/a")),
            performance("B", "2023 Q1", Some("2.0")),
            performance("C", "2023 Q1", Some("-1.0")),
            performance("D", "2023 Q1", Some("9%")),
        ];
        let desc: Vec<&str> = top_n_by_numeric(&rows, net, 5, true)
            .iter()
            .map(|r| r.fund_name.as_str())
            .collect();
        assert_eq!(desc, vec!["D", "B", "C", "A"]);

        let asc: Vec<&str> = top_n_by_numeric(&rows, net, 3, false)
            .iter()
            .map(|r| r.fund_name.as_str())
            .collect();
        assert_eq!(asc, vec!["C", "B", "D"]);
    }

    #[test]
    fn test_unique_fund_names() {
        let names = unique_fund_names(["Maran Capital, LP", "Greenlight Capital", "Maran Capital"]);
        assert_eq!(names, vec!["Greenlight Capital", "Maran Capital"]);
    }

    #[test]
    fn test_available_quarters_match_display_name() {
        let theme = |fund: &str, date: &str| GeneralInsightRecord {
            fund_name: fund.to_string(),
            date: Quarter::from(date),
            macro_themes: None,
            asset_classes: None,
            geographies: None,
            extra: BTreeMap::new(),
        };
        let records = vec![
            theme("Maran Capital, LP", "2023 Q2"),
            theme("Maran Capital, LP", "2023 Q1"),
            theme("Greenlight Capital", "2022 Q4"),
            theme("Maran Capital, LP", "2023 Q2"),
        ];
        let quarters = available_quarters(&records, "Maran Capital");
        assert_eq!(quarters, vec![Quarter::from("2023 Q1"), Quarter::from("2023 Q2")]);
    }
}
