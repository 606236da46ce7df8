use crate::error::{InsightError, Result};
use crate::quarter::Quarter;
use crate::schema::{PerformanceRecord, PerformanceTopic};
use crate::utils::fund_slug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `"<fund name> <year> Q<n>"` identifier, e.g. `"Greenlight Capital 2023 Q4"`.
///
/// The two trailing tokens may also appear as `"Q<n> <year>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FundIdentifier {
    pub fund_name: String,
    pub quarter: Quarter,
}

impl FundIdentifier {
    pub fn new(fund_name: impl Into<String>, quarter: Quarter) -> Self {
        Self {
            fund_name: fund_name.into(),
            quarter,
        }
    }

    pub fn parse(identifier: &str) -> Result<Self> {
        let malformed = || InsightError::MalformedIdentifier(identifier.to_string());

        let tokens: Vec<&str> = identifier.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(malformed());
        }
        let (name, tail) = tokens.split_at(tokens.len() - 2);

        let quarter = Quarter::parse(&format!("{} {}", tail[0], tail[1]))
            .or_else(|_| Quarter::parse(&format!("{} {}", tail[1], tail[0])))
            .map_err(|_| malformed())?;

        Ok(Self {
            fund_name: name.join(" "),
            quarter,
        })
    }

    /// `greenlightcapital_2023_q4` for `"Greenlight Capital 2023 Q4"`. Commas
    /// are dropped so `"Foo Ventures, LP"` still yields a valid tag name.
    pub fn tag(&self) -> String {
        let mut parts = self.quarter.as_str().split(' ');
        let year = parts.next().unwrap_or_default();
        let quarter = parts.next().unwrap_or_default().to_lowercase();
        format!("{}_{}_{}", fund_slug(&self.fund_name).replace(',', ""), year, quarter)
    }
}

impl fmt::Display for FundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.fund_name, self.quarter)
    }
}

/// Wraps one letter in its opening and closing tag, each on its own line.
pub fn tag_document(document: &str, identifier: &str) -> Result<String> {
    let tag = FundIdentifier::parse(identifier)?.tag();
    Ok(format!("<{tag}>\n{document}\n</{tag}>"))
}

/// Tags every document with the identifier at the same position and joins
/// them with a blank line, in input order.
pub fn build_tagged_corpus<D, I>(documents: &[D], identifiers: &[I]) -> Result<String>
where
    D: AsRef<str>,
    I: AsRef<str>,
{
    if documents.len() != identifiers.len() {
        return Err(InsightError::MalformedIdentifier(format!(
            "{} documents but {} identifiers",
            documents.len(),
            identifiers.len()
        )));
    }

    let tagged = documents
        .iter()
        .zip(identifiers)
        .map(|(document, identifier)| tag_document(document.as_ref(), identifier.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    Ok(tagged.join("\n\n"))
}

/// `"[Fund, Quarter]\n<insight>"` blocks for one performance topic, joined by
/// blank lines. Rows without that insight contribute an empty body.
pub fn insight_digest<'a, R>(records: R, topic: PerformanceTopic) -> String
where
    R: IntoIterator<Item = &'a PerformanceRecord>,
{
    records
        .into_iter()
        .map(|r| format!("[{}, {}]\n{}", r.fund_name, r.date, r.insight(topic).unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Everything sent to the model for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBundle {
    pub instruction: String,
    pub system: String,
    pub corpus: String,
}

impl PromptBundle {
    pub fn new(instruction: impl Into<String>, system: impl Into<String>, corpus: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            system: system.into(),
            corpus: corpus.into(),
        }
    }

    /// The documents followed by the instruction.
    pub fn user_message(&self) -> String {
        format!("{}\n\n{}", self.corpus, self.instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_document_corpus() {
        let corpus = build_tagged_corpus(&["doc1"], &["Greenlight Capital 2023 Q4"]).unwrap();
        assert_eq!(corpus, "<greenlightcapital_2023_q4>\ndoc1\n</greenlightcapital_2023_q4>");
    }

    #[test]
    fn test_corpus_joins_with_blank_line() {
        let corpus = build_tagged_corpus(
            &["first", "second"],
            &["Maran Capital Management 2023 Q1", "OKeefe Stevens Q2 2023"],
        )
        .unwrap();
        assert_eq!(
            corpus,
            "<marancapitalmanagement_2023_q1>\nfirst\n</marancapitalmanagement_2023_q1>\n\n\
             <okeefestevens_2023_q2>\nsecond\n</okeefestevens_2023_q2>"
        );
    }

    #[test]
    fn test_malformed_identifiers() {
        for bad in ["2023 Q4", "Greenlight Capital", "Greenlight Capital 2023", "Fund 2023 fourth"] {
            let err = FundIdentifier::parse(bad).unwrap_err();
            assert!(matches!(err, InsightError::MalformedIdentifier(_)), "{}", bad);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let err = build_tagged_corpus(&["a", "b"], &["Fund 2023 Q1"]).unwrap_err();
        assert!(matches!(err, InsightError::MalformedIdentifier(_)));
    }

    #[test]
    fn test_identifier_display_round_trips_quarter_order() {
        let id = FundIdentifier::parse("White Brook Capital q3 2022").unwrap();
        assert_eq!(id.fund_name, "White Brook Capital");
        assert_eq!(id.to_string(), "White Brook Capital 2022 Q3");
    }

    #[test]
    fn test_tag_drops_commas() {
        let id = FundIdentifier::parse("Foo Ventures, LP 2023 Q4").unwrap();
        assert_eq!(id.fund_name, "Foo Ventures, LP");
        assert_eq!(id.tag(), "fooventureslp_2023_q4");

        let corpus = build_tagged_corpus(&["letter"], &["Foo Ventures, LP Q4 2023"]).unwrap();
        assert_eq!(corpus, "<fooventureslp_2023_q4>\nletter\n</fooventureslp_2023_q4>");
    }

    #[test]
    fn test_insight_digest() {
        let rows = vec![
            PerformanceRecord {
                fund_name: "A".to_string(),
                date: Quarter::from("2023 Q1"),
                net_performance: None,
                key_contributors: Some("Energy names".to_string()),
                key_detractors: None,
                portfolio_positioning: None,
            },
            PerformanceRecord {
                fund_name: "B".to_string(),
                date: Quarter::from("2023 Q2"),
                net_performance: None,
                key_contributors: None,
                key_detractors: None,
                portfolio_positioning: None,
            },
        ];
        let digest = insight_digest(&rows, PerformanceTopic::KeyContributors);
        assert_eq!(digest, "[A, 2023 Q1]\nEnergy names\n\n[B, 2023 Q2]\n");
    }

    #[test]
    fn test_user_message() {
        let bundle = PromptBundle::new("Summarise.", "You are an analyst.", "<a>\nx\n</a>");
        assert_eq!(bundle.user_message(), "<a>\nx\n</a>\n\nSummarise.");
    }
}
