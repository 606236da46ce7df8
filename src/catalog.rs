use crate::aggregate::unique_fund_names;
use crate::config::StorageConfig;
use crate::corpus::{build_tagged_corpus, FundIdentifier};
use crate::error::{InsightError, Result};
use crate::schema::{
    decode_records, CompanyRecord, GeneralInsightRecord, InsightRecord, InvestmentRecord,
    PerformanceRecord, VcPerformanceRecord,
};
use crate::store::{keys, RecordStore};
use log::{debug, info, warn};

/// A partner letter together with the identifier it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    pub identifier: FundIdentifier,
    pub text: String,
}

/// Tagged corpus over letters that were actually found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterCorpus {
    pub included: Vec<FundIdentifier>,
    pub corpus: String,
}

/// Fetches and decodes the insight tables and letters.
///
/// Missing objects are logged and treated as empty; every other storage or
/// decoding error is returned to the caller. Nothing is retried.
pub struct InsightCatalog<S> {
    store: S,
    hedge_fund_container: String,
    venture_container: String,
}

impl<S: RecordStore> InsightCatalog<S> {
    pub fn new(store: S, config: &StorageConfig) -> Self {
        Self {
            store,
            hedge_fund_container: config.hedge_fund_container.clone(),
            venture_container: config.venture_container.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn fetch_optional(&self, container: &str, key: &str) -> Result<Option<String>> {
        match self.store.fetch(container, key) {
            Ok(body) => Ok(Some(body)),
            Err(InsightError::NotFound { container, key }) => {
                warn!("Object not found: {}/{}", container, key);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn fetch_table<T: InsightRecord>(&self, container: &str, key: &str) -> Result<Vec<T>> {
        match self.fetch_optional(container, key)? {
            Some(json) => {
                let records: Vec<T> = decode_records(&json)?;
                debug!("Decoded {} records from {}/{}", records.len(), container, key);
                Ok(records)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Equity records for one hedge fund, by name or slug.
    pub fn company_records(&self, fund: &str) -> Result<Vec<CompanyRecord>> {
        self.fetch_table(&self.hedge_fund_container, &keys::equities(fund))
    }

    /// Equity records per fund, in the order given, ready for
    /// [`aggregate`](crate::aggregate::aggregate).
    pub fn companies_by_fund(&self, funds: &[String]) -> Result<Vec<(String, Vec<CompanyRecord>)>> {
        funds
            .iter()
            .map(|fund| Ok((fund.clone(), self.company_records(fund)?)))
            .collect()
    }

    pub fn performance_records(&self) -> Result<Vec<PerformanceRecord>> {
        self.fetch_table(&self.hedge_fund_container, keys::PERFORMANCE_INSIGHTS)
    }

    pub fn general_insights(&self) -> Result<Vec<GeneralInsightRecord>> {
        self.fetch_table(&self.hedge_fund_container, keys::GENERAL_INSIGHTS)
    }

    pub fn venture_performance(&self) -> Result<Vec<VcPerformanceRecord>> {
        self.fetch_table(&self.venture_container, keys::VC_PERFORMANCE_INSIGHTS)
    }

    /// Investments of every selected venture fund, concatenated in order.
    pub fn venture_investments(&self, funds: &[String]) -> Result<Vec<InvestmentRecord>> {
        let mut investments = Vec::new();
        for fund in funds {
            investments.extend(self.fetch_table::<InvestmentRecord>(
                &self.venture_container,
                &keys::venture_investments(fund),
            )?);
        }
        Ok(investments)
    }

    pub fn hedge_fund_names(&self) -> Result<Vec<String>> {
        let records = self.general_insights()?;
        Ok(unique_fund_names(records.iter().map(|r| r.fund_name.as_str())))
    }

    pub fn venture_fund_names(&self) -> Result<Vec<String>> {
        let records = self.venture_performance()?;
        Ok(unique_fund_names(records.iter().map(|r| r.fund_name.as_str())))
    }

    /// Hedge fund letters for `identifiers`; letters that are missing are
    /// skipped, so the result may be shorter than the input.
    pub fn partner_letters(&self, identifiers: &[FundIdentifier]) -> Result<Vec<Letter>> {
        let mut letters = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            if let Some(text) = self.fetch_optional(&self.hedge_fund_container, &keys::letter(identifier))? {
                letters.push(Letter {
                    identifier: identifier.clone(),
                    text,
                });
            }
        }
        info!("Fetched {} of {} partner letters", letters.len(), identifiers.len());
        Ok(letters)
    }

    pub fn venture_letter(&self, identifier: &FundIdentifier) -> Result<Option<Letter>> {
        Ok(self
            .fetch_optional(&self.venture_container, &keys::venture_letter(identifier))?
            .map(|text| Letter {
                identifier: identifier.clone(),
                text,
            }))
    }

    /// Fetches the letters and tags each with its own identifier.
    pub fn letter_corpus(&self, identifiers: &[FundIdentifier]) -> Result<LetterCorpus> {
        let letters = self.partner_letters(identifiers)?;
        corpus_from_letters(&letters)
    }
}

pub fn corpus_from_letters(letters: &[Letter]) -> Result<LetterCorpus> {
    let documents: Vec<&str> = letters.iter().map(|l| l.text.as_str()).collect();
    let identifiers: Vec<String> = letters.iter().map(|l| l.identifier.to_string()).collect();
    Ok(LetterCorpus {
        corpus: build_tagged_corpus(&documents, &identifiers)?,
        included: letters.iter().map(|l| l.identifier.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn catalog(store: MemoryStore) -> InsightCatalog<MemoryStore> {
        InsightCatalog::new(store, &StorageConfig::default())
    }

    #[test]
    fn test_missing_table_is_empty() {
        let catalog = catalog(MemoryStore::new());
        assert!(catalog.company_records("Greenlight Capital").unwrap().is_empty());
        assert!(catalog.performance_records().unwrap().is_empty());
    }

    #[test]
    fn test_decode_error_propagates() {
        let store = MemoryStore::new().with("hedgefunds", keys::PERFORMANCE_INSIGHTS, r#"[{"Date": "2023 Q1"}]"#);
        let err = catalog(store).performance_records().unwrap_err();
        assert!(matches!(err, InsightError::FieldMissing { index: 0, .. }));
    }

    #[test]
    fn test_missing_letters_are_skipped_with_their_identifiers() {
        let q1 = FundIdentifier::parse("Greenlight Capital 2023 Q1").unwrap();
        let q2 = FundIdentifier::parse("Greenlight Capital 2023 Q2").unwrap();
        let store = MemoryStore::new().with("hedgefunds", keys::letter(&q2), "second quarter");

        let corpus = catalog(store).letter_corpus(&[q1, q2.clone()]).unwrap();
        assert_eq!(corpus.included, vec![q2]);
        assert_eq!(
            corpus.corpus,
            "<greenlightcapital_2023_q2>\nsecond quarter\n</greenlightcapital_2023_q2>"
        );
    }
}
