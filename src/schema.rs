use crate::error::{InsightError, Result};
use crate::quarter::Quarter;
use crate::utils::parse_numeric;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A stored `"1"` / `"0"` flag. A missing key is `Unknown`; any other label
/// is kept verbatim as `Other` and, like `Unknown`, never counts as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TriState {
    Yes,
    No,
    Other(String),
    #[default]
    Unknown,
}

impl TriState {
    pub fn from_label(label: &str) -> Self {
        match label {
            "1" => Self::Yes,
            "0" => Self::No,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_no(&self) -> bool {
        *self == Self::No
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Yes => serializer.serialize_str("1"),
            Self::No => serializer.serialize_str("0"),
            Self::Other(label) => serializer.serialize_str(label),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match value_as_string(Value::deserialize(deserializer)?) {
            Some(label) => Self::from_label(&label),
            None => Self::Unknown,
        })
    }
}

/// Insight tables are produced upstream and are loose about types: a number
/// may be stored as `"5.2"`, `5.2` or `null`.
fn value_as_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(if b { "1" } else { "0" }.to_string()),
        other => Some(other.to_string()),
    }
}

fn loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_as_string))
}

/// Implemented by every record type decoded from an insight table.
pub trait InsightRecord: DeserializeOwned {
    /// Keys that must be present and non-null in every stored object.
    const REQUIRED_FIELDS: &'static [&'static str];
}

/// Decodes a JSON array of records, checking required keys first so that a
/// malformed record is reported as [`InsightError::FieldMissing`] with its
/// position.
pub fn decode_records<T: InsightRecord>(json: &str) -> Result<Vec<T>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if let Some(field) = T::REQUIRED_FIELDS
                .iter()
                .find(|field| value.get(**field).map_or(true, Value::is_null))
            {
                return Err(InsightError::FieldMissing {
                    index,
                    field: field.to_string(),
                });
            }
            Ok(serde_json::from_value(value)?)
        })
        .collect()
}

/// Pretty JSON Schema for a record type, to hand to the extraction step that
/// produces the insight tables.
pub fn record_schema<T: JsonSchema>() -> Result<String> {
    let schema = schemars::schema_for!(T);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// An equity position discussed in a hedge fund letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyRecord {
    #[serde(rename = "Fund Name", default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "The fund whose letter discussed the company")]
    pub fund_name: Option<String>,

    #[serde(rename = "Sector")]
    #[schemars(description = "GICS-style sector, e.g. 'Financials' or 'Health Care'")]
    pub sector: String,

    #[serde(rename = "Date")]
    #[schemars(description = "Quarter of the letter, formatted '<year> Q<n>'")]
    pub date: Quarter,

    #[serde(rename = "PositionOpen", default)]
    #[schemars(with = "Option<String>", description = "'1' if the position was opened in this quarter, '0' if not")]
    pub position_open: TriState,

    #[serde(rename = "PositionClose", default)]
    #[schemars(with = "Option<String>", description = "'1' if the position was exited in this quarter, '0' if not")]
    pub position_close: TriState,

    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: BTreeMap<String, Value>,
}

impl InsightRecord for CompanyRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &["Sector", "Date"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceTopic {
    KeyContributors,
    KeyDetractors,
    PortfolioPositioning,
}

impl PerformanceTopic {
    pub const ALL: [PerformanceTopic; 3] = [
        Self::KeyContributors,
        Self::KeyDetractors,
        Self::PortfolioPositioning,
    ];

    /// The insight table column this topic reads from.
    pub fn label(self) -> &'static str {
        match self {
            Self::KeyContributors => "Key Contributors to Performance",
            Self::KeyDetractors => "Key Detractors from Performance",
            Self::PortfolioPositioning => "Portfolio Positioning and Adjustments",
        }
    }
}

/// One fund-quarter row of `hedgefund_performance_insights.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceRecord {
    #[serde(rename = "Fund Name")]
    pub fund_name: String,

    #[serde(rename = "Date")]
    pub date: Quarter,

    #[serde(
        rename = "Quarterly Performance Net of Fees",
        default,
        deserialize_with = "loose_string"
    )]
    #[schemars(description = "Net quarterly return in percent, e.g. '5.2'")]
    pub net_performance: Option<String>,

    #[serde(rename = "Key Contributors to Performance", default)]
    pub key_contributors: Option<String>,

    #[serde(rename = "Key Detractors from Performance", default)]
    pub key_detractors: Option<String>,

    #[serde(rename = "Portfolio Positioning and Adjustments", default)]
    pub portfolio_positioning: Option<String>,
}

impl PerformanceRecord {
    pub fn insight(&self, topic: PerformanceTopic) -> Option<&str> {
        match topic {
            PerformanceTopic::KeyContributors => self.key_contributors.as_deref(),
            PerformanceTopic::KeyDetractors => self.key_detractors.as_deref(),
            PerformanceTopic::PortfolioPositioning => self.portfolio_positioning.as_deref(),
        }
    }

    pub fn net_performance_value(&self) -> Option<f64> {
        self.net_performance.as_deref().and_then(parse_numeric)
    }
}

impl InsightRecord for PerformanceRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &["Fund Name", "Date"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    Macro,
    AssetClass,
    Geography,
}

impl ThemeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Macro => "Market Commentary",
            Self::AssetClass => "Asset Class",
            Self::Geography => "Geography",
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            Self::Macro => "Macro",
            Self::AssetClass => "Asset Classes",
            Self::Geography => "Geographies",
        }
    }
}

/// One fund-quarter row of `hedgefund_general_insights.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeneralInsightRecord {
    #[serde(rename = "Fund Name")]
    pub fund_name: String,

    #[serde(rename = "Date")]
    pub date: Quarter,

    #[serde(rename = "Macro", default)]
    #[schemars(description = "Comma separated macro themes, e.g. 'Inflation, Interest Rates'")]
    pub macro_themes: Option<String>,

    #[serde(rename = "Asset Classes", default)]
    pub asset_classes: Option<String>,

    #[serde(rename = "Geographies", default)]
    pub geographies: Option<String>,

    #[serde(flatten)]
    #[schemars(skip)]
    pub extra: BTreeMap<String, Value>,
}

impl GeneralInsightRecord {
    pub fn themes(&self, kind: ThemeKind) -> Option<&str> {
        match kind {
            ThemeKind::Macro => self.macro_themes.as_deref(),
            ThemeKind::AssetClass => self.asset_classes.as_deref(),
            ThemeKind::Geography => self.geographies.as_deref(),
        }
    }

    /// `"<fund name> <quarter>"`, the identifier used to locate the letter.
    pub fn identifier(&self) -> String {
        format!("{} {}", self.fund_name, self.date)
    }
}

impl InsightRecord for GeneralInsightRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &["Fund Name", "Date"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcSection {
    Commentary,
    KeyContributors,
    KeyDetractors,
    PortfolioPositioning,
}

impl VcSection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Commentary => "Commentary on Fund Performance",
            Self::KeyContributors => "Key Contributors to Performance",
            Self::KeyDetractors => "Key Detractors from Performance",
            Self::PortfolioPositioning => "Portfolio Positioning and Adjustments",
        }
    }
}

/// One fund-quarter row of `vc_performance_insights.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VcPerformanceRecord {
    #[serde(rename = "Fund Name")]
    pub fund_name: String,

    #[serde(rename = "Date")]
    pub date: Quarter,

    #[serde(rename = "Net IRR", default, deserialize_with = "loose_string")]
    pub net_irr: Option<String>,

    #[serde(
        rename = "Percentage Capital Commitments Called",
        default,
        deserialize_with = "loose_string"
    )]
    pub capital_called: Option<String>,

    #[serde(rename = "Commentary on Fund Performance", default)]
    pub commentary: Option<String>,

    #[serde(rename = "Key Contributors to Performance", default)]
    pub key_contributors: Option<String>,

    #[serde(rename = "Key Detractors from Performance", default)]
    pub key_detractors: Option<String>,

    #[serde(rename = "Portfolio Positioning and Adjustments", default)]
    pub portfolio_positioning: Option<String>,
}

impl VcPerformanceRecord {
    pub fn section(&self, section: VcSection) -> Option<&str> {
        match section {
            VcSection::Commentary => self.commentary.as_deref(),
            VcSection::KeyContributors => self.key_contributors.as_deref(),
            VcSection::KeyDetractors => self.key_detractors.as_deref(),
            VcSection::PortfolioPositioning => self.portfolio_positioning.as_deref(),
        }
    }
}

impl InsightRecord for VcPerformanceRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &["Fund Name", "Date"];
}

/// A venture investment disclosed in a VC letter. Amounts are in millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvestmentRecord {
    #[serde(rename = "Fund")]
    pub fund: String,

    #[serde(rename = "Date")]
    pub date: Quarter,

    #[serde(rename = "Company")]
    pub company: String,

    #[serde(rename = "Type of Investment")]
    pub investment_type: String,

    #[serde(rename = "Amount Invested", default, deserialize_with = "loose_string")]
    #[schemars(description = "Amount invested in millions of USD")]
    pub amount_invested: Option<String>,

    #[serde(rename = "Date invested", default, deserialize_with = "loose_string")]
    pub date_invested: Option<String>,

    #[serde(
        rename = "Fair Value of the Investment",
        default,
        deserialize_with = "loose_string"
    )]
    pub fair_value: Option<String>,

    #[serde(rename = "Summary", default)]
    pub summary: Option<String>,
}

impl InvestmentRecord {
    pub fn amount_millions(&self) -> Option<f64> {
        self.amount_invested.as_deref().and_then(parse_numeric)
    }
}

impl InsightRecord for InvestmentRecord {
    const REQUIRED_FIELDS: &'static [&'static str] = &[
        "Fund",
        "Date",
        "Company",
        "Type of Investment",
        "Amount Invested",
    ];
}
