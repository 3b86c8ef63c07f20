use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
/// Organisational or catalog axis used to break down rentability.
pub enum Dimension {
    CostCenter,
    Seller,
    Store,
    Product,
    Channel,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::CostCenter,
        Dimension::Seller,
        Dimension::Store,
        Dimension::Product,
        Dimension::Channel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::CostCenter => "cost_center",
            Dimension::Seller => "seller",
            Dimension::Store => "store",
            Dimension::Product => "product",
            Dimension::Channel => "channel",
        }
    }

    /// Dimensions whose cardinality is open-ended get truncated to a top-N.
    pub fn is_unbounded(self) -> bool {
        matches!(self, Dimension::Product)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDimension {
    pub input: String,
    pub suggestion: Option<&'static str>,
}

impl fmt::Display for UnknownDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dimension `{}`", self.input)?;
        if let Some(suggestion) = self.suggestion {
            write!(f, " (did you mean `{suggestion}`?)")?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownDimension {}

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if let Some(dimension) = Dimension::ALL.into_iter().find(|d| d.as_str() == key) {
            return Ok(dimension);
        }
        let suggestion = Dimension::ALL
            .into_iter()
            .map(|d| (d.as_str(), strsim::jaro_winkler(d.as_str(), &key)))
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name);
        Err(UnknownDimension {
            input: s.to_string(),
            suggestion,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Display catalogs keyed by dimension.
pub type DimensionCatalogs = BTreeMap<Dimension, Vec<CatalogEntry>>;
