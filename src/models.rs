use chrono::{DateTime, Utc};
use polars::frame::DataFrame;
use serde::Serialize;

pub const SEGMENT: &str = "Segment";
pub const COUNTRY: &str = "Country";
pub const SALES: &str = "Sales";
pub const UNITS_SOLD: &str = "Units Sold";
pub const PROFIT: &str = "Profit";

/// One loaded sheet. Rows are immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub frame: DataFrame,
    pub sheet_name: String,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(frame: DataFrame, sheet_name: impl Into<String>) -> Self {
        Self {
            frame,
            sheet_name: sheet_name.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Exact, case- and space-sensitive lookup.
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_names().iter().any(|c| *c == name)
    }

    pub fn missing_columns<'a>(&self, required: &[&'a str]) -> Vec<&'a str> {
        required
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: String,
    pub profit: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub rows: Vec<SegmentSummary>,
    pub total_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySalesSummary {
    pub country: String,
    pub sales: f64,
    pub units_sold: f64,
    pub bubble_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryProfitSummary {
    pub country: String,
    pub profit: f64,
    pub bubble_size: f64,
}

/// A dashboard section either has data or a notice explaining why it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Skipped { notice: String },
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready { data } => Some(data),
            Section::Skipped { .. } => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Section::Ready { .. } => None,
            Section::Skipped { notice } => Some(notice),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryMaps {
    pub sales: Vec<CountrySalesSummary>,
    pub profit: Section<Vec<CountryProfitSummary>>,
}

/// View model of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub sheet_name: String,
    pub loaded_at: DateTime<Utc>,
    pub row_count: usize,
    pub segments: Section<SegmentReport>,
    pub country_maps: Section<CountryMaps>,
}
