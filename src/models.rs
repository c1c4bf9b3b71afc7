use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ErrorKind;

/// Precomputed complaint counts, as published under `rapport_analytique`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    #[serde(rename = "total_reclamations", default, skip_serializing_if = "Option::is_none")]
    pub total_complaints: Option<i64>,
    #[serde(rename = "par_canal", default, deserialize_with = "null_as_default")]
    pub by_channel: BTreeMap<String, i64>,
    #[serde(rename = "par_nature", default, deserialize_with = "null_as_default")]
    pub by_nature: BTreeMap<String, i64>,
    #[serde(rename = "par_gravite", default, deserialize_with = "null_as_default")]
    pub by_severity_bucket: BTreeMap<String, i64>,
}

impl AggregateReport {
    pub const FIELDS: [&'static str; 4] = [
        "total_reclamations",
        "par_canal",
        "par_nature",
        "par_gravite",
    ];

    pub fn total(&self) -> i64 {
        self.total_complaints.unwrap_or(0)
    }
}

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One raw complaint row from the `donnees` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub row_index: i64,
    #[serde(rename = "inquiry_description", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "feedback", default, deserialize_with = "null_as_default")]
    pub feedback_text: String,
    #[serde(rename = "canal", default)]
    pub channel_label: Option<String>,
    #[serde(rename = "nature", default, skip_serializing_if = "Option::is_none")]
    pub nature_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBucket {
    High,
    Medium,
    Low,
}

impl SeverityBucket {
    pub fn label(self) -> &'static str {
        match self {
            SeverityBucket::High => "Critique",
            SeverityBucket::Medium => "Moyen",
            SeverityBucket::Low => "Faible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedChannelEntry {
    pub name: String,
    #[serde(rename = "complaints")]
    pub count: i64,
    #[serde(rename = "percentage")]
    pub share_percent: f64,
    #[serde(rename = "color")]
    pub color_token: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedTypeEntry {
    pub name: String,
    pub count: i64,
    #[serde(rename = "severity")]
    pub severity_bucket: SeverityBucket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityBreakdownEntry {
    pub name: String,
    pub count: i64,
    #[serde(rename = "color")]
    pub color_token: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_complaints: i64,
    pub resolved: i64,
    pub pending: i64,
    pub avg_resolution_days: f64,
    pub satisfaction_pct: f64,
    pub growth_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceRating {
    Excellent,
    #[serde(rename = "Bon")]
    Good,
    #[serde(rename = "À améliorer")]
    NeedsImprovement,
}

impl PerformanceRating {
    pub fn label(self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "Excellent",
            PerformanceRating::Good => "Bon",
            PerformanceRating::NeedsImprovement => "À améliorer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPerformance {
    pub channel: &'static str,
    pub resolved: i64,
    pub avg_time_days: f64,
    pub satisfaction: f64,
    pub rating: PerformanceRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub month: &'static str,
    pub claims: i64,
    pub resolved: i64,
    pub satisfaction: f64,
}

/// Page state for a dashboard load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Loaded(AggregateReport),
    Failed(ErrorKind),
}

impl LoadState {
    pub fn from_result(result: Result<AggregateReport, crate::error::LoadError>) -> Self {
        match result {
            Ok(report) => LoadState::Loaded(report),
            Err(err) => LoadState::Failed(err.kind()),
        }
    }

    /// The report to render, or the message shown in its place.
    pub fn into_view(self) -> Result<AggregateReport, &'static str> {
        match self {
            LoadState::Loading => Err("Chargement des données..."),
            LoadState::Loaded(report) => Ok(report),
            LoadState::Failed(kind) => Err(kind.user_message()),
        }
    }
}
