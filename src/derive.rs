use crate::models::{
    AggregateReport, DerivedChannelEntry, DerivedTypeEntry, SeverityBreakdownEntry, SeverityBucket,
};

pub const PALETTE: [&str; 5] = ["#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6"];

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn share_percent(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}

pub fn derive_channel_shares(report: &AggregateReport) -> Vec<DerivedChannelEntry> {
    let total = report.total();
    report
        .by_channel
        .iter()
        .enumerate()
        .map(|(index, (name, count))| DerivedChannelEntry {
            name: name.clone(),
            count: *count,
            share_percent: share_percent(*count, total),
            color_token: color_for(index),
        })
        .collect()
}

pub fn classify_severity(name: &str) -> SeverityBucket {
    let folded = name.to_lowercase();
    if folded.contains("critique") {
        SeverityBucket::High
    } else if folded.contains("moyen") {
        SeverityBucket::Medium
    } else {
        SeverityBucket::Low
    }
}

pub fn derive_types(report: &AggregateReport) -> Vec<DerivedTypeEntry> {
    report
        .by_nature
        .iter()
        .map(|(name, count)| DerivedTypeEntry {
            name: name.clone(),
            count: *count,
            severity_bucket: classify_severity(name),
        })
        .collect()
}

pub fn derive_severity_breakdown(report: &AggregateReport) -> Vec<SeverityBreakdownEntry> {
    report
        .by_severity_bucket
        .iter()
        .enumerate()
        .map(|(index, (name, count))| SeverityBreakdownEntry {
            name: name.clone(),
            count: *count,
            color_token: color_for(index),
        })
        .collect()
}
