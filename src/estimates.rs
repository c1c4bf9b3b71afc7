//! Placeholder figures shown next to the real counts.
//!
//! The reporting endpoint does not publish resolution, satisfaction or
//! monthly history yet, so these values are fixed estimates and every
//! renderer must flag them as such.

use crate::models::{AggregateReport, ChannelPerformance, KpiSummary, MonthlyTrend, PerformanceRating};

pub fn kpi_summary(report: &AggregateReport) -> KpiSummary {
    KpiSummary {
        total_complaints: report.total(),
        resolved: 6,
        pending: 2,
        avg_resolution_days: 2.3,
        satisfaction_pct: 87.5,
        growth_pct: -12.4,
    }
}

pub fn rate_satisfaction(satisfaction: f64) -> PerformanceRating {
    match satisfaction {
        s if s >= 90.0 => PerformanceRating::Excellent,
        s if s >= 85.0 => PerformanceRating::Good,
        _ => PerformanceRating::NeedsImprovement,
    }
}

pub fn channel_performance() -> Vec<ChannelPerformance> {
    [
        ("App Mobile", 4, 1.8, 92.0),
        ("Internet Banking", 3, 2.1, 89.0),
        ("GAB/ATM", 2, 2.0, 91.0),
        ("Autres", 1, 2.8, 85.0),
    ]
    .into_iter()
    .map(|(channel, resolved, avg_time_days, satisfaction)| ChannelPerformance {
        channel,
        resolved,
        avg_time_days,
        satisfaction,
        rating: rate_satisfaction(satisfaction),
    })
    .collect()
}

pub fn monthly_trends() -> Vec<MonthlyTrend> {
    [
        ("Jan", 12, 10, 85.0),
        ("Fév", 15, 13, 87.0),
        ("Mar", 18, 15, 84.0),
        ("Avr", 20, 18, 88.0),
        ("Mai", 17, 15, 89.0),
        ("Jun", 19, 17, 86.0),
        ("Jul", 21, 19, 87.0),
        ("Aoû", 20, 18, 90.0),
        ("Sep", 16, 15, 88.0),
        ("Oct", 14, 13, 91.0),
    ]
    .into_iter()
    .map(|(month, claims, resolved, satisfaction)| MonthlyTrend {
        month,
        claims,
        resolved,
        satisfaction,
    })
    .collect()
}
