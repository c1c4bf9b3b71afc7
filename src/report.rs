use std::fmt::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::derive;
use crate::estimates;
use crate::models::{
    AggregateReport, ChannelPerformance, ComplaintRecord, DerivedChannelEntry, DerivedTypeEntry,
    KpiSummary, MonthlyTrend, SeverityBreakdownEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Everything the overview page shows, computed for one render.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub generated_at: DateTime<Utc>,
    pub kpis: KpiSummary,
    pub channels: Vec<DerivedChannelEntry>,
    pub complaint_types: Vec<DerivedTypeEntry>,
    pub severity: Vec<SeverityBreakdownEntry>,
    pub performance: Vec<ChannelPerformance>,
    pub trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelView<'a> {
    pub channel: &'a str,
    pub records: &'a [ComplaintRecord],
}

pub fn build_overview(report: &AggregateReport, generated_at: DateTime<Utc>) -> Overview {
    Overview {
        generated_at,
        kpis: estimates::kpi_summary(report),
        channels: derive::derive_channel_shares(report),
        complaint_types: derive::derive_types(report),
        severity: derive::derive_severity_breakdown(report),
        performance: estimates::channel_performance(),
        trends: estimates::monthly_trends(),
    }
}

pub fn render_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_overview(overview: &Overview) -> String {
    let mut output = String::new();
    let kpis = &overview.kpis;

    let _ = writeln!(output, "# Dashboard Réclamations");
    let _ = writeln!(output, "Généré le {}", overview.generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Indicateurs");
    let _ = writeln!(output, "- Total réclamations: {}", kpis.total_complaints);
    let _ = writeln!(output, "- Résolues: {} (estimation)", kpis.resolved);
    let _ = writeln!(output, "- En cours: {} (estimation)", kpis.pending);
    let _ = writeln!(output, "- Délai moyen: {}j (estimation)", kpis.avg_resolution_days);
    let _ = writeln!(output, "- Satisfaction: {}% (estimation)", kpis.satisfaction_pct);
    let _ = writeln!(output, "- Évolution: {}% (estimation)", kpis.growth_pct);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Répartition par Canal Digital");
    if overview.channels.is_empty() {
        let _ = writeln!(output, "Aucune donnée de canal.");
    } else {
        for channel in &overview.channels {
            let _ = writeln!(
                output,
                "- {}: {} réclamations ({:.1}%) [{}]",
                channel.name, channel.count, channel.share_percent, channel.color_token
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Types de Réclamations");
    if overview.complaint_types.is_empty() {
        let _ = writeln!(output, "Aucune donnée de nature.");
    } else {
        for complaint_type in &overview.complaint_types {
            let _ = writeln!(
                output,
                "- {} [{}]: {}",
                complaint_type.name,
                complaint_type.severity_bucket.label(),
                complaint_type.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Gravité des Réclamations");
    if overview.severity.is_empty() {
        let _ = writeln!(output, "Aucune donnée de gravité.");
    } else {
        for entry in &overview.severity {
            let _ = writeln!(output, "- {}: {} [{}]", entry.name, entry.count, entry.color_token);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance par Canal (estimation)");
    let _ = writeln!(output, "| Canal | Résolues | Délai moyen (j) | Satisfaction (%) | Performance |");
    let _ = writeln!(output, "|---|---|---|---|---|");
    for row in &overview.performance {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            row.channel,
            row.resolved,
            row.avg_time_days,
            row.satisfaction,
            row.rating.label()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Tendances Mensuelles (estimation)");
    for trend in &overview.trends {
        let _ = writeln!(
            output,
            "- {}: {} réclamations, {} résolues, satisfaction {}%",
            trend.month, trend.claims, trend.resolved, trend.satisfaction
        );
    }

    output
}

pub fn render_channels(channels: &[DerivedChannelEntry]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Canaux Digitaux");

    if channels.is_empty() {
        let _ = writeln!(output, "Aucune donnée de canal.");
        return output;
    }

    for channel in channels {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", channel.name);
        let _ = writeln!(
            output,
            "{} réclamations ({:.1}%)",
            channel.count, channel.share_percent
        );
        let _ = writeln!(output, "Volume `{}` {}", gauge(channel.share_percent), channel.color_token);
    }

    output
}

pub fn render_channel_records(channel: &str, records: &[ComplaintRecord]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Réclamations - {channel}");

    if records.is_empty() {
        let _ = writeln!(output, "Aucune réclamation trouvée pour ce canal.");
        return output;
    }

    for record in records {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Réclamation #{}", record.row_index.saturating_add(1));
        if let Some(nature) = record.nature_label.as_deref().filter(|n| !n.is_empty()) {
            let _ = writeln!(output, "Nature: {nature}");
        }
        let _ = writeln!(output, "**Demande:** {}", record.description);
        let _ = writeln!(output, "**Feedback:** {}", record.feedback_text);
    }

    output
}

const GAUGE_WIDTH: usize = 20;

fn gauge(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(GAUGE_WIDTH - filled))
}
