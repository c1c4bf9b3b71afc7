use clap::ValueEnum;

use crate::models::ComplaintRecord;

/// Channels that have a dedicated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DigitalChannel {
    Mobile,
    Web,
    Atm,
    Others,
}

impl DigitalChannel {
    pub fn label(self) -> &'static str {
        match self {
            DigitalChannel::Mobile => "App Mobile",
            DigitalChannel::Web => "Internet Banking",
            DigitalChannel::Atm => "GAB/ATM",
            DigitalChannel::Others => "Autres",
        }
    }
}

pub fn normalize_channel(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Keeps the records whose channel label matches `target`, in input order.
pub fn filter_by_channel(records: &[ComplaintRecord], target: &str) -> Vec<ComplaintRecord> {
    let target = normalize_channel(target);
    if target.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| {
            record
                .channel_label
                .as_deref()
                .map(normalize_channel)
                .is_some_and(|label| label == target)
        })
        .cloned()
        .collect()
}
