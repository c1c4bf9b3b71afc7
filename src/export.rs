use std::path::Path;

use serde::Serialize;

use crate::models::ComplaintRecord;

#[derive(Serialize)]
struct CsvRow<'a> {
    numero: i64,
    canal: &'a str,
    nature: &'a str,
    demande: &'a str,
    feedback: &'a str,
}

/// Writes the given rows to `path`, returning how many were written.
pub fn write_records_csv(path: &Path, records: &[ComplaintRecord]) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;

    for record in records {
        writer.serialize(CsvRow {
            numero: record.row_index.saturating_add(1),
            canal: record.channel_label.as_deref().unwrap_or("").trim(),
            nature: record.nature_label.as_deref().unwrap_or(""),
            demande: &record.description,
            feedback: &record.feedback_text,
        })?;
    }

    writer.flush()?;
    Ok(records.len())
}
