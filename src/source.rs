use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::LoadError;
use crate::merge::merge;
use crate::models::{AggregateReport, ComplaintRecord};

const REPORT_KEY: &str = "rapport_analytique";
const RECORDS_KEY: &str = "donnees";

pub fn build_client(config: &AppConfig) -> Result<reqwest::Client, LoadError> {
    Ok(reqwest::Client::builder().timeout(config.timeout).build()?)
}

/// Loads the static snapshot and layers the live report over it.
///
/// A failing remote read degrades to the static snapshot alone; only a
/// static failure is returned.
pub async fn load(client: &reqwest::Client, config: &AppConfig) -> Result<AggregateReport, LoadError> {
    let (local, remote) = tokio::join!(
        read_static(&config.static_snapshot),
        fetch_document(client, config)
    );
    let local = local?;

    match remote.and_then(|document| remote_report(&document)) {
        Ok(Some(overlay)) => {
            tracing::info!(
                channels = overlay.by_channel.len(),
                natures = overlay.by_nature.len(),
                "merging live report over static snapshot"
            );
            Ok(merge(local, overlay))
        }
        Ok(None) => {
            tracing::debug!("live body has no {REPORT_KEY} section, keeping static snapshot");
            Ok(local)
        }
        Err(err) => {
            tracing::warn!(error = %err, "live report unavailable, using static snapshot only");
            Ok(local)
        }
    }
}

pub async fn read_static(path: &Path) -> Result<AggregateReport, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| LoadError::StaticRead {
            path: path.to_path_buf(),
            source,
        })?;
    let document: Value = serde_json::from_slice(&bytes).map_err(|source| LoadError::StaticParse {
        path: path.to_path_buf(),
        source,
    })?;

    let report = report_section(&document)
        .map_err(|source| LoadError::StaticParse {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| LoadError::MissingReport(path.to_path_buf()))?;

    tracing::info!(path = %path.display(), total = ?report.total_complaints, "static snapshot loaded");
    Ok(report)
}

/// Fetches the raw complaint rows from the live endpoint.
pub async fn load_records(
    client: &reqwest::Client,
    config: &AppConfig,
) -> Result<Vec<ComplaintRecord>, LoadError> {
    let document = fetch_document(client, config).await?;
    let records = match document.get(RECORDS_KEY) {
        Some(Value::Null) | None => Vec::new(),
        Some(rows) => {
            Vec::<ComplaintRecord>::deserialize(rows).map_err(LoadError::RemoteParse)?
        }
    };
    tracing::info!(rows = records.len(), "complaint rows fetched");
    Ok(records)
}

async fn fetch_document(client: &reqwest::Client, config: &AppConfig) -> Result<Value, LoadError> {
    let url = config.reports_url();
    tracing::debug!(%url, "requesting live reports");

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::RemoteStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(LoadError::RemoteParse)
}

fn remote_report(document: &Value) -> Result<Option<AggregateReport>, LoadError> {
    report_section(document).map_err(LoadError::RemoteParse)
}

/// Extracts the typed report from a source document.
///
/// Keys beyond the known report fields are logged and dropped.
fn report_section(document: &Value) -> Result<Option<AggregateReport>, serde_json::Error> {
    let section = match document.get(REPORT_KEY) {
        Some(Value::Null) | None => return Ok(None),
        Some(section) => section,
    };

    if let Value::Object(fields) = section {
        for key in fields.keys() {
            if !AggregateReport::FIELDS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "ignoring unexpected report field");
            }
        }
    }

    AggregateReport::deserialize(section).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const STATIC_DOC: &str = r#"{
        "rapport_analytique": {
            "total_reclamations": 10,
            "par_canal": {"A": 10},
            "par_nature": {"Réclamation Critique": 10},
            "par_gravite": {"Haute": 10}
        }
    }"#;

    fn snapshot(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config_for(api_base_url: String, path: &Path) -> AppConfig {
        AppConfig {
            api_base_url,
            static_snapshot: path.to_path_buf(),
            timeout: Duration::from_secs(5),
        }
    }

    async fn serve_once(status_line: &'static str, body: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    async fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn remote_failure_returns_static_exactly() {
        let file = snapshot(STATIC_DOC);
        let config = config_for(unreachable_url().await, file.path());
        let client = build_client(&config).unwrap();

        let loaded = load(&client, &config).await.unwrap();
        let expected = read_static(file.path()).await.unwrap();
        assert_eq!(loaded, expected);
        assert_eq!(loaded.total_complaints, Some(10));
        assert_eq!(loaded.by_channel.len(), 1);
    }

    #[tokio::test]
    async fn live_report_is_merged_over_static() {
        let file = snapshot(STATIC_DOC);
        let body = r#"{"rapport_analytique": {"total_reclamations": 14, "par_canal": {"A": 3, "Autres": 4}}}"#;
        let config = config_for(serve_once("200 OK", body.to_string()).await, file.path());
        let client = build_client(&config).unwrap();

        let loaded = load(&client, &config).await.unwrap();
        assert_eq!(loaded.total_complaints, Some(14));
        assert_eq!(loaded.by_channel["A"], 3);
        assert_eq!(loaded.by_channel["Autres"], 4);
        assert_eq!(loaded.by_nature["Réclamation Critique"], 10);
    }

    #[tokio::test]
    async fn null_maps_in_live_report_keep_static_counts() {
        let file = snapshot(STATIC_DOC);
        let body = r#"{"rapport_analytique": {"total_reclamations": 14, "par_canal": null, "par_gravite": null}}"#;
        let config = config_for(serve_once("200 OK", body.to_string()).await, file.path());
        let client = build_client(&config).unwrap();

        let loaded = load(&client, &config).await.unwrap();
        assert_eq!(loaded.total_complaints, Some(14));
        assert_eq!(loaded.by_channel["A"], 10);
        assert_eq!(loaded.by_severity_bucket["Haute"], 10);
        assert_eq!(loaded.by_nature["Réclamation Critique"], 10);
    }

    #[tokio::test]
    async fn error_status_falls_back_to_static() {
        let file = snapshot(STATIC_DOC);
        let body = r#"{"rapport_analytique": {"total_reclamations": 99}}"#;
        let config = config_for(
            serve_once("500 Internal Server Error", body.to_string()).await,
            file.path(),
        );
        let client = build_client(&config).unwrap();

        let loaded = load(&client, &config).await.unwrap();
        assert_eq!(loaded.total_complaints, Some(10));
    }

    #[tokio::test]
    async fn malformed_live_body_falls_back_to_static() {
        let file = snapshot(STATIC_DOC);
        let config = config_for(serve_once("200 OK", "{not json".to_string()).await, file.path());
        let client = build_client(&config).unwrap();

        let loaded = load(&client, &config).await.unwrap();
        assert_eq!(loaded, read_static(file.path()).await.unwrap());
    }

    #[tokio::test]
    async fn missing_static_snapshot_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics-db.json");
        let config = config_for(unreachable_url().await, &path);
        let client = build_client(&config).unwrap();

        let err = load(&client, &config).await.unwrap_err();
        assert!(matches!(err, LoadError::StaticRead { .. }));
        assert!(err.is_static());
    }

    #[tokio::test]
    async fn static_snapshot_without_report_section_fails() {
        let file = snapshot(r#"{"donnees": []}"#);
        let err = read_static(file.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingReport(_)));

        let garbled = snapshot("[1, 2");
        let err = read_static(garbled.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::StaticParse { .. }));
    }

    #[tokio::test]
    async fn unexpected_fields_are_dropped() {
        let file = snapshot(
            r#"{"rapport_analytique": {"total_reclamations": 2, "par_canal": {"GAB/ATM": 2}, "genere_le": "2024-05-01"}}"#,
        );
        let report = read_static(file.path()).await.unwrap();
        assert_eq!(report.total_complaints, Some(2));
        assert!(report.by_nature.is_empty());
    }

    #[tokio::test]
    async fn records_are_read_from_donnees() {
        let body = r#"{"donnees": [
            {"row_index": 0, "inquiry_description": "Retrait non servi", "feedback": "Rembourser", "canal": "GAB/ATM"},
            {"row_index": 1, "inquiry_description": "Code oublié", "feedback": "", "canal": " Autres ", "nature": "Accès"}
        ]}"#;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(serve_once("200 OK", body.to_string()).await, dir.path());
        let client = build_client(&config).unwrap();

        let records = load_records(&client, &config).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].nature_label.as_deref(), Some("Accès"));
        assert_eq!(records[0].description, "Retrait non servi");
    }

    #[tokio::test]
    async fn rows_with_null_text_are_kept() {
        let body = r#"{"donnees": [
            {"row_index": 0, "inquiry_description": null, "feedback": null, "canal": "Autres"},
            {"row_index": 1, "inquiry_description": "Frais", "feedback": "x", "canal": "Autres"}
        ]}"#;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(serve_once("200 OK", body.to_string()).await, dir.path());
        let client = build_client(&config).unwrap();

        let records = load_records(&client, &config).await.unwrap();
        assert_eq!(crate::filter::filter_by_channel(&records, "autres").len(), 2);
        assert_eq!(records[0].feedback_text, "");
    }

    #[tokio::test]
    async fn missing_donnees_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(serve_once("200 OK", "{}".to_string()).await, dir.path());
        let client = build_client(&config).unwrap();

        assert!(load_records(&client, &config).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_records_endpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(unreachable_url().await, dir.path());
        let client = build_client(&config).unwrap();

        let err = load_records(&client, &config).await.unwrap_err();
        assert!(!err.is_static());
    }
}
