//! Failures raised at the load boundary.

use std::path::PathBuf;

/// Errors from reading either report source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read static snapshot {path}: {source}")]
    StaticRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("static snapshot {path} is not valid JSON: {source}")]
    StaticParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("static snapshot {0} has no rapport_analytique section")]
    MissingReport(PathBuf),

    #[error("remote request failed: {0}")]
    RemoteRequest(#[from] reqwest::Error),

    #[error("remote endpoint answered with status {0}")]
    RemoteStatus(u16),

    #[error("remote body is malformed: {0}")]
    RemoteParse(#[source] serde_json::Error),
}

/// Coarse classification handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StaticRead,
    RemoteRead,
}

impl ErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::StaticRead => "Erreur lors du chargement des données locales.",
            ErrorKind::RemoteRead => "Erreur lors du chargement des données.",
        }
    }
}

impl LoadError {
    /// Static failures are fatal for a load; remote ones degrade.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Self::StaticRead { .. } | Self::StaticParse { .. } | Self::MissingReport(_)
        )
    }

    pub fn kind(&self) -> ErrorKind {
        if self.is_static() {
            ErrorKind::StaticRead
        } else {
            ErrorKind::RemoteRead
        }
    }
}
