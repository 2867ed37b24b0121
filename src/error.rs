use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no data scraped: {0}")]
    NoData(#[from] NoDataReason),

    #[error("page structure mismatch: {0}")]
    Structure(#[from] StructuralMismatch),

    #[error("resort metadata: {0}")]
    Metadata(#[from] MetadataError),

    #[error("failed to write report to {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a fetch came back empty-handed.
#[derive(Debug, Error)]
pub enum NoDataReason {
    #[error("failed to retrieve the webpage, status code: {0}")]
    HttpStatus(StatusCode),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralMismatch {
    #[error("no elements matched `{selector}`; the site markup may have changed")]
    NoMarkers { selector: String },

    #[error("{fragments} fragments do not split into records of 5 ({remainder} left over)")]
    IncompleteRecord { fragments: usize, remainder: usize },
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path:?} has no `Resort Name` column")]
    MissingNameColumn { path: PathBuf },
}
