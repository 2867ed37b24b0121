use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::EtlConfig;
use crate::error::{EtlError, Result, StructuralMismatch};
use crate::merge::{match_locations, write_to_csv, MetadataTable};
use crate::reshape::reshape;
use crate::scraper::Scraper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub fragments: usize,
    pub records: usize,
    pub merged_rows: usize,
    pub output_path: PathBuf,
}

/// Scrape, reshape and merge the daily report, replacing the output file.
///
/// The previous report is removed before scraping starts, so a failed run leaves
/// no output behind.
pub async fn run(config: &EtlConfig) -> Result<RunSummary> {
    prepare_output(&config.output_path)?;

    debug!(pause = ?config.pause, "Pausing before scrape");
    tokio::time::sleep(config.pause).await;

    let scraper = Scraper::new(config)?;
    let fragments = scraper.scrape_fragments().await.into_result()?;
    if fragments.is_empty() {
        return Err(StructuralMismatch::NoMarkers {
            selector: config.selector.to_string(),
        }
        .into());
    }

    let records = reshape(&fragments)?;
    info!(fragments = fragments.len(), resorts = records.len(), "Reshaped ski report");

    let metadata = MetadataTable::load(&config.metadata_path)?;
    debug!(path = %config.metadata_path.display(), resorts = metadata.len(), "Loaded resort metadata");

    let merged = match_locations(&records, &metadata, config.row_limit);
    write_to_csv(&merged, &config.output_path)?;

    let summary = RunSummary {
        fragments: fragments.len(),
        records: records.len(),
        merged_rows: merged.rows.len(),
        output_path: config.output_path.clone(),
    };
    info!(rows = summary.merged_rows, path = %summary.output_path.display(), "Daily ski report written");

    Ok(summary)
}

/// Makes sure the output directory exists and the previous report is gone.
pub fn prepare_output(output_path: &Path) -> Result<()> {
    if let Some(dir) = output_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| EtlError::Io {
            action: "failed to create output directory",
            path: dir.to_owned(),
            source,
        })?;
    }

    match fs::remove_file(output_path) {
        Ok(()) => {
            debug!(path = %output_path.display(), "Removed previous report");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(EtlError::Io {
            action: "failed to remove previous report",
            path: output_path.to_owned(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("public").join("data").join("daily_ski.csv");

        prepare_output(&output).unwrap();

        assert!(output.parent().unwrap().is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn removes_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("daily_ski.csv");
        fs::write(&output, "stale").unwrap();

        prepare_output(&output).unwrap();

        assert!(!output.exists());
    }

    #[test]
    fn bare_file_name_needs_no_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("daily_ski.csv");

        prepare_output(&output).unwrap();
        prepare_output(Path::new("definitely_not_here_daily_ski.csv")).unwrap();
    }
}
