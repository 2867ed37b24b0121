//! Daily ski report ETL.
//!
//! Scrapes resort conditions from the ski report page, reshapes the scraped text into
//! one record per resort, joins it with the static resort metadata and writes the
//! CSV the map front-end reads.

pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod reshape;
pub mod scraper;

pub use config::{EtlConfig, MarkerSelector};
pub use error::{EtlError, MetadataError, NoDataReason, Result, StructuralMismatch};
pub use merge::{match_locations, write_to_csv, MergedRow, MergedTable, MetadataTable};
pub use pipeline::{run, RunSummary};
pub use reshape::{reshape, ResortRecord};
pub use scraper::{FetchOutcome, RawFragment, Scraper};
