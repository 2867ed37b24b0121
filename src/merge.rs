use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use tracing::{debug, info, warn};

use crate::error::{EtlError, MetadataError};
use crate::reshape::{ResortRecord, REPORT_HEADERS};

pub const NAME_COLUMN: &str = "Resort Name";

/// Static resort descriptions keyed by `Resort Name`, loaded as-is from CSV.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    headers: Vec<String>,
    key_index: usize,
    rows: Vec<Vec<String>>,
}

impl MetadataTable {
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let reader = std::fs::File::open(path).map_err(|err| MetadataError::Read {
            path: path.to_owned(),
            source: err.into(),
        })?;
        Self::from_reader(reader, path)
    }

    pub fn from_reader<R: io::Read>(reader: R, origin: &Path) -> Result<Self, MetadataError> {
        let read_error = |source: csv::Error| MetadataError::Read {
            path: origin.to_owned(),
            source,
        };

        let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(read_error)?
            .iter()
            .map(|h| h.to_owned())
            .collect();

        let key_index = headers
            .iter()
            .position(|h| h == NAME_COLUMN)
            .ok_or_else(|| MetadataError::MissingNameColumn {
                path: origin.to_owned(),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;
            if record.len() > headers.len() {
                warn!(
                    path = %origin.display(),
                    line = record.position().map(|p| p.line()),
                    extra = record.len() - headers.len(),
                    "Metadata row has more cells than headers; extra cells ignored"
                );
            }
            let mut row: Vec<String> = record
                .iter()
                .take(headers.len())
                .map(|cell| cell.to_owned())
                .collect();
            row.resize(headers.len(), String::new());
            row[key_index] = row[key_index].trim().to_owned();
            // A blank key is a missing value, never a resort called "".
            if row[key_index].is_empty() {
                debug!(path = %origin.display(), "Skipping metadata row without a resort name");
                continue;
            }
            rows.push(row);
        }

        Ok(Self {
            headers,
            key_index,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn name<'a>(&self, row: &'a [String]) -> &'a str {
        &row[self.key_index]
    }

    fn descriptive_headers(&self) -> impl Iterator<Item = &String> + '_ {
        self.headers
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.key_index)
            .map(|(_, h)| h)
    }

    fn descriptive_cells(&self, row: &[String]) -> Vec<String> {
        row.iter()
            .enumerate()
            .filter(|(i, _)| *i != self.key_index)
            .map(|(_, cell)| cell.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRow {
    pub record: ResortRecord,
    pub metadata: Vec<String>,
}

impl MergedRow {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    fn cells(&self) -> impl Iterator<Item = &str> {
        self.record
            .fields()
            .into_iter()
            .chain(self.metadata.iter().map(|c| c.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub rows: Vec<MergedRow>,
}

/// Inner join on trimmed resort name, in report order, capped at `limit` rows.
///
/// A report column that shares its name with a metadata column is written as
/// `<name>_x` and the metadata one as `<name>_y`.
pub fn match_locations(records: &[ResortRecord], metadata: &MetadataTable, limit: usize) -> MergedTable {
    let metadata_headers: Vec<&String> = metadata.descriptive_headers().collect();

    let mut headers: Vec<String> = REPORT_HEADERS
        .iter()
        .map(|h| {
            if *h != NAME_COLUMN && metadata_headers.iter().any(|m| m.as_str() == *h) {
                format!("{}_x", h)
            } else {
                (*h).to_owned()
            }
        })
        .collect();
    headers.extend(metadata_headers.iter().map(|h| {
        if REPORT_HEADERS.contains(&h.as_str()) {
            format!("{}_y", h)
        } else {
            (*h).clone()
        }
    }));

    let joined = records.iter().flat_map(move |record| {
        let name = record.name.trim();
        metadata
            .rows
            .iter()
            .filter(move |row| !name.is_empty() && metadata.name(row) == name)
            .map(move |row| MergedRow {
                record: ResortRecord {
                    name: name.to_owned(),
                    ..record.clone()
                },
                metadata: metadata.descriptive_cells(row),
            })
    });

    MergedTable {
        headers,
        rows: joined.take(limit).collect(),
    }
}

pub fn write_to_csv(table: &MergedTable, path: &Path) -> Result<(), EtlError> {
    info!(path = %path.display(), rows = table.rows.len(), "Writing report CSV");

    let output_error = |source: csv::Error| EtlError::Output {
        path: PathBuf::from(path),
        source,
    };

    let mut writer = Writer::from_path(path).map_err(output_error)?;

    writer.write_record(&table.headers).map_err(output_error)?;
    for row in &table.rows {
        writer.write_record(row.cells()).map_err(output_error)?;
    }

    writer
        .flush()
        .map_err(|err| output_error(csv::Error::from(err)))?;

    if table.rows.is_empty() {
        warn!(path = %path.display(), "No resorts matched the metadata; wrote header only");
    }

    Ok(())
}
