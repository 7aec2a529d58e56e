//! Network file loading.
//!
//! A network file is headerless CSV. Each record is a line name followed by
//! the stations it calls at, in travel order:
//!
//! ```text
//! # comment lines start with '#'
//! Island Line,Kennedy Town,HKU,Sai Ying Pun,Sheung Wan,Central
//! Tsuen Wan Line,Central,Admiralty,Tsim Sha Tsui
//! ```
//!
//! Records may have any length, and a line name may repeat to continue a
//! line on a later record. Fields are trimmed and blank station fields are
//! skipped.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::network::{Metro, MetroBuilder, NetworkError};

/// Errors from loading a network file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file could not be opened
    #[error("failed to open network file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A record could not be read
    #[error("malformed network data at record {record}: {source}")]
    Csv { record: u64, source: csv::Error },

    /// A record has a blank line name
    #[error("record {record} has no line name")]
    MissingLineName { record: u64 },

    /// The records do not make a valid network
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Read network records into a builder.
///
/// Records are numbered from 1, counting only non-comment records.
pub fn read_network<R: Read>(reader: R) -> Result<MetroBuilder, IngestError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut builder = MetroBuilder::new();

    for (i, result) in csv_reader.records().enumerate() {
        let record_no = i as u64 + 1;
        let record = result.map_err(|source| IngestError::Csv {
            record: record_no,
            source,
        })?;

        let mut fields = record.iter();
        let line_name = fields
            .next()
            .filter(|name| !name.is_empty())
            .ok_or(IngestError::MissingLineName { record: record_no })?;

        builder.add_line(line_name)?;
        for station in fields.filter(|s| !s.is_empty()) {
            builder.add_station(station, line_name)?;
        }

        debug!(record = record_no, line = line_name, "network record read");
    }

    Ok(builder)
}

/// Load and build a network from a file.
pub fn load_network(path: &Path) -> Result<Metro, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let metro = read_network(file)?.build()?;

    info!(
        path = %path.display(),
        lines = metro.line_count(),
        stations = metro.station_count(),
        "network loaded"
    );

    Ok(metro)
}
