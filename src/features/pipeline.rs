//! Extraction pipeline: capture file → packets → flow table → per-flow rows → one averaged row.

use super::{FeatureRow, FlowFeatures};
use crate::capture::{read_capture, Packet};
use crate::error::ExtractError;
use crate::flow::FlowTable;
use std::path::Path;
use tracing::debug;

const CAPTURE_EXTENSIONS: [&str; 2] = ["pcap", "pcapng"];

/// Extract the single model-input row for a capture file.
///
/// Fails with [`ExtractError::NotFound`] unless `path` is a regular file and
/// with [`ExtractError::BadFormat`] unless it ends in `.pcap` / `.pcapng`.
pub fn extract_features(path: &Path) -> Result<FeatureRow, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    let has_capture_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| CAPTURE_EXTENSIONS.iter().any(|c| e.eq_ignore_ascii_case(c)))
        .unwrap_or(false);
    if !has_capture_ext {
        return Err(ExtractError::BadFormat(path.to_path_buf()));
    }

    let packets = read_capture(path).map_err(|source| ExtractError::Capture {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(features_from_packets(&packets))
}

pub fn features_from_packets(packets: &[Packet]) -> FeatureRow {
    let table = FlowTable::from_packets(packets);
    debug!(packets = packets.len(), flows = table.len(), "flow table built");
    features_from_table(&table)
}

/// Encode every flow and average them column-wise; no flows gives the all-zero row.
pub fn features_from_table(table: &FlowTable) -> FeatureRow {
    let rows: Vec<FeatureRow> = table
        .records()
        .iter()
        .map(|r| FlowFeatures::from_record(r).encode())
        .collect();
    FeatureRow::mean(&rows)
}
