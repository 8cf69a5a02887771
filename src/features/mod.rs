//! Feature encoding: flow records → one fixed 47-column row in training-schema order.

mod encoding;
mod flow_features;
mod pipeline;

pub use encoding::{hash_address, proto_code, service_code, state_code, PROTO_CODES, SERVICE_CODES, STATE_CODES};
pub use flow_features::FlowFeatures;
pub use pipeline::{extract_features, features_from_packets, features_from_table};

use serde::ser::{Serialize, SerializeMap, Serializer};

pub const FEATURE_COUNT: usize = 47;

/// UNSW-NB15 model input columns, in training order (no label, no attack_cat).
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "srcip",
    "sport",
    "dstip",
    "dsport",
    "proto",
    "state",
    "dur",
    "sbytes",
    "dbytes",
    "sttl",
    "dttl",
    "sloss",
    "dloss",
    "service",
    "Sload",
    "Dload",
    "Spkts",
    "Dpkts",
    "swin",
    "dwin",
    "stcpb",
    "dtcpb",
    "smeansz",
    "dmeansz",
    "trans_depth",
    "res_bdy_len",
    "Sjit",
    "Djit",
    "Stime",
    "Ltime",
    "Sintpkt",
    "Dintpkt",
    "tcprtt",
    "synack",
    "ackdat",
    "is_sm_ips_ports",
    "ct_state_ttl",
    "ct_flw_http_mthd",
    "is_ftp_login",
    "ct_ftp_cmd",
    "ct_srv_src",
    "ct_srv_dst",
    "ct_dst_ltm",
    "ct_src_ltm",
    "ct_src_dport_ltm",
    "ct_dst_sport_ltm",
    "ct_dst_src_ltm",
];

/// Columns that hold encoded categories rather than measurements.
pub const CATEGORICAL_COLUMNS: [&str; 5] = ["srcip", "dstip", "proto", "state", "service"];

/// Position of `column` in [`FEATURE_COLUMNS`].
pub fn column_index(column: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|c| *c == column)
}

/// Fully numeric row in [`FEATURE_COLUMNS`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    values: [f64; FEATURE_COUNT],
}

impl Default for FeatureRow {
    fn default() -> Self {
        Self::zeros()
    }
}

impl FeatureRow {
    pub fn zeros() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        column_index(column).map(|i| self.values[i])
    }

    /// Reindex by name: values for `columns` in that order, 0.0 for names outside the schema.
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Vec<f64> {
        columns
            .iter()
            .map(|c| self.get(c.as_ref()).unwrap_or(0.0))
            .collect()
    }

    /// Column-wise mean. An empty slice gives the all-zero row.
    pub fn mean(rows: &[FeatureRow]) -> FeatureRow {
        if rows.is_empty() {
            return FeatureRow::zeros();
        }
        let mut sums = [0.0f64; FEATURE_COUNT];
        for row in rows {
            for (sum, v) in sums.iter_mut().zip(row.values.iter()) {
                *sum += v;
            }
        }
        let n = rows.len() as f64;
        for sum in sums.iter_mut() {
            *sum /= n;
        }
        FeatureRow { values: sums }
    }
}

/// Serialized as a JSON object keyed by column name, in schema order.
impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in FEATURE_COLUMNS.iter().zip(self.values.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
