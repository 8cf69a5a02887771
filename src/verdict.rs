//! Turns a model prediction, or a complaint category when there is no capture, into the
//! verdict returned to callers.

use serde::{Deserialize, Serialize};

pub const PCAP_CATEGORY: &str = "pcap_analysis";

/// Complaint categories treated as threats without any packet evidence.
pub const THREAT_CATEGORIES: [&str; 4] = [
    "Hacking / Unauthorized Access",
    "Ransomware",
    "Data Breach",
    "Identity Theft",
];

const THREAT_CONFIDENCE: f32 = 0.9;
const BENIGN_CONFIDENCE: f32 = 0.85;

/// `is_threat` and `isThreat` carry the same value; both spellings have consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatVerdict {
    pub prediction: u8,
    pub is_threat: bool,
    #[serde(rename = "isThreat")]
    pub is_threat_compat: bool,
    pub category: String,
    pub confidence: f32,
}

impl ThreatVerdict {
    pub fn from_prediction(prediction: u8) -> Self {
        let is_threat = prediction != 0;
        Self {
            prediction: u8::from(is_threat),
            is_threat,
            is_threat_compat: is_threat,
            category: PCAP_CATEGORY.to_string(),
            confidence: if is_threat {
                THREAT_CONFIDENCE
            } else {
                BENIGN_CONFIDENCE
            },
        }
    }

    /// Rule-based fallback: exact match against [`THREAT_CATEGORIES`].
    pub fn from_complaint(complaint_type: &str) -> Self {
        let is_threat = THREAT_CATEGORIES.contains(&complaint_type);
        let category = if complaint_type.is_empty() {
            "unknown".to_string()
        } else {
            complaint_type.to_string()
        };
        Self {
            prediction: u8::from(is_threat),
            is_threat,
            is_threat_compat: is_threat,
            category,
            confidence: BENIGN_CONFIDENCE,
        }
    }
}
