use serde::{Deserialize, Serialize};
use synaptic_wars_core::{AdaptationRecord, EmotionalRecord, PerformanceReport};

/// Session data dump written for offline analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Every classified state still held by the director, oldest first.
    pub emotional_history: Vec<EmotionalRecord>,
    /// Every adaptation still held by the engine, oldest first.
    pub adaptation_history: Vec<AdaptationRecord>,
    /// Performance metrics at export time.
    pub performance_report: PerformanceReport,
    /// Wall-clock milliseconds since the Unix epoch at export time.
    pub export_timestamp: u64,
}

impl ExportDocument {
    /// File name the document is conventionally stored under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("neuro-data-{}.json", self.export_timestamp)
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
