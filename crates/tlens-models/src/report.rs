//! Scouting report outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed narrative shown when no language-model credential is configured.
pub const NOT_CONFIGURED_TEXT: &str =
    "Scouting report unavailable: no language model credential configured.";

/// Fixed narrative shown when the service answered without usable text.
pub const UNAVAILABLE_TEXT: &str = "AI analysis unavailable.";

/// Outcome of one report generation.
///
/// Degraded outcomes are values, not errors: callers branch on the tag
/// instead of inspecting prose, and the pipeline continues to the chart
/// and export stages regardless of the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoutingReport {
    /// Narrative text returned by the language-model service.
    Generated { text: String },
    /// No credential was configured; the service was never invoked.
    NotConfigured,
    /// The service responded without the expected text content.
    Unavailable,
    /// The call failed; `reason` carries the error description.
    Failed { reason: String },
}

impl ScoutingReport {
    /// Whether the narrative actually came from the language model.
    pub fn is_generated(&self) -> bool {
        matches!(self, ScoutingReport::Generated { .. })
    }

    /// Narrative text for display and document export.
    ///
    /// Degraded variants map to their fixed placeholder strings; a failure
    /// embeds the error description so the reader sees why.
    pub fn narrative(&self) -> String {
        match self {
            ScoutingReport::Generated { text } => text.clone(),
            ScoutingReport::NotConfigured => NOT_CONFIGURED_TEXT.to_string(),
            ScoutingReport::Unavailable => UNAVAILABLE_TEXT.to_string(),
            ScoutingReport::Failed { reason } => {
                format!("Scouting report generation failed: {reason}")
            }
        }
    }
}
