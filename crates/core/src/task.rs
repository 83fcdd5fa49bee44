use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FleetError;

/// Scheduling priority. Lower values are dispatched sooner.
pub type Priority = i64;

/// The fixed set of tasks a rover accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    #[serde(rename = "Soil Analysis")]
    SoilAnalysis,
    Irrigation,
    Weeding,
    #[serde(rename = "Crop Monitoring")]
    CropMonitoring,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::SoilAnalysis,
        TaskKind::Irrigation,
        TaskKind::Weeding,
        TaskKind::CropMonitoring,
    ];

    /// Name sent to the fleet service in the `task` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::SoilAnalysis => "Soil Analysis",
            TaskKind::Irrigation => "Irrigation",
            TaskKind::Weeding => "Weeding",
            TaskKind::CropMonitoring => "Crop Monitoring",
        }
    }

    /// Comma-separated list of every wire name, for error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = FleetError;

    /// Accepts any casing and spacing: `"soil   ANALYSIS"` parses as
    /// [`TaskKind::SoilAnalysis`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = title_case(s);
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FleetError::UnknownTaskKind {
                input: s.trim().to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Capitalize the first letter of every word, lower-case the rest and
/// collapse runs of whitespace into a single space.
fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
