use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FleetError;

/// Identifier of a rover in the remote fleet. Opaque to this crate apart
/// from being non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoverId(String);

impl RoverId {
    pub fn new(id: impl Into<String>) -> Result<Self, FleetError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(FleetError::EmptyRoverId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for RoverId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
