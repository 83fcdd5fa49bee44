use thiserror::Error;

/// Local validation failures. These never reach the remote fleet service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FleetError {
    #[error("Invalid task '{input}'. Choose from {valid}")]
    UnknownTaskKind { input: String, valid: String },

    #[error("Rover id must not be empty")]
    EmptyRoverId,
}

pub type Result<T> = std::result::Result<T, FleetError>;
