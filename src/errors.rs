use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("contract violation: {message}")]
    ContractViolation {
        message: String,
    },

    #[error("arithmetic failure: {message}")]
    Arithmetic {
        message: String,
    },

    #[error("malformed document: {message}")]
    MalformedDocument {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
