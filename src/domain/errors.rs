use thiserror::Error;

/// Caller supplied input that cannot be turned into a typed request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid '{field}' provided: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

#[derive(Error, Debug)]
pub enum BcClientError {
    #[error("Failed to get minimum balance for rent exemption: {0}")]
    FailedToGetRentExemption(String),
    #[error("Failed to get latest blockhash: {0}")]
    FailedToGetLatestBlockhash(String),
}

#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed solana rpc client")]
    Network(#[from] BcClientError),
    #[error("Failed to encode transaction: {0}")]
    Encoding(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

impl From<bincode::Error> for ActionError {
    fn from(e: bincode::Error) -> Self {
        ActionError::Encoding(e.to_string())
    }
}

impl From<solana_sdk::program_error::ProgramError> for ActionError {
    fn from(e: solana_sdk::program_error::ProgramError) -> Self {
        ActionError::Encoding(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bincode_failure_is_an_encoding_error() {
        let error: ActionError = Box::new(bincode::ErrorKind::SizeLimit).into();
        assert!(matches!(error, ActionError::Encoding(_)));
    }

    #[test]
    fn test_program_error_is_an_encoding_error() {
        let error: ActionError = solana_sdk::program_error::ProgramError::InvalidArgument.into();
        assert!(matches!(error, ActionError::Encoding(_)));
    }
}
