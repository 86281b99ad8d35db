use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid transaction hash: {0}")]
    InvalidTransactionHash(String),
}

pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().is_empty() {
        return Err(ValidationError::MissingParameter("address".to_string()));
    }

    // Blockchain addresses are printable ASCII with no interior whitespace.
    if address.chars().any(|c| c.is_whitespace()) || !address.is_ascii() {
        return Err(ValidationError::InvalidAddress(address.to_string()));
    }

    Ok(())
}

pub fn validate_transaction_hash(hash: &str) -> Result<(), ValidationError> {
    if hash.trim().is_empty() {
        return Err(ValidationError::MissingParameter(
            "transaction_hash".to_string(),
        ));
    }

    if hash.chars().any(|c| c.is_whitespace()) || !hash.is_ascii() {
        return Err(ValidationError::InvalidTransactionHash(hash.to_string()));
    }

    Ok(())
}
