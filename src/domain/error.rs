use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid entity reference `{input}`: expected `collection|<slug>` or `global|<slug>`")]
    InvalidReference { input: String },
    #[error("schema ingestion failed: {message}")]
    Schema { message: String },
}

impl DomainError {
    pub fn invalid_reference(input: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}
