use thiserror::Error;

pub type BlockResult<T> = Result<T, BlockError>;

#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Invalid document JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Document must be a JSON array of blocks")]
    NotAnArray,

    #[error("Invalid props for {type_name} block: {message}")]
    InvalidProps { type_name: String, message: String },
}

impl BlockError {
    pub fn invalid_props(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProps {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}
