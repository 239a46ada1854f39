use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectorError>;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("Duplicate model name: {name}")]
    DuplicateName { name: String },

    #[error("Unknown qualifier `{qualifier}` in selector clause `{clause}`")]
    UnknownQualifier { qualifier: String, clause: String },

    #[error("Invalid selector clause `{clause}`: {reason}")]
    InvalidClause { clause: String, reason: String },
}
