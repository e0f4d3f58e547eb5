use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CdError {
    #[error("track must be between 0 and 99, inclusive: {0}")]
    InvalidTrack(u8),

    #[error("index must be between 0 and 99, inclusive: {0}")]
    InvalidIndex(u8),

    #[error("Invalid MSF position: {0}")]
    InvalidMsf(String),

    #[error("Disc information does not end with a leadout entry")]
    MissingLeadout,

    #[error("Disc information is inconsistent: {0}")]
    InconsistentDisc(String),
}

pub type CdResult<T> = Result<T, CdError>;
