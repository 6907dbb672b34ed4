use thiserror::Error;

/// Reason a single access-log line was rejected.
///
/// Recoverable: the driver skips the line, counts it and keeps reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("client address not found")]
    MissingClientAddress,

    #[error("timestamp brackets not found")]
    MissingTimestamp,

    #[error("invalid timestamp format: {0}")]
    InvalidTimestampFormat(String),

    #[error("request line not found")]
    MissingRequestLine,

    #[error("unknown HTTP method: {0}")]
    UnknownHttpMethod(String),

    #[error("invalid status code: {0:?}")]
    InvalidStatusCode(String),

    #[error("invalid response size: {0:?}")]
    InvalidResponseSize(String),

    #[error("referer not found")]
    MissingReferer,
}

/// Condition that stops the analysis of a whole file
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("line {line_number} is {length} characters long, the limit is {limit}")]
    LineTooLong {
        line_number: usize,
        length: usize,
        limit: usize,
    },

    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
