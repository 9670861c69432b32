use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("invalid address range: {0}")]
    InvalidRange(#[from] RangeError),
    #[error("invalid probe configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open echo socket, reason: {0}")]
    Socket(#[source] std::io::Error),
}
pub type Result<T> = std::result::Result<T, Error>;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RangeError {
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),
    #[error("'{0}' is not a valid subnet mask")]
    InvalidMask(String),
    #[error("subnet mask {0} is not contiguous")]
    NonContiguousMask(String),
    #[error("'{0}' is not a valid prefix length (expected 0-32)")]
    InvalidPrefix(String),
    #[error("subnet mask is required when the address has no prefix length")]
    MissingMask,
    #[error("both a prefix length and a subnet mask were supplied")]
    AmbiguousMask,
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("count and continuous mode are mutually exclusive")]
    ConflictingRepeatModes,
    #[error("echo requests per round must be at least 1")]
    ZeroEchoRequests,
    #[error("probe timeout must be positive")]
    ZeroTimeout,
    #[error("interval between rounds must be positive")]
    ZeroInterval,
    #[error("round count must be at least 1")]
    ZeroCount,
    #[error("payload size {0} exceeds the maximum of 65500 bytes")]
    PayloadTooLarge(usize),
    #[error("probe timeout {0:?} exceeds the maximum of 24 hours")]
    TimeoutTooLarge(std::time::Duration),
    #[error("interval {0:?} exceeds the maximum of 24 hours")]
    IntervalTooLarge(std::time::Duration),
}
