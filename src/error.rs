//! Error types for the event view query engine.

use std::fmt;

use thiserror::Error;

/// Result type alias for query engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by [`crate::usecase::services::query_service::EventQueryService`].
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied paging or sorting input the engine cannot honour.
    #[error("invalid page request: {0}")]
    InvalidPageRequest(String),

    /// The storage collaborator failed. The original cause is kept as the source.
    #[error("data access error: {0}")]
    DataAccess(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    pub fn invalid_page_request(message: impl Into<String>) -> Self {
        Error::InvalidPageRequest(message.into())
    }

    pub fn data_access(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Error::DataAccess(err.into())
    }

    /// Code a service layer can report back to its own caller.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidPageRequest(_) => ErrorCode::BadRequest,
            Error::DataAccess(_) => ErrorCode::DataAccessError,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::DataAccess(err.into())
    }
}

/// Stable numeric codes shared with callers of the admin tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok,
    BadRequest,
    ValidationError,
    NotFound,
    InternalError,
    DataAccessError,
}

impl ErrorCode {
    pub const fn code(self) -> u32 {
        match self {
            ErrorCode::Ok => 0,
            ErrorCode::BadRequest => 10000,
            ErrorCode::ValidationError => 10002,
            ErrorCode::NotFound => 10003,
            ErrorCode::InternalError => 20000,
            ErrorCode::DataAccessError => 20002,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::DataAccessError => "DATA_ACCESS_ERROR",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::Ok => "Ok",
            ErrorCode::BadRequest => "Bad request",
            ErrorCode::ValidationError => "Validation error",
            ErrorCode::NotFound => "Requested resource is not found",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DataAccessError => "Data access error",
        }
    }

    /// `"<message> - <detail>"`, or the bare message when `detail` is blank.
    pub fn message_with(self, detail: &str) -> String {
        let detail = detail.trim();
        if detail.is_empty() {
            self.message().to_string()
        } else {
            format!("{} - {detail}", self.message())
        }
    }

    pub fn is_client_side_error(self) -> bool {
        (10000..20000).contains(&self.code())
    }

    pub fn is_server_side_error(self) -> bool {
        self.code() >= 20000
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
