// ABOUTME: Structured error types for repository operations
// ABOUTME: Provides domain-specific database errors with context for booking storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};

/// Errors raised by catalog, staff, and appointment repositories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    /// Requested record does not exist
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of record (appointment, service, staff)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },
    /// Query failed to execute
    #[error("Database query failed: {context}")]
    QueryError {
        /// Description of the failing operation
        context: String,
    },
    /// Could not connect to the backing store
    #[error("Database connection failed: {0}")]
    ConnectionError(String),
    /// The operation did not finish in time
    #[error("Database operation '{operation}' timed out")]
    Timeout {
        /// Name of the operation that timed out
        operation: String,
    },
    /// Stored data could not be decoded
    #[error("Invalid stored data: {context}")]
    InvalidData {
        /// Description of the malformed value
        context: String,
    },
}

impl DatabaseError {
    /// Create a `QueryError` from any displayable error
    #[must_use]
    pub fn query(context: impl Into<String>) -> Self {
        Self::QueryError {
            context: context.into(),
        }
    }

    /// Whether retrying the same operation could succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionError(_) | Self::Timeout { .. })
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        let code = match &error {
            DatabaseError::NotFound { .. } => ErrorCode::ResourceNotFound,
            DatabaseError::ConnectionError(_) | DatabaseError::Timeout { .. } => {
                ErrorCode::ExternalServiceUnavailable
            }
            DatabaseError::QueryError { .. } | DatabaseError::InvalidData { .. } => {
                ErrorCode::DatabaseError
            }
        };
        Self::new(code, error.to_string())
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound {
                entity: "row",
                id: String::new(),
            },
            sqlx::Error::PoolTimedOut => Self::Timeout {
                operation: "acquire connection".to_owned(),
            },
            sqlx::Error::Io(e) => Self::ConnectionError(e.to_string()),
            sqlx::Error::PoolClosed => Self::ConnectionError("connection pool closed".to_owned()),
            other => Self::QueryError {
                context: other.to_string(),
            },
        }
    }
}
