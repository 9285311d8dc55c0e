// Copyright 2026 Quarry Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for Quarry
//!
//! This module defines all error types used throughout the planner and
//! executor.

use thiserror::Error;

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Quarry planning and execution
///
/// This enum covers all error cases including both sentinel errors
/// and structured errors with context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Lookup errors
    // =========================================================================
    /// CTE not found in the dependency graph
    #[error("CTE '{0}' not found")]
    CteNotFound(String),

    /// Column not found in an operator schema
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    // =========================================================================
    // Argument errors
    // =========================================================================
    /// Invalid argument for a public entry point
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Evaluation errors
    // =========================================================================
    /// Expression evaluation failed with message
    #[error("expression evaluation failed: {message}")]
    ExpressionEvaluation { message: String },

    /// Type error
    #[error("type error: {0}")]
    Type(String),

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Operation not supported
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Internal error for unexpected conditions
    #[error("{message}")]
    Internal { message: String },

    /// Query cancelled
    #[error("query cancelled")]
    QueryCancelled,
}

impl Error {
    /// Create a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new ExpressionEvaluation error
    pub fn expression_evaluation(message: impl Into<String>) -> Self {
        Error::ExpressionEvaluation {
            message: message.into(),
        }
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::CteNotFound(_) | Error::ColumnNotFound(_))
    }

    /// Check if this error is a cooperative cancellation signal
    ///
    /// Cancellation is non-retriable and distinct from computation errors;
    /// rows already emitted before it surfaced remain valid.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::QueryCancelled)
    }
}
