// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use thiserror::Error;

/// The error type for sarest operations
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Request cannot be built (inconsistent operation fields, bad header value, etc.)
    RequestInvalid,

    /// The time source failed to produce the signing time
    ClockUnavailable,

    /// The request could not be delivered to the appliance
    TransportFailed,

    /// The appliance answered with a non-success status
    ServerRejected,

    /// Unexpected errors (serialization, I/O, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without the kind prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if the signed request could not be built at all.
    ///
    /// Nothing was sent to the appliance when this returns `true`.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ConfigInvalid | ErrorKind::RequestInvalid | ErrorKind::ClockUnavailable
        )
    }

    /// Check if the appliance was unreachable
    pub fn is_transport_error(&self) -> bool {
        self.kind == ErrorKind::TransportFailed
    }

    /// Check if the appliance returned a negative result
    pub fn is_server_rejection(&self) -> bool {
        self.kind == ErrorKind::ServerRejected
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a clock unavailable error
    pub fn clock_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClockUnavailable, message)
    }

    /// Create a transport failed error
    pub fn transport_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportFailed, message)
    }

    /// Create a server rejected error
    pub fn server_rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerRejected, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ClockUnavailable => write!(f, "clock unavailable"),
            ErrorKind::TransportFailed => write!(f, "transport failed"),
            ErrorKind::ServerRejected => write!(f, "rejected by appliance"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = Error::request_invalid("push requires a factor id");
        assert!(err.is_request_error());
        assert!(!err.is_transport_error());
        assert!(!err.is_server_rejection());
        assert_eq!(err.to_string(), "invalid request: push requires a factor id");

        let err = Error::transport_failed("connection refused");
        assert!(err.is_transport_error());
        assert!(!err.is_request_error());

        let err = Error::server_rejected("appliance returned 401 Unauthorized");
        assert!(err.is_server_rejection());
        assert_eq!(err.kind(), ErrorKind::ServerRejected);
        assert_eq!(err.message(), "appliance returned 401 Unauthorized");
    }

    #[test]
    fn test_error_keeps_source() {
        let err = Error::unexpected("serialize payload").with_source(anyhow::anyhow!("eof"));
        let source = std::error::Error::source(&err).expect("source must be kept");
        assert_eq!(source.to_string(), "eof");
    }
}
