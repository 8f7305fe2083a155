// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Lan2RF client library.
//!
//! The taxonomy keeps failure classes distinct so callers can react
//! appropriately: bad credentials are not the same as an unreachable
//! gateway, and a malformed payload is not the same as a rejected write.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials were required by the gateway and missing or rejected.
    #[error("authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// The HTTP exchange with the gateway failed.
    #[error("gateway communication error: {0}")]
    Communication(#[from] CommunicationError),

    /// The gateway answered, but not with the expected shape.
    #[error("unexpected gateway response: {0}")]
    UnexpectedResponse(#[from] ResponseError),

    /// The status payload could not be decoded.
    #[error("payload decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A room override value failed client-side validation.
    #[error("invalid override value: {0}")]
    InvalidOverride(#[from] OverrideError),

    /// The gateway reported no bound heaters.
    ///
    /// Usually means the RF binding between the gateway and the heater
    /// has not been made yet.
    #[error("no heaters are bound to the gateway")]
    EmptyHeaterList,
}

/// Errors related to gateway authentication.
///
/// Newer Lan2RF firmwares put the API behind basic auth under `/protect/`;
/// older ones accept unauthenticated requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The gateway rejected the request with an auth-related status.
    #[error("credentials rejected by the gateway (HTTP {status})")]
    Rejected {
        /// The HTTP status code returned (401 or 403).
        status: u16,
    },
}

/// Errors related to the HTTP transport.
#[derive(Debug, Error)]
pub enum CommunicationError {
    /// The request could not be completed (connect failure, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-success HTTP status.
    #[error("gateway returned HTTP {status} ({reason})")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The canonical reason phrase, if known.
        reason: String,
    },
}

/// Errors related to parsing gateway response bodies.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// JSON parsing failed, even after repair of known firmware quirks.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// A field was present but not a byte value (0-255).
    #[error("field {field} is not a byte value")]
    InvalidByte {
        /// The offending field name.
        field: String,
    },

    /// The response body has an unexpected overall shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to decoding the fixed-length status payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload is not the expected fixed length.
    ///
    /// Truncated payloads are never partially decoded.
    #[error("payload length is {actual}, expected {expected}")]
    Length {
        /// The required payload length.
        expected: usize,
        /// The length that was provided.
        actual: usize,
    },
}

/// Errors related to override setpoint validation.
///
/// These are raised client-side, before any network call, so an
/// out-of-range write never reaches the device.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OverrideError {
    /// The setpoint is outside the device's accepted range.
    #[error("setpoint {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum accepted setpoint in degrees Celsius.
        min: f64,
        /// Maximum accepted setpoint in degrees Celsius.
        max: f64,
        /// The value that was provided.
        actual: f64,
    },

    /// The setpoint is not a multiple of the device's 0.5 degree step.
    #[error("setpoint {0} is not a multiple of 0.5")]
    NotHalfStep(f64),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_error_display() {
        let err = OverrideError::OutOfRange {
            min: 5.0,
            max: 30.0,
            actual: 4.9,
        };
        assert_eq!(err.to_string(), "setpoint 4.9 is out of range [5, 30]");
    }

    #[test]
    fn error_from_override_error() {
        let err: Error = OverrideError::NotHalfStep(19.3).into();
        assert!(matches!(
            err,
            Error::InvalidOverride(OverrideError::NotHalfStep(_))
        ));
    }

    #[test]
    fn authentication_error_display() {
        let err = AuthenticationError::Rejected { status: 401 };
        assert_eq!(
            err.to_string(),
            "credentials rejected by the gateway (HTTP 401)"
        );
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::Length {
            expected: 23,
            actual: 7,
        };
        assert_eq!(err.to_string(), "payload length is 7, expected 23");
    }

    #[test]
    fn response_error_display() {
        let err = ResponseError::MissingField("ch_temp_msb".to_string());
        assert_eq!(err.to_string(), "missing field in response: ch_temp_msb");
    }
}
