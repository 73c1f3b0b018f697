//! Error types for the OCI provider.

use reqwest::StatusCode;
use thiserror::Error;

use crate::profile::ProfileError;
use crate::provider::ProviderError;

use super::signer::SignerError;

/// Errors raised by the OCI provider.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum OciError {
    /// Raised when a request is missing a required field.
    #[error("invalid request: {0}")]
    Validation(String),
    /// Raised when the credential profile is unusable.
    #[error("profile error: {0}")]
    Profile(String),
    /// Raised when a request cannot be signed.
    #[error("signing error: {0}")]
    Signing(String),
    /// Raised when an endpoint URL is malformed.
    #[error("invalid endpoint `{url}`: {message}")]
    Endpoint {
        /// Offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
    /// Raised when the HTTP exchange itself fails.
    #[error("transport error: {0}")]
    Transport(String),
    /// Raised when the service answers with a non-success status.
    #[error("service error {status} ({code}): {message} [opc-request-id: {opc_request_id}]")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Service error code (for example `NotAuthorizedOrNotFound`).
        code: String,
        /// Service error message.
        message: String,
        /// Request identifier to quote to support.
        opc_request_id: String,
    },
    /// Raised when a response body cannot be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Raised when a resource does not reach the awaited state in time.
    #[error("timed out after {waited_secs}s waiting for {resource} {id} to reach {target}")]
    WaitTimeout {
        /// Resource kind.
        resource: &'static str,
        /// Resource identifier.
        id: String,
        /// Awaited state.
        target: &'static str,
        /// Seconds spent waiting.
        waited_secs: u64,
    },
    /// Raised when a resource enters a state from which the awaited state is
    /// unreachable.
    #[error("{resource} {id} entered {state} while waiting for {target}")]
    UnexpectedState {
        /// Resource kind.
        resource: &'static str,
        /// Resource identifier.
        id: String,
        /// Observed state.
        state: String,
        /// Awaited state.
        target: &'static str,
    },
}

impl OciError {
    /// Returns `true` when the service reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Service { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

impl From<reqwest::Error> for OciError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<ProviderError> for OciError {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::Validation(field) => Self::Validation(field),
        }
    }
}

impl From<ProfileError> for OciError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value.to_string())
    }
}

impl From<SignerError> for OciError {
    fn from(value: SignerError) -> Self {
        Self::Signing(value.to_string())
    }
}
