//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use studiobook_domain::StudiobookError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StudiobookError);

impl From<InfraError> for StudiobookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StudiobookError> for InfraError {
    fn from(value: StudiobookError) -> Self {
        InfraError(value)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        let message = if value.is_timeout() {
            format!("request timed out: {value}")
        } else if value.is_connect() {
            format!("connection failed: {value}")
        } else {
            value.to_string()
        };
        InfraError(StudiobookError::Network(message))
    }
}
