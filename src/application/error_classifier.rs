use tracing::error;

use crate::domain::errors::BridgeError;
use crate::domain::models::Envelope;
use crate::infrastructure::logging::scrub;

/// `error` field for credential failures.
pub const AUTHENTICATION_ERROR_TAG: &str = "authentication_error";

/// User-facing message for credential failures.
pub const AUTHENTICATION_MESSAGE: &str = "invalid credential; configure a valid key";

/// User-facing message for every other failure.
pub const FALLBACK_MESSAGE: &str = "Something went wrong while processing your request";

/// Maps a run failure to the single `error` envelope sent to the host.
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Credential failures get a fixed tag and message whatever the provider said.
    /// Anything else keeps its diagnostic, scrubbed of secrets, next to a generic message.
    pub fn classify(failure: &BridgeError) -> Envelope {
        if let BridgeError::Reasoning(reasoning) = failure {
            if reasoning.is_authentication() {
                error!(error = %scrub(&failure.to_string()), "authentication failed");
                return Envelope::Error {
                    error: AUTHENTICATION_ERROR_TAG.to_string(),
                    message: AUTHENTICATION_MESSAGE.to_string(),
                };
            }
        }

        let diagnostic = scrub(&failure.to_string());
        error!(error = %diagnostic, "run failed");
        Envelope::Error {
            error: diagnostic,
            message: FALLBACK_MESSAGE.to_string(),
        }
    }
}
