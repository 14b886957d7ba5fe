//! User-facing messages for rejected operations.
//!
//! The service asks the localizer for text only after it has decided the
//! outcome; the localizer never influences control flow.

use crate::error::FailureKind;

pub trait ApiResourceLocalizer: Send + Sync {
    fn message(&self, kind: FailureKind) -> String;
}

/// English messages, used when no other localizer is configured.
#[derive(Debug, Clone, Default)]
pub struct EnglishLocalizer;

impl ApiResourceLocalizer for EnglishLocalizer {
    fn message(&self, kind: FailureKind) -> String {
        let text = match kind {
            FailureKind::ApiResourceExists => "An API resource with this name already exists",
            FailureKind::ApiResourceDoesNotExist => "The API resource does not exist",
            FailureKind::ApiScopeExists => {
                "An API scope with this name already exists for the API resource"
            }
            FailureKind::ApiScopeDoesNotExist => "The API scope does not exist",
            FailureKind::ApiSecretExists => "An identical API secret already exists",
            FailureKind::ApiSecretDoesNotExist => "The API secret does not exist",
            FailureKind::ApiSecretTypeUnknown => "The secret type is not supported",
            FailureKind::ApiSecretHashTypeUnknown => "The hash type is not supported",
            FailureKind::ApiResourcePropertyExists => {
                "A property with this key already exists for the API resource"
            }
            FailureKind::ApiResourcePropertyDoesNotExist => {
                "The API resource property does not exist"
            }
            FailureKind::IdentifierRequired => "An identifier is required for this operation",
        };
        text.to_string()
    }
}
