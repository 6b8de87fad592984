//! UI/backend events and error modeling for the viewer controller.

use shared::error::{ErrorCode, EvalError};
use shared::protocol::CellUpdate;

pub enum UiEvent {
    Info(String),
    CellUpdated { title: String, update: CellUpdate },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Protocol,
    Lifecycle,
    Evaluator,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Disclosure,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Evaluator errors carry a machine-readable code; map it straight to a
    /// category.
    pub fn from_eval(context: UiErrorContext, error: EvalError) -> Self {
        let category = match error.code {
            ErrorCode::MalformedPayload | ErrorCode::UnknownObject => UiErrorCategory::Protocol,
            ErrorCode::DetachedCell => UiErrorCategory::Lifecycle,
            ErrorCode::Evaluator => UiErrorCategory::Evaluator,
        };
        Self {
            category,
            context,
            message: error.message,
        }
    }

    /// Fallback for free-form failures with no typed code (worker startup).
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("malformed") || message_lower.contains("invalid") {
            UiErrorCategory::Protocol
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_classifies_as_protocol() {
        let err = UiError::from_message(UiErrorContext::General, "malformed tree payload");
        assert_eq!(err.category(), UiErrorCategory::Protocol);
    }

    #[test]
    fn eval_error_codes_map_straight_to_categories() {
        let unknown_object = UiError::from_eval(
            UiErrorContext::Disclosure,
            EvalError::new(ErrorCode::UnknownObject, "no value registered"),
        );
        assert_eq!(unknown_object.category(), UiErrorCategory::Protocol);
        assert_eq!(unknown_object.context(), UiErrorContext::Disclosure);
        assert_eq!(unknown_object.message(), "no value registered");

        let detached = UiError::from_eval(
            UiErrorContext::Disclosure,
            EvalError::new(ErrorCode::DetachedCell, "no live cell context"),
        );
        assert_eq!(detached.category(), UiErrorCategory::Lifecycle);

        let evaluator = UiError::from_eval(
            UiErrorContext::General,
            EvalError::new(ErrorCode::Evaluator, "failed to serialize cell value"),
        );
        assert_eq!(evaluator.category(), UiErrorCategory::Evaluator);
    }

    #[test]
    fn unrecognized_text_falls_back_to_unknown() {
        let err = UiError::from_message(UiErrorContext::General, "something odd happened");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), "something odd happened");
    }
}
