use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CellId, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedPayload,
    DetachedCell,
    UnknownObject,
    Evaluator,
}

/// Error as delivered over the payload channel back to the embedding UI.
/// Carries the machine-readable code so receivers classify on it instead of
/// sniffing the message text.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct EvalError {
    pub code: ErrorCode,
    pub message: String,
}

impl EvalError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed '{kind}' payload: {source}")]
    MalformedPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    /// A disclosure request arrived for a cell the host no longer tracks.
    /// This is a lifecycle bug, not a user-facing condition, so it must be
    /// surfaced rather than swallowed.
    #[error("no live cell context for cell {cell:?}; disclosure request dropped")]
    DetachedCell { cell: CellId },
    #[error("evaluator has no value registered under object id {object_id:?}")]
    UnknownObject { object_id: ObjectId },
}

impl From<ProtocolError> for EvalError {
    fn from(value: ProtocolError) -> Self {
        let code = match &value {
            ProtocolError::MalformedPayload { .. } => ErrorCode::MalformedPayload,
            ProtocolError::DetachedCell { .. } => ErrorCode::DetachedCell,
            ProtocolError::UnknownObject { .. } => ErrorCode::UnknownObject,
        };
        Self {
            code,
            message: value.to_string(),
        }
    }
}
