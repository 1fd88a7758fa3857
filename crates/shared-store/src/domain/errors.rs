//! Store error types.
//!
//! Blank keys are not errors: they short-circuit to a default return value.
//! Undecodable payloads are not errors either: they decode to `Decoded::Raw`.

use super::scope::StoreScope;
use thiserror::Error;

/// Failure reported by the underlying store transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The store rejected the request.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Store operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Set,
    Delete,
    Subscribe,
    Unsubscribe,
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreOp::Get => "get",
            StoreOp::Set => "set",
            StoreOp::Delete => "delete",
            StoreOp::Subscribe => "subscribe",
            StoreOp::Unsubscribe => "unsubscribe",
        };
        f.write_str(name)
    }
}

/// Errors from scoped store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The transport call failed. Never retried by this crate.
    #[error("{op} \"{key}\" on {scope} store failed: {source}")]
    Transport {
        op: StoreOp,
        scope: StoreScope,
        key: String,
        #[source]
        source: TransportError,
    },

    /// A typed value could not be turned into JSON.
    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn transport(
        op: StoreOp,
        scope: &StoreScope,
        key: &str,
        source: TransportError,
    ) -> Self {
        StoreError::Transport {
            op,
            scope: scope.clone(),
            key: key.to_string(),
            source,
        }
    }

    /// The transport error behind this failure, if any.
    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            StoreError::Transport { source, .. } => Some(source),
            StoreError::Encode(_) => None,
        }
    }
}
