//! Error taxonomy for the proxy pipeline.
//!
//! Every failure a request can hit maps onto one of four categories, each
//! with a fixed status code. The message carried here is the caller-facing
//! literal; internal detail stays in the logs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// Missing or malformed caller input (400).
    #[error("{0}")]
    Validation(String),

    /// Domain or geofence policy denial (403).
    #[error("{0}")]
    PolicyDenied(String),

    /// Transport-level failure talking to the origin (502).
    #[error("{0}")]
    Upstream(String),

    /// Anything unexpected (500). The caller only ever sees a generic message.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ProxyError {
    /// Status code for the caller-facing response.
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::Validation(_) => 400,
            ProxyError::PolicyDenied(_) => 403,
            ProxyError::Upstream(_) => 502,
            ProxyError::Internal(_) => 500,
        }
    }

    /// Caller-facing message. `Internal` never exposes the source error.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ProxyError::Validation("x".into()).status(), 400);
        assert_eq!(ProxyError::PolicyDenied("x".into()).status(), 403);
        assert_eq!(ProxyError::Upstream("x".into()).status(), 502);
        assert_eq!(
            ProxyError::Internal(anyhow::anyhow!("boom")).status(),
            500
        );
    }

    #[test]
    fn test_internal_hides_source() {
        let err = ProxyError::Internal(anyhow::anyhow!("connection string leaked"));
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_validation_message_passthrough() {
        let err = ProxyError::Validation("Missing origin or id parameter".into());
        assert_eq!(err.message(), "Missing origin or id parameter");
    }
}
