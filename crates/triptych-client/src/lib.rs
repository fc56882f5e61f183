//! Remote fetch adapter for the board backend.
//!
//! The backend exposes a single POST endpoint taking a form body with
//! `actionName=MessagesLoad` plus either `oldMessages=true` (page backwards)
//! or `messageId=<n>` (everything strictly newer than `n`; 0 for the initial
//! load). The response is a JSON envelope with a `Messages` array.

use std::future::Future;

use thiserror::Error;
use tracing::debug;

use triptych_types::wire::MessagesEnvelope;
use triptych_types::{Message, MessageId};

/// What a fetch should ask the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First load: everything the backend will give us.
    Initial,
    /// Page backwards past the earliest message we hold.
    Older,
    /// Everything strictly newer than `since`.
    Newer { since: MessageId },
}

impl FetchKind {
    /// Form parameters for this request, `actionName` included.
    pub fn form_params(&self) -> [(&'static str, String); 2] {
        let (key, value) = match self {
            FetchKind::Initial => ("messageId", "0".to_string()),
            FetchKind::Older => ("oldMessages", "true".to_string()),
            FetchKind::Newer { since } => ("messageId", since.to_string()),
        };
        [("actionName", "MessagesLoad".to_string()), (key, value)]
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Seam between the polling driver and the network.
///
/// The driver only needs "give me messages for this fetch kind"; tests swap
/// in a fake that records what was requested.
pub trait MessageSource: Send + Sync {
    fn fetch(
        &self,
        kind: FetchKind,
    ) -> impl Future<Output = Result<Vec<Message>, FetchError>> + Send;
}

/// HTTP client for the board backend.
#[derive(Debug, Clone)]
pub struct BoardClient {
    http: reqwest::Client,
    endpoint: String,
}

impl BoardClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl MessageSource for BoardClient {
    async fn fetch(&self, kind: FetchKind) -> Result<Vec<Message>, FetchError> {
        debug!("Fetching messages: {:?}", kind);

        let resp = self
            .http
            .post(&self.endpoint)
            .form(&kind.form_params())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body = resp.text().await?;
        let envelope: MessagesEnvelope =
            serde_json::from_str(&body).map_err(FetchError::Decode)?;

        let messages = envelope.into_messages();
        debug!("Fetched {} messages", messages.len());
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_form_params() {
        let params = FetchKind::Initial.form_params();
        assert_eq!(params[0], ("actionName", "MessagesLoad".to_string()));
        assert_eq!(params[1], ("messageId", "0".to_string()));
    }

    #[test]
    fn test_older_form_params() {
        let params = FetchKind::Older.form_params();
        assert_eq!(params[1], ("oldMessages", "true".to_string()));
    }

    #[test]
    fn test_newer_form_params_carry_since() {
        let params = FetchKind::Newer { since: 42 }.form_params();
        assert_eq!(params[1], ("messageId", "42".to_string()));
    }

    #[test]
    fn test_decode_error_classified() {
        let err = serde_json::from_str::<MessagesEnvelope>("{not json")
            .map_err(FetchError::Decode)
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
