//! Session trait definition
//!
//! The catalog client only needs one capability from its transport: an
//! authenticated GET returning the response body as text. Implementations live
//! in the infrastructure layer.

use async_trait::async_trait;

use super::GoodreadsError;

/// Raw response handed back by a [`Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    /// Text body, expected to be XML (possibly empty)
    pub content: String,
}

impl SessionResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Authenticated request transport
#[async_trait]
pub trait Session: Send + Sync {
    /// Issue an authenticated GET against `url` with the given query parameters
    async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<SessionResponse, GoodreadsError>;
}
