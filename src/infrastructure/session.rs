//! OAuth1-signed HTTP session backed by reqwest

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use super::config::Credentials;
use super::oauth;
use crate::domain::{GoodreadsError, Session, SessionResponse};

const USER_AGENT: &str = concat!("rattle/", env!("CARGO_PKG_VERSION"));

pub struct OAuth1Session {
    client: reqwest::Client,
    credentials: Credentials,
}

impl OAuth1Session {
    /// Reopen a session from previously granted access tokens
    pub fn new(credentials: Credentials) -> Result<Self, GoodreadsError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GoodreadsError::Transport(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
        })
    }
}

#[async_trait]
impl Session for OAuth1Session {
    async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<SessionResponse, GoodreadsError> {
        let header = oauth::authorization_header(
            &self.credentials,
            "GET",
            url,
            params,
            &oauth::generate_nonce(),
            &oauth::current_timestamp(),
        );

        tracing::debug!("GET {} ({} params)", url, params.len());

        let resp = self
            .client
            .get(url)
            .query(params)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GoodreadsError::Transport(format!(
                "Goodreads API returned status: {}",
                status
            )));
        }

        let content = resp
            .text()
            .await
            .map_err(|e| GoodreadsError::Transport(format!("Failed to read response body: {}", e)))?;

        Ok(SessionResponse::new(content))
    }
}
