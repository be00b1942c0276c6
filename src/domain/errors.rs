//! Domain error types
//!
//! Every variant here aborts the run: callers propagate it with `?` up to the
//! single handler in `main`. Recoverable field-level problems (an unreadable
//! date, for instance) never become a `GoodreadsError`.

use std::fmt;

#[derive(Debug)]
pub enum GoodreadsError {
    /// Request could not be sent or the service answered with an error status
    Transport(String),
    /// Response body was empty or not the XML we expected
    Decode(String),
    /// No `user` element under the response root
    MissingUser,
    /// `user` element without a usable `id` attribute
    MissingUserId,
    /// Credentials or settings missing
    Config(String),
}

impl fmt::Display for GoodreadsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoodreadsError::Transport(msg) => write!(f, "Goodreads request failed: {}", msg),
            GoodreadsError::Decode(msg) => write!(f, "Could not parse Goodreads response: {}", msg),
            GoodreadsError::MissingUser => write!(f, "No user found in Goodreads response"),
            GoodreadsError::MissingUserId => write!(f, "Could not get user id from Goodreads"),
            GoodreadsError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GoodreadsError {}

impl From<reqwest::Error> for GoodreadsError {
    fn from(e: reqwest::Error) -> Self {
        GoodreadsError::Transport(e.to_string())
    }
}

impl From<quick_xml::de::DeError> for GoodreadsError {
    fn from(e: quick_xml::de::DeError) -> Self {
        GoodreadsError::Decode(e.to_string())
    }
}
