//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Configuration loading (config)
//! - OAuth1 request signing (oauth)
//! - The reqwest-backed session (session)

pub mod config;
pub mod oauth;
pub mod session;

pub use config::{Config, Credentials};
pub use session::OAuth1Session;
