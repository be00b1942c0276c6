pub mod domain;
pub mod infrastructure;
pub mod modules;

pub use domain::{GoodreadsError, ReadAt, Review, ReviewBook, Session, SessionResponse};
pub use infrastructure::config;
pub use infrastructure::{Config, Credentials, OAuth1Session};
pub use modules::integrations::goodreads;
pub use modules::integrations::goodreads::Goodreads;
