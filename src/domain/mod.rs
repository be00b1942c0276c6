//! Domain layer - Pure business abstractions
//!
//! This layer contains no transport code: the session contract, review
//! records with their date normalization, and the error type.

pub mod errors;
pub mod review;
pub mod session;

pub use errors::GoodreadsError;
pub use review::{parse_date, ReadAt, Review, ReviewBook};
pub use session::{Session, SessionResponse};
