pub mod goodreads;

pub use goodreads::{AuthUser, Goodreads, RawReview, parse_date_read};
