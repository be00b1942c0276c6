//! Goodreads catalog client
//!
//! Resolves the authenticated user and fetches their reviews through the XML
//! API. Responses are decoded into the schemas below right at the boundary;
//! anything that does not fit them is a fatal `GoodreadsError`.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{GoodreadsError, ReadAt, Review, ReviewBook, Session, parse_date};
use crate::infrastructure::Config;
use crate::infrastructure::config::DEFAULT_BASE_URL;

/// Identity behind the session's access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub link: Option<String>,
}

// XML schemas. quick-xml ignores the root element name (checked separately by
// `check_root`) and any element we do not list (`Request`, `shelf`, `body`, ...).

const ROOT_ELEMENT: &[u8] = b"GoodreadsResponse";

#[derive(Debug, Deserialize)]
struct AuthUserResponse {
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    #[serde(rename = "@id")]
    id: Option<String>,
    name: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    reviews: ReviewsNode,
}

#[derive(Debug, Deserialize)]
struct ReviewsNode {
    #[serde(rename = "@total")]
    total: Option<String>,
    #[serde(rename = "review", default)]
    entries: Vec<RawReview>,
}

/// One `<review>` entry exactly as the API sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub id: String,
    pub rating: Option<String>,
    pub read_at: Option<String>,
    pub started_at: Option<String>,
    pub date_added: Option<String>,
    pub book: Option<RawBook>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBook {
    pub id: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub authors: Option<RawAuthors>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthors {
    #[serde(rename = "author", default)]
    pub entries: Vec<RawAuthor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    pub name: Option<String>,
}

/// Normalize a review's `read_at` field.
///
/// Never fails: a missing or empty field gives `ReadAt::Empty` and text that
/// is not a Goodreads date comes back untouched as `ReadAt::Unparsed`.
pub fn parse_date_read(review: &RawReview) -> ReadAt {
    parse_date(review.read_at.as_deref())
}

/// Make sure the first element of the document is `<GoodreadsResponse>`
fn check_root(content: &str) -> Result<(), GoodreadsError> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() == ROOT_ELEMENT {
                    return Ok(());
                }
                return Err(GoodreadsError::Decode(format!(
                    "unexpected root element <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {}
            Ok(Event::Eof) => {
                return Err(GoodreadsError::Decode("no root element".to_string()));
            }
            Ok(_) => {
                return Err(GoodreadsError::Decode(
                    "response is not an XML document".to_string(),
                ));
            }
            Err(e) => return Err(GoodreadsError::Decode(format!("XML Parse Error: {}", e))),
        }
    }
}

fn decode<T: DeserializeOwned>(content: &str) -> Result<T, GoodreadsError> {
    if content.trim().is_empty() {
        return Err(GoodreadsError::Decode("empty response body".to_string()));
    }
    check_root(content)?;
    Ok(quick_xml::de::from_str(content)?)
}

/// Treat blank elements (`<isbn nil="true"/>`) like missing ones
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        let read_at = parse_date_read(&raw);
        let started_at = parse_date(raw.started_at.as_deref());
        let date_added = parse_date(raw.date_added.as_deref());

        // Goodreads reports an unrated review as 0
        let rating = raw
            .rating
            .and_then(|r| r.trim().parse::<u8>().ok())
            .filter(|r| *r > 0);

        let book = raw.book.map(|b| ReviewBook {
            id: non_empty(b.id),
            title: non_empty(b.title),
            isbn: non_empty(b.isbn),
            isbn13: non_empty(b.isbn13),
            authors: b
                .authors
                .map(|a| a.entries.into_iter().filter_map(|e| non_empty(e.name)).collect())
                .unwrap_or_default(),
        });

        Review {
            id: raw.id.trim().to_string(),
            rating,
            read_at,
            started_at,
            date_added,
            book,
        }
    }
}

pub struct Goodreads<S> {
    session: S,
    base_url: String,
    api_key: String,
    shelf: Option<String>,
    per_page: Option<u32>,
    user: Option<AuthUser>,
}

impl<S: Session> Goodreads<S> {
    pub fn new(session: S, api_key: impl Into<String>) -> Self {
        Self {
            session,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            shelf: None,
            per_page: None,
            user: None,
        }
    }

    pub fn from_config(session: S, config: &Config) -> Self {
        Self::new(session, config.credentials.api_key.clone())
            .with_base_url(&config.base_url)
            .with_shelf(config.shelf.clone())
            .with_per_page(config.per_page)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_shelf(mut self, shelf: Option<String>) -> Self {
        self.shelf = shelf;
        self
    }

    pub fn with_per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Resolved user id, `None` until [`Goodreads::initialise_user`] succeeds
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// Fetch the identity behind the session without caching it
    pub async fn get_authenticated_user(&self) -> Result<AuthUser, GoodreadsError> {
        let url = format!("{}/api/auth_user", self.base_url);
        let response = self.session.get(&url, &[]).await?;

        let parsed: AuthUserResponse = decode(&response.content)?;
        let user = parsed.user.ok_or(GoodreadsError::MissingUser)?;
        let id = non_empty(user.id).ok_or(GoodreadsError::MissingUserId)?;

        Ok(AuthUser {
            id,
            name: non_empty(user.name).unwrap_or_default(),
            link: non_empty(user.link),
        })
    }

    /// Resolve and cache the current user, returning its id
    pub async fn initialise_user(&mut self) -> Result<&str, GoodreadsError> {
        let user = self.get_authenticated_user().await?;
        tracing::info!("Authenticated as {} (id {})", user.name, user.id);
        Ok(self.user.insert(user).id.as_str())
    }

    /// Fetch the user's reviews in the order Goodreads lists them.
    ///
    /// Resolves the user first if that has not happened yet. Only the first
    /// page is requested.
    pub async fn get_books(&mut self) -> Result<Vec<Review>, GoodreadsError> {
        let cached = self.user_id().map(str::to_string);
        let user_id = match cached {
            Some(id) => id,
            None => self.initialise_user().await?.to_string(),
        };

        let url = format!("{}/review/list/{}.xml", self.base_url, user_id);
        let per_page = self.per_page.map(|p| p.to_string());

        let mut params: Vec<(&str, &str)> = vec![
            ("v", "2"),
            ("id", user_id.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(shelf) = &self.shelf {
            params.push(("shelf", shelf.as_str()));
        }
        if let Some(per_page) = &per_page {
            params.push(("per_page", per_page.as_str()));
        }

        let response = self.session.get(&url, &params).await?;
        let reviews = decode::<ReviewsResponse>(&response.content)?.reviews;

        let books: Vec<Review> = reviews.entries.into_iter().map(Review::from).collect();

        tracing::info!(
            "Fetched {} reviews for user {} (total reported: {})",
            books.len(),
            user_id,
            reviews.total.as_deref().unwrap_or("?")
        );

        Ok(books)
    }
}
