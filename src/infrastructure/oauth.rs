//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1)
//!
//! Goodreads only accepts HMAC-SHA1 signatures carried in the
//! `Authorization` header. Access tokens are obtained out of band and loaded
//! from the configuration, so only the signing half of the protocol lives here.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;

use super::config::Credentials;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

/// Percent-encode with the RFC 3986 unreserved set (`A-Z a-z 0-9 - . _ ~`)
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Random alphanumeric nonce, unique per request
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub fn current_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Build the signature base string.
///
/// `url` must not carry a query string; every request parameter (oauth_* and
/// query) goes in `params`.
pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&normalized)
    )
}

/// HMAC-SHA1 over the base string, base64 encoded
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Value for the `Authorization` header of a signed request
pub fn authorization_header(
    credentials: &Credentials,
    method: &str,
    url: &str,
    query: &[(&str, &str)],
    nonce: &str,
    timestamp: &str,
) -> String {
    let mut oauth_params = vec![
        ("oauth_consumer_key".to_string(), credentials.api_key.clone()),
        ("oauth_nonce".to_string(), nonce.to_string()),
        (
            "oauth_signature_method".to_string(),
            SIGNATURE_METHOD.to_string(),
        ),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(query.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    let base_string = signature_base_string(method, url, &all_params);
    let signature = sign(
        &base_string,
        &credentials.api_secret,
        &credentials.access_token_secret,
    );
    oauth_params.push(("oauth_signature".to_string(), signature));

    let fields = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            access_token: "token".to_string(),
            access_token_secret: "token secret".to_string(),
        }
    }

    #[test]
    fn test_percent_encode_reserved() {
        assert_eq!(percent_encode("abc-._~XYZ019"), "abc-._~XYZ019");
        assert_eq!(percent_encode("to read"), "to%20read");
        assert_eq!(percent_encode("a+b=c&d"), "a%2Bb%3Dc%26d");
        assert_eq!(percent_encode("https://x/y"), "https%3A%2F%2Fx%2Fy");
    }

    #[test]
    fn test_base_string_sorts_and_double_encodes() {
        let params = vec![
            ("v".to_string(), "2".to_string()),
            ("shelf".to_string(), "to read".to_string()),
            ("oauth_nonce".to_string(), "abc".to_string()),
        ];
        let base = signature_base_string("get", "https://www.goodreads.com/review/list/1.xml", &params);
        assert_eq!(
            base,
            "GET&https%3A%2F%2Fwww.goodreads.com%2Freview%2Flist%2F1.xml\
             &oauth_nonce%3Dabc%26shelf%3Dto%2520read%26v%3D2"
        );
    }

    #[test]
    fn test_sign_is_deterministic_sha1_digest() {
        let a = sign("GET&x&y", "secret", "token");
        let b = sign("GET&x&y", "secret", "token");
        assert_eq!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), 20);
        assert_ne!(a, sign("GET&x&y", "secret", "other"));
    }

    #[test]
    fn test_authorization_header_fields() {
        let header = authorization_header(
            &credentials(),
            "GET",
            "https://www.goodreads.com/api/auth_user",
            &[],
            "nonce123",
            "1700000000",
        );

        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"key\""));
        assert!(header.contains("oauth_nonce=\"nonce123\""));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_timestamp=\"1700000000\""));
        assert!(header.contains("oauth_token=\"token\""));
        assert!(header.contains("oauth_version=\"1.0\""));
        assert!(header.contains("oauth_signature=\""));
        // Secrets never leave the process
        assert!(!header.contains("secret"));
    }

    #[test]
    fn test_signature_covers_query_params() {
        let url = "https://www.goodreads.com/review/list/1.xml";
        let with_v1 = authorization_header(&credentials(), "GET", url, &[("v", "1")], "n", "1");
        let with_v2 = authorization_header(&credentials(), "GET", url, &[("v", "2")], "n", "1");
        assert_ne!(with_v1, with_v2);
    }

    #[test]
    fn test_generate_nonce() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), 32);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(nonce, generate_nonce());
    }
}
