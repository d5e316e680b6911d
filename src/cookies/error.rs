//! Cookie store error types.
//!
//! Per-cookie policy outcomes (a cookie the jar refuses to store) are not
//! errors; they are reported as [`RejectedCookie`] values so that one bad
//! cookie never aborts a whole batch.

use thiserror::Error;

/// Errors returned by the cookie store and its jar.
#[derive(Debug, Error)]
pub enum CookieError {
    /// The jar rejected its construction options.
    #[error("Invalid cookie jar configuration: {message}")]
    Configuration { message: String },

    /// Serializing the cookie set or writing it to the sink failed.
    #[error("Failed to encode cookies")]
    Encoding(#[source] std::io::Error),

    /// The source did not contain a valid serialized cookie set.
    #[error("Failed to decode cookies")]
    Decoding(#[source] serde_json::Error),

    /// A serialized URL key could not be parsed.
    #[error("Invalid URL in cookie data: {url}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL cannot carry cookies (non-HTTP scheme or no host).
    #[error("URL cannot hold cookies: {url}")]
    UnsupportedUrl { url: String },
}

impl CookieError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CookieError::Configuration {
            message: message.into(),
        }
    }

    pub fn unsupported_url(url: &url::Url) -> Self {
        CookieError::UnsupportedUrl {
            url: url.to_string(),
        }
    }
}

/// Result type alias for cookie store operations.
pub type CookieResult<T> = Result<T, CookieError>;

/// Why the jar refused to store a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieRejection {
    /// The cookie has an empty name.
    InvalidName,
    /// The Domain attribute is a public suffix (e.g. `com`, `co.uk`).
    PublicSuffix,
    /// The request host does not domain-match the Domain attribute.
    DomainMismatch,
    /// `__Secure-` / `__Host-` prefix requirements are not met.
    InvalidPrefix,
}

impl std::fmt::Display for CookieRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            CookieRejection::InvalidName => "empty cookie name",
            CookieRejection::PublicSuffix => "cookie domain is a public suffix",
            CookieRejection::DomainMismatch => "cookie domain does not match host",
            CookieRejection::InvalidPrefix => "cookie prefix validation failed",
        };
        f.write_str(reason)
    }
}

/// A cookie the jar did not store, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCookie {
    pub name: String,
    pub reason: CookieRejection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = CookieError::configuration("max_cookies_per_domain must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid cookie jar configuration: max_cookies_per_domain must be positive"
        );
    }

    #[test]
    fn test_url_parse_keeps_source() {
        use std::error::Error as _;

        let source = url::Url::parse("not a url").unwrap_err();
        let err = CookieError::UrlParse {
            url: "not a url".to_string(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("not a url"));
    }
}
