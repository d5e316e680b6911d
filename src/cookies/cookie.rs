//! The cookie record exchanged with callers and written to disk.

use crate::cookies::canonical_cookie::SameSite;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One cookie's full attribute set, as set by callers and as returned by the jar.
///
/// Missing fields decode to their defaults, so `{"name":"s","value":"1"}`
/// is a valid serialized record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (not URL-decoded).
    pub value: String,

    /// Path attribute. `None` lets the jar derive the default path from the URL.
    pub path: Option<String>,

    /// Domain attribute. `None` means host-only.
    pub domain: Option<String>,

    /// Absolute expiry, stored as a unix timestamp. `None` is a session cookie.
    #[serde(with = "time::serde::timestamp::option")]
    pub expires: Option<OffsetDateTime>,

    /// Max-Age in seconds. Takes precedence over `expires`; zero or negative deletes.
    pub max_age: Option<i64>,

    pub secure: bool,

    pub http_only: bool,

    pub same_site: SameSite,

    /// Unparsed `Set-Cookie` text this record came from, if any.
    pub raw: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Parse a `Set-Cookie` header value.
    ///
    /// # Example
    /// ```
    /// use persistjar::Cookie;
    ///
    /// let cookie = Cookie::parse("id=42; Path=/; Secure; HttpOnly").unwrap();
    /// assert_eq!(cookie.name, "id");
    /// assert_eq!(cookie.path.as_deref(), Some("/"));
    /// assert!(cookie.secure);
    /// ```
    pub fn parse(line: &str) -> Result<Self, cookie::ParseError> {
        let parsed = cookie::Cookie::parse(line)?;

        Ok(Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            path: parsed.path().map(str::to_string),
            domain: parsed.domain().map(str::to_string),
            expires: parsed.expires_datetime(),
            max_age: parsed.max_age().map(|age| age.whole_seconds()),
            secure: parsed.secure().unwrap_or(false),
            http_only: parsed.http_only().unwrap_or(false),
            same_site: parsed.same_site().map(SameSite::from).unwrap_or_default(),
            raw: Some(line.to_string()),
        })
    }

    /// The `name=value` pair sent in a `Cookie` request header.
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}
