use crate::cookies::cookie::Cookie;
use crate::cookies::error::CookieRejection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A cookie as held inside the jar.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    #[default]
    Unspecified,
    #[serde(rename = "None")]
    NoRestriction,
    Lax,
    Strict,
}

impl From<cookie::SameSite> for SameSite {
    fn from(same_site: cookie::SameSite) -> Self {
        match same_site {
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::None => SameSite::NoRestriction,
        }
    }
}

impl CanonicalCookie {
    /// Session cookies (no expiration) never expire on their own.
    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        self.expiration_time.is_some_and(|expiry| expiry <= current_time)
    }

    /// Whether `other` would overwrite this cookie (same name, domain and path).
    pub fn is_equivalent(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), CookieRejection> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(CookieRejection::InvalidPrefix);
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(CookieRejection::InvalidPrefix);
        }

        Ok(())
    }

    /// Convert back into the record form handed out to callers.
    ///
    /// Host-only cookies come back without a domain and the expiry is always
    /// absolute, so re-setting the record against the same URL recreates
    /// the same cookie.
    pub fn to_record(&self) -> Cookie {
        Cookie {
            name: self.name.clone(),
            value: self.value.clone(),
            path: Some(self.path.clone()),
            domain: (!self.host_only).then(|| self.domain.clone()),
            expires: self.expiration_time,
            max_age: None,
            secure: self.secure,
            http_only: self.http_only,
            same_site: self.same_site,
            raw: None,
        }
    }
}
