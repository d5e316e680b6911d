//! The jar contract the store persists, and the options of the built-in jar.

use crate::cookies::cookie::Cookie;
use crate::cookies::error::{CookieError, CookieResult, RejectedCookie};
use crate::cookies::psl::{MozillaPsl, PublicSuffixList};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Maximum cookies per domain (Chromium default).
pub const DEFAULT_MAX_COOKIES_PER_DOMAIN: usize = 50;

/// Maximum total cookies.
/// Chromium uses 3300, but we use a slightly lower limit to keep memory usage predictable.
pub const DEFAULT_MAX_COOKIES_TOTAL: usize = 3000;

/// A cookie jar: owns matching, scoping, expiry and acceptance policy.
///
/// Jars are shared between callers, so they synchronize internally and
/// every method takes `&self`.
pub trait CookieJar: Send + Sync {
    /// Cookies that should be sent to `url`, with expired ones excluded.
    fn cookies(&self, url: &Url) -> Vec<Cookie>;

    /// Store `cookies` as if received in a response from `url`.
    ///
    /// Cookies refused by the jar's policy are returned, not stored.
    /// An `Err` means the whole batch was refused.
    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>) -> CookieResult<Vec<RejectedCookie>>;
}

impl<J: CookieJar + ?Sized> CookieJar for Arc<J> {
    fn cookies(&self, url: &Url) -> Vec<Cookie> {
        (**self).cookies(url)
    }

    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>) -> CookieResult<Vec<RejectedCookie>> {
        (**self).set_cookies(url, cookies)
    }
}

/// Construction options for [`CookieMonster`](crate::cookies::monster::CookieMonster).
///
/// # Example
/// ```
/// use persistjar::JarOptions;
///
/// let options = JarOptions::new()
///     .max_cookies_per_domain(20)
///     .max_cookies_total(500);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct JarOptions {
    /// List used to reject cookies on public suffixes.
    /// `None` disables the check, so any parent domain of the host is accepted.
    pub public_suffix_list: Option<Arc<dyn PublicSuffixList>>,
    pub max_cookies_per_domain: usize,
    pub max_cookies_total: usize,
}

impl Default for JarOptions {
    fn default() -> Self {
        Self {
            public_suffix_list: Some(Arc::new(MozillaPsl)),
            max_cookies_per_domain: DEFAULT_MAX_COOKIES_PER_DOMAIN,
            max_cookies_total: DEFAULT_MAX_COOKIES_TOTAL,
        }
    }
}

impl fmt::Debug for JarOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JarOptions")
            .field("public_suffix_list", &self.public_suffix_list.is_some())
            .field("max_cookies_per_domain", &self.max_cookies_per_domain)
            .field("max_cookies_total", &self.max_cookies_total)
            .finish()
    }
}

impl JarOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public_suffix_list(mut self, list: impl PublicSuffixList + 'static) -> Self {
        self.public_suffix_list = Some(Arc::new(list));
        self
    }

    pub fn without_public_suffix_list(mut self) -> Self {
        self.public_suffix_list = None;
        self
    }

    pub fn max_cookies_per_domain(mut self, max: usize) -> Self {
        self.max_cookies_per_domain = max;
        self
    }

    pub fn max_cookies_total(mut self, max: usize) -> Self {
        self.max_cookies_total = max;
        self
    }

    pub fn validate(&self) -> CookieResult<()> {
        if self.max_cookies_per_domain == 0 {
            return Err(CookieError::configuration(
                "max_cookies_per_domain must be positive",
            ));
        }
        if self.max_cookies_total < self.max_cookies_per_domain {
            return Err(CookieError::configuration(format!(
                "max_cookies_total ({}) is below max_cookies_per_domain ({})",
                self.max_cookies_total, self.max_cookies_per_domain
            )));
        }
        Ok(())
    }
}
