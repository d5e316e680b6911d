//! The persistent cookie store.
//!
//! [`CookieStore`] wraps a [`CookieJar`] and remembers every URL cookies
//! were set for, so the whole jar can be replayed and written out later
//! (see [`persistence`](crate::cookies::persistence)).
//!
//! # Example
//! ```
//! use persistjar::{Cookie, CookieStore, JarOptions};
//! use url::Url;
//!
//! let store = CookieStore::new(JarOptions::default())?;
//! let url = Url::parse("https://a.example/")?;
//! store.set_cookies(&url, vec![Cookie::new("s", "1")])?;
//!
//! let mut buf = Vec::new();
//! store.write(&mut buf)?;
//!
//! let restored = CookieStore::new(JarOptions::default())?;
//! restored.read(buf.as_slice())?;
//! assert_eq!(restored.cookies(&url)[0].value, "1");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::cookies::cookie::Cookie;
use crate::cookies::error::{CookieResult, RejectedCookie};
use crate::cookies::jar::{CookieJar, JarOptions};
use crate::cookies::monster::CookieMonster;
use http::header::SET_COOKIE;
use http::HeaderMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// A cookie jar plus the registry of URLs cookies have been set for.
pub struct CookieStore<J: CookieJar = CookieMonster> {
    jar: J,
    // Normalized URLs that went through `set_cookies`. Never shrinks.
    urls: Mutex<BTreeSet<Url>>,
}

impl CookieStore<CookieMonster> {
    /// Create a store backed by a [`CookieMonster`] built from `options`.
    ///
    /// Fails with [`CookieError::Configuration`](crate::CookieError::Configuration)
    /// if the jar rejects the options.
    pub fn new(options: JarOptions) -> CookieResult<Self> {
        Ok(Self::with_jar(CookieMonster::with_options(options)?))
    }
}

impl<J: CookieJar> CookieStore<J> {
    /// Create a store around an existing jar.
    pub fn with_jar(jar: J) -> Self {
        Self {
            jar,
            urls: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn jar(&self) -> &J {
        &self.jar
    }

    /// Cookies the jar would send to `url`.
    ///
    /// Does not register `url`: reading cookies never makes a URL persistent.
    pub fn cookies(&self, url: &Url) -> Vec<Cookie> {
        self.jar.cookies(url)
    }

    /// Register `url` and hand `cookies` to the jar.
    ///
    /// The registry entry is kept even if the jar refuses the batch.
    pub fn set_cookies(
        &self,
        url: &Url,
        cookies: Vec<Cookie>,
    ) -> CookieResult<Vec<RejectedCookie>> {
        let mut urls = self.lock_urls();

        let key = registry_key(url);
        if !urls.contains(&key) {
            tracing::debug!(url = %key, "registering cookie url");
            urls.insert(key);
        }

        self.jar.set_cookies(url, cookies)
    }

    /// Parse every `Set-Cookie` header in `headers` and store the results for `url`.
    ///
    /// Header values that cannot be parsed are skipped.
    pub fn set_cookies_from_headers(
        &self,
        url: &Url,
        headers: &HeaderMap,
    ) -> CookieResult<Vec<RejectedCookie>> {
        let mut cookies = Vec::new();
        for value in headers.get_all(SET_COOKIE) {
            let Ok(line) = value.to_str() else {
                tracing::warn!(url = %url, "skipping non-ASCII Set-Cookie header");
                continue;
            };
            match Cookie::parse(line) {
                Ok(cookie) => cookies.push(cookie),
                Err(e) => tracing::warn!(url = %url, error = %e, "failed to parse Set-Cookie header"),
            }
        }

        self.set_cookies(url, cookies)
    }

    /// The `Cookie` request header value for `url`, if any cookie matches.
    pub fn request_header(&self, url: &Url) -> Option<String> {
        let cookies = self.cookies(url);
        if cookies.is_empty() {
            return None;
        }

        Some(
            cookies
                .iter()
                .map(Cookie::pair)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Current cookies for every registered URL.
    ///
    /// The registry is copied under the lock; the jar is queried after
    /// releasing it, so the result reflects live jar state.
    pub fn cookies_all(&self) -> BTreeMap<Url, Vec<Cookie>> {
        let urls: Vec<Url> = self.lock_urls().iter().cloned().collect();

        urls.into_iter()
            .map(|url| {
                let cookies = self.jar.cookies(&url);
                (url, cookies)
            })
            .collect()
    }

    /// Number of distinct registered URLs.
    pub fn registered_urls(&self) -> usize {
        self.lock_urls().len()
    }

    fn lock_urls(&self) -> MutexGuard<'_, BTreeSet<Url>> {
        // The set is never left half-updated, so a poisoned lock is still usable.
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Collapse equivalent addresses: scheme, lowercase host and path only.
fn registry_key(url: &Url) -> Url {
    let mut key = url.clone();
    key.set_query(None);
    key.set_fragment(None);
    // These fail only for URLs that cannot carry credentials or a port.
    let _ = key.set_username("");
    let _ = key.set_password(None);
    let _ = key.set_port(None);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::error::CookieError;
    use http::HeaderValue;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_registry_key_normalizes() {
        assert_eq!(
            registry_key(&url("https://user:pw@A.Example:8443/p?q=1#frag")),
            url("https://a.example/p")
        );
    }

    #[test]
    fn test_same_address_registered_once() {
        let store = CookieStore::new(JarOptions::default()).unwrap();
        store
            .set_cookies(&url("https://a.example/"), vec![Cookie::new("a", "1")])
            .unwrap();
        store
            .set_cookies(&url("https://A.EXAMPLE/?x=y"), vec![Cookie::new("b", "2")])
            .unwrap();

        assert_eq!(store.registered_urls(), 1);
        assert_eq!(store.cookies_all().len(), 1);
    }

    #[test]
    fn test_cookies_does_not_register() {
        let store = CookieStore::new(JarOptions::default()).unwrap();
        let u = url("https://a.example/");
        store.jar().set_cookies(&u, vec![Cookie::new("direct", "1")]).unwrap();

        assert_eq!(store.cookies(&u).len(), 1);
        assert!(store.cookies_all().is_empty());
    }

    #[test]
    fn test_unsupported_url_still_registered() {
        let store = CookieStore::new(JarOptions::default()).unwrap();
        let result = store.set_cookies(&url("ftp://files.example/"), vec![Cookie::new("a", "1")]);

        assert!(matches!(result, Err(CookieError::UnsupportedUrl { .. })));
        assert_eq!(store.registered_urls(), 1);
    }

    #[test]
    fn test_set_cookies_from_headers() {
        let store = CookieStore::new(JarOptions::default()).unwrap();
        let u = url("https://a.example/login");

        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("sid=abc; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("garbage"));

        let rejected = store.set_cookies_from_headers(&u, &headers).unwrap();
        assert!(rejected.is_empty());
        assert_eq!(
            store.request_header(&url("https://a.example/")).as_deref(),
            Some("sid=abc; theme=dark")
        );
    }

    #[test]
    fn test_request_header_none_without_cookies() {
        let store = CookieStore::new(JarOptions::default()).unwrap();
        assert_eq!(store.request_header(&url("https://a.example/")), None);
    }

    #[test]
    fn test_invalid_options() {
        let result = CookieStore::new(JarOptions::new().max_cookies_per_domain(0));
        assert!(matches!(result, Err(CookieError::Configuration { .. })));
    }
}
