use crate::cookies::canonical_cookie::CanonicalCookie;
use crate::cookies::cookie::Cookie;
use crate::cookies::error::{CookieError, CookieRejection, CookieResult, RejectedCookie};
use crate::cookies::jar::{CookieJar, JarOptions};
use crate::cookies::psl;
use dashmap::DashMap;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use url::{Host, Url};

/// Upper bound on cookie lifetime (RFC 6265bis caps Expires/Max-Age at 400 days).
const MAX_COOKIE_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// The built-in cookie jar.
/// Modeled after Chromium's `net::CookieMonster`.
pub struct CookieMonster {
    // Store: Map<Domain, List<Cookie>>
    // Using DashMap for high concurrency.
    store: Arc<DashMap<String, Vec<CanonicalCookie>>>,
    options: JarOptions,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            options: JarOptions::default(),
        }
    }

    /// Create a jar with custom options, rejecting inconsistent limits.
    pub fn with_options(options: JarOptions) -> CookieResult<Self> {
        options.validate()?;
        Ok(Self {
            store: Arc::new(DashMap::new()),
            options,
        })
    }

    pub fn options(&self) -> &JarOptions {
        &self.options
    }

    /// Insert a cookie, replacing any equivalent one.
    ///
    /// An already-expired cookie deletes its equivalent instead of being stored.
    pub fn set_canonical_cookie(&self, cookie: CanonicalCookie) {
        let now = OffsetDateTime::now_utc();
        let mut entry = self.store.entry(cookie.domain.clone()).or_default();

        // Remove existing if name/domain/path match
        entry.retain(|c| !c.is_equivalent(&cookie));

        if cookie.is_expired(now) {
            return;
        }

        // Enforce per-domain limit, evicting the oldest cookie first
        while entry.len() >= self.options.max_cookies_per_domain {
            // Remove oldest cookie (by creation_time)
            if let Some(oldest_idx) = entry
                .iter()
                .enumerate()
                .min_by_key(|(_, c)| c.creation_time)
                .map(|(i, _)| i)
            {
                entry.remove(oldest_idx);
            } else {
                break;
            }
        }

        entry.push(cookie);
        drop(entry); // Release lock before checking global count

        self.enforce_global_limit();
    }

    /// Enforce the global cookie limit by evicting oldest cookies.
    fn enforce_global_limit(&self) {
        while self.total_cookie_count() > self.options.max_cookies_total {
            // Find and remove the oldest cookie across all domains
            let mut oldest: Option<(String, usize, OffsetDateTime)> = None;

            for entry in self.store.iter() {
                let domain = entry.key().clone();
                for (idx, cookie) in entry.value().iter().enumerate() {
                    let dominated = oldest
                        .as_ref()
                        .is_some_and(|(_, _, oldest_time)| cookie.creation_time < *oldest_time);
                    if oldest.is_none() || dominated {
                        oldest = Some((domain.clone(), idx, cookie.creation_time));
                    }
                }
            }

            if let Some((domain, idx, _)) = oldest {
                if let Some(mut entry) = self.store.get_mut(&domain) {
                    if idx < entry.len() {
                        entry.remove(idx);
                    }
                }
            } else {
                break;
            }
        }
    }

    /// Get cookies matching the URL with proper domain suffix matching.
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let mut result = Vec::new();
        if !Self::is_cookieable(url) {
            return result;
        }
        let host = url.host_str().unwrap_or("");
        let now = OffsetDateTime::now_utc();

        // Collect matching domains (host itself and parent domains)
        let domains_to_check = Self::get_matching_domains(host);

        for domain in domains_to_check {
            if let Some(entry) = self.store.get(&domain) {
                for cookie in entry.iter() {
                    // Check domain match
                    if !Self::domain_matches(&cookie.domain, host, cookie.host_only) {
                        continue;
                    }

                    // Check path
                    if !Self::path_matches(&cookie.path, url.path()) {
                        continue;
                    }

                    // Check secure
                    if cookie.secure && url.scheme() != "https" {
                        continue;
                    }

                    // Check expiry
                    if cookie.is_expired(now) {
                        continue;
                    }

                    result.push(cookie.clone());
                }
            }
        }

        // Sort by path length (longest first) then creation time
        result.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
        });

        result
    }

    /// Check if cookie domain matches request host.
    /// Implements RFC 6265 domain matching.
    fn domain_matches(cookie_domain: &str, request_host: &str, host_only: bool) -> bool {
        if host_only {
            // Host-only cookie: exact match required
            return cookie_domain.eq_ignore_ascii_case(request_host);
        }

        psl::domain_matches(request_host, cookie_domain)
    }

    /// Check if request path matches cookie path.
    /// Implements RFC 6265 path matching.
    fn path_matches(cookie_path: &str, request_path: &str) -> bool {
        if request_path == cookie_path {
            return true;
        }

        if request_path.starts_with(cookie_path) {
            // Cookie path is a prefix
            if cookie_path.ends_with('/') {
                return true;
            }
            // Check that the next character in request_path is '/'
            return request_path.as_bytes().get(cookie_path.len()) == Some(&b'/');
        }

        false
    }

    /// Get all domains to check for a given host.
    /// Returns the host itself and all parent domains.
    fn get_matching_domains(host: &str) -> Vec<String> {
        let mut domains = vec![host.to_string()];

        // Add parent domains (e.g., for "foo.bar.example.com", add "bar.example.com", "example.com", "com")
        let parts: Vec<&str> = host.split('.').collect();
        for i in 1..parts.len() {
            domains.push(parts[i..].join("."));
        }

        domains
    }

    /// RFC 6265 default-path: the request path up to, but not including, its last `/`.
    fn default_path(url: &Url) -> String {
        let path = url.path();
        match path.rfind('/') {
            Some(0) | None => "/".to_string(),
            Some(idx) => path[..idx].to_string(),
        }
    }

    fn is_cookieable(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().is_some_and(|host| !host.is_empty())
    }

    /// Resolve the Domain attribute into the stored domain and host-only flag.
    fn cookie_domain(
        &self,
        url: &Url,
        domain_attr: Option<&str>,
    ) -> Result<(String, bool), CookieRejection> {
        let host = url.host_str().unwrap_or("").to_lowercase();

        let domain = match domain_attr
            .map(|d| d.strip_prefix('.').unwrap_or(d).to_lowercase())
            .filter(|d| !d.is_empty())
        {
            Some(domain) => domain,
            None => return Ok((host, true)),
        };

        // IP addresses only ever hold host-only cookies.
        if matches!(url.host(), Some(Host::Ipv4(_)) | Some(Host::Ipv6(_))) {
            return if domain == host {
                Ok((host, true))
            } else {
                Err(CookieRejection::DomainMismatch)
            };
        }

        if let Some(list) = &self.options.public_suffix_list {
            if psl::is_public_suffix_in(list.as_ref(), &domain) {
                // A public suffix host may still set a cookie for itself.
                return if domain == host {
                    Ok((host, true))
                } else {
                    Err(CookieRejection::PublicSuffix)
                };
            }
        }

        if !psl::domain_matches(&host, &domain) {
            return Err(CookieRejection::DomainMismatch);
        }

        Ok((domain, false))
    }

    /// Turn a record received from `url` into a jar cookie.
    fn canonicalize(
        &self,
        url: &Url,
        cookie: Cookie,
        now: OffsetDateTime,
    ) -> Result<CanonicalCookie, CookieRejection> {
        if cookie.name.is_empty() {
            return Err(CookieRejection::InvalidName);
        }

        let (domain, host_only) = self.cookie_domain(url, cookie.domain.as_deref())?;

        let path = match cookie.path {
            Some(path) if path.starts_with('/') => path,
            _ => Self::default_path(url),
        };

        // Max-Age wins over Expires
        let latest = now + Duration::seconds(MAX_COOKIE_AGE_SECS);
        let expiration_time = match cookie.max_age {
            Some(age) if age <= 0 => Some(OffsetDateTime::UNIX_EPOCH),
            Some(age) => Some(now + Duration::seconds(age.min(MAX_COOKIE_AGE_SECS))),
            None => cookie.expires.map(|expiry| expiry.min(latest)),
        }
        // Persisted expiry has whole-second precision
        .map(|expiry| expiry.replace_nanosecond(0).unwrap_or(expiry));

        let canonical = CanonicalCookie {
            name: cookie.name,
            value: cookie.value,
            domain,
            path,
            creation_time: now,
            expiration_time,
            secure: cookie.secure,
            http_only: cookie.http_only,
            host_only,
            same_site: cookie.same_site,
        };

        canonical.validate_prefix(url.scheme() == "https")?;
        Ok(canonical)
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.store.iter().map(|e| e.value().len()).sum()
    }

    /// Clear all cookies.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Iterate over all cookies, including expired ones not yet evicted.
    pub fn iter_all_cookies(&self) -> impl Iterator<Item = CanonicalCookie> + '_ {
        self.store.iter().flat_map(|entry| entry.value().clone())
    }
}

impl CookieJar for CookieMonster {
    fn cookies(&self, url: &Url) -> Vec<Cookie> {
        self.get_cookies_for_url(url)
            .iter()
            .map(CanonicalCookie::to_record)
            .collect()
    }

    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>) -> CookieResult<Vec<RejectedCookie>> {
        if !Self::is_cookieable(url) {
            return Err(CookieError::unsupported_url(url));
        }

        let now = OffsetDateTime::now_utc();
        let mut rejected = Vec::new();

        for cookie in cookies {
            let name = cookie.name.clone();
            match self.canonicalize(url, cookie, now) {
                Ok(canonical) => self.set_canonical_cookie(canonical),
                Err(reason) => {
                    tracing::debug!(url = %url, name = %name, %reason, "cookie rejected");
                    rejected.push(RejectedCookie { name, reason });
                }
            }
        }

        Ok(rejected)
    }
}
