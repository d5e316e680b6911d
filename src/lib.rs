//! # persistjar
//!
//! A persistent HTTP cookie store for Rust.
//!
//! `persistjar` wraps a cookie jar, remembers every URL cookies were set
//! for, and writes the jar's live contents to any `io::Write` as JSON so a
//! later session can read them back.
//!
//! ## Features
//!
//! - **Cookie Store**: URL registry on top of any [`CookieJar`]
//! - **Built-in Jar**: RFC 6265 matching, expiry, Max-Age, cookie prefixes
//! - **PSL Validation**: Domain attributes on public suffixes are refused
//! - **Persistence**: JSON object of URL to cookie records
//! - **Headers**: `Set-Cookie` ingestion and `Cookie` header generation
//!
//! ## Quick Start
//!
//! ```rust
//! use persistjar::{Cookie, CookieStore, JarOptions};
//! use url::Url;
//!
//! let store = CookieStore::new(JarOptions::default())?;
//! let url = Url::parse("https://example.com/")?;
//! store.set_cookies(&url, vec![Cookie::parse("session=abc; Path=/")?])?;
//!
//! let mut saved = Vec::new();
//! store.write(&mut saved)?;
//!
//! let next_session = CookieStore::new(JarOptions::default())?;
//! next_session.read(saved.as_slice())?;
//! assert_eq!(
//!     next_session.request_header(&url).as_deref(),
//!     Some("session=abc")
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modules
//!
//! - [`cookies`] - Store, jar, cookie types, persistence and PSL checks

pub mod cookies;

pub use cookies::canonical_cookie::SameSite;
pub use cookies::cookie::Cookie;
pub use cookies::error::{CookieError, CookieRejection, CookieResult, RejectedCookie};
pub use cookies::jar::{CookieJar, JarOptions};
pub use cookies::monster::CookieMonster;
pub use cookies::psl::{MozillaPsl, PublicSuffixList};
pub use cookies::store::CookieStore;
