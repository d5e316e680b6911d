//! Cookie storage and persistence.
//!
//! This module provides:
//!
//! - **Store**: [`CookieStore`](store::CookieStore), a jar plus the registry of
//!   URLs cookies were set for
//! - **Jar**: the [`CookieJar`](jar::CookieJar) contract and the built-in
//!   in-memory jar ([`CookieMonster`](monster::CookieMonster))
//! - **Persistence**: JSON write/read of the whole store ([`persistence`])
//! - **PSL**: public suffix checks used when accepting Domain attributes
//!
//! # Architecture
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`CookieStore`](store::CookieStore) | URL registry, replay, serialization |
//! | [`CookieMonster`](monster::CookieMonster) | Matching, expiry, eviction, domain policy |
//! | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Cookie as held by the jar |
//! | [`Cookie`](cookie::Cookie) | Cookie record set by callers and written to disk |
//!
//! The store never interprets cookies itself; everything about which cookie
//! applies where is decided by the jar.

pub mod canonical_cookie;
pub mod cookie;
pub mod error;
pub mod jar;
pub mod monster;
pub mod persistence;
pub mod psl;
pub mod store;
