//! Cookie file example.
//!
//! This example saves a cookie session to a file and restores it into a
//! fresh store, the way a client would across restarts.

use persistjar::{CookieStore, JarOptions};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use url::Url;

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::temp_dir().join("persistjar-cookies.json");

    // First session: receive cookies from a server
    let store = CookieStore::new(JarOptions::default())?;
    let url = Url::parse("https://example.com/login")?;

    let mut headers = http::HeaderMap::new();
    headers.append(
        http::header::SET_COOKIE,
        "session_id=abc123; Path=/; Secure; HttpOnly".parse()?,
    );
    headers.append(
        http::header::SET_COOKIE,
        "user_pref=dark_mode; Path=/; Max-Age=86400".parse()?,
    );
    // Rejected: 'co.uk' is a public suffix
    headers.append(
        http::header::SET_COOKIE,
        "evil=supercookie; Domain=.co.uk".parse()?,
    );

    let rejected = store.set_cookies_from_headers(&url, &headers)?;
    for r in &rejected {
        println!("Rejected {}: {}", r.name, r.reason);
    }

    store.write(BufWriter::new(File::create(&path)?))?;
    println!("Saved cookies to {}", path.display());

    // Second session: restore from disk
    let restored = CookieStore::new(JarOptions::default())?;
    restored.read(BufReader::new(File::open(&path)?))?;

    for (url, cookies) in restored.cookies_all() {
        println!("{url}:");
        for cookie in cookies {
            println!("  {}={}", cookie.name, cookie.value);
        }
    }
    println!(
        "Cookie header: {}",
        restored.request_header(&url).unwrap_or_default()
    );

    Ok(())
}
