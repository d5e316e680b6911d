//! Cookie persistence - write and read a store's cookies as JSON.
//!
//! The format is a single JSON object mapping each registered URL to the
//! cookies the jar currently holds for it:
//!
//! ```json
//! {"https://a.example/":[{"name":"s","value":"1","path":"/", ...}]}
//! ```
//!
//! Opening and closing files is left to the caller; any `io::Write` /
//! `io::Read` works.

use crate::cookies::cookie::Cookie;
use crate::cookies::error::{CookieError, CookieResult};
use crate::cookies::jar::CookieJar;
use crate::cookies::store::CookieStore;
use serde_json::Deserializer;
use std::collections::BTreeMap;
use std::io;
use url::Url;

/// On-disk form: URL string to cookie records.
type SerializedCookies = BTreeMap<String, Vec<Cookie>>;

impl<J: CookieJar> CookieStore<J> {
    /// Write every registered URL's current cookies to `writer`, followed by a newline.
    ///
    /// # Example
    /// ```ignore
    /// let file = std::fs::File::create("cookies.json")?;
    /// store.write(std::io::BufWriter::new(file))?;
    /// ```
    pub fn write<W: io::Write>(&self, mut writer: W) -> CookieResult<()> {
        let data: SerializedCookies = self
            .cookies_all()
            .into_iter()
            .map(|(url, cookies)| (url.to_string(), cookies))
            .collect();

        let mut buf = serde_json::to_vec(&data).map_err(|e| CookieError::Encoding(e.into()))?;
        buf.push(b'\n');
        writer
            .write_all(&buf)
            .and_then(|()| writer.flush())
            .map_err(CookieError::Encoding)?;

        tracing::debug!(urls = data.len(), "wrote cookies");
        Ok(())
    }

    /// Read cookies previously produced by [`write`](Self::write) and set them.
    ///
    /// An empty source, or a bare `null`, is not an error. URLs are applied in order; if one
    /// fails, the ones before it stay applied. Cookies the jar refuses are
    /// skipped.
    pub fn read<R: io::Read>(&self, reader: R) -> CookieResult<()> {
        let data = match Deserializer::from_reader(reader)
            .into_iter::<Option<SerializedCookies>>()
            .next()
            .transpose()
            .map_err(CookieError::Decoding)?
            .flatten()
        {
            Some(data) => data,
            None => {
                tracing::debug!("cookie source is empty");
                return Ok(());
            }
        };

        let total = data.len();
        for (raw_url, cookies) in data {
            let url = Url::parse(&raw_url).map_err(|source| CookieError::UrlParse {
                url: raw_url.clone(),
                source,
            })?;

            let rejected = self.set_cookies(&url, cookies)?;
            if !rejected.is_empty() {
                tracing::debug!(
                    url = %url,
                    rejected = rejected.len(),
                    "jar refused stored cookies"
                );
            }
        }

        tracing::debug!(urls = total, "read cookies");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cookies::cookie::Cookie;
    use crate::cookies::error::CookieError;
    use crate::cookies::jar::JarOptions;
    use crate::cookies::store::CookieStore;
    use tempfile::tempdir;
    use url::Url;

    fn store() -> CookieStore {
        CookieStore::new(JarOptions::default()).unwrap()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let original = store();
        let url = Url::parse("https://example.com/").unwrap();
        let mut cookie = Cookie::new("session", "abc123");
        cookie.path = Some("/".to_string());
        cookie.domain = Some("example.com".to_string());
        cookie.secure = true;
        cookie.http_only = true;
        original.set_cookies(&url, vec![cookie]).unwrap();

        // Save to temp file
        let dir = tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        original
            .write(std::fs::File::create(&path).unwrap())
            .unwrap();

        // Load back
        let loaded = store();
        loaded.read(std::fs::File::open(&path).unwrap()).unwrap();

        let cookies = loaded.cookies(&url);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "session");
        assert_eq!(cookies[0].value, "abc123");
        assert_eq!(cookies[0].domain.as_deref(), Some("example.com"));
        assert!(cookies[0].secure);
        assert!(cookies[0].http_only);
    }

    #[test]
    fn test_write_ends_with_newline() {
        let s = store();
        let mut buf = Vec::new();
        s.write(&mut buf).unwrap();
        assert_eq!(buf, b"{}\n");
    }

    #[test]
    fn test_read_whitespace_only_is_empty() {
        let s = store();
        s.read(" \n\t".as_bytes()).unwrap();
        assert_eq!(s.registered_urls(), 0);
    }

    #[test]
    fn test_read_null_is_empty() {
        let s = store();
        s.read("null\n".as_bytes()).unwrap();
        assert_eq!(s.registered_urls(), 0);
    }

    #[test]
    fn test_read_rejects_wrong_shape() {
        let s = store();
        let err = s.read(r#"["https://a.example/"]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, CookieError::Decoding(_)));
    }

    #[test]
    fn test_read_skips_rejected_cookies() {
        let s = store();
        let data = r#"{"https://a.example/":[
            {"name":"ok","value":"1","path":"/"},
            {"name":"bad","value":"2","path":"/","domain":"other.example"}
        ]}"#;
        s.read(data.as_bytes()).unwrap();

        let cookies = s.cookies(&Url::parse("https://a.example/").unwrap());
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "ok");
    }
}
