//! Playable-URL resolution
//!
//! Decides whether a track URL can be handed to the audio output as is or
//! must be routed through the same-origin proxy.

use mezgebe_core::Track;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;
use tracing::warn;
use url::{Origin, Url};

/// Characters `encodeURIComponent` leaves as is
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Rewrites cross-origin audio URLs to the proxy endpoint
#[derive(Debug, Clone)]
pub struct UrlResolver {
    app_origin: Option<Origin>,
    proxy_path: String,
}

impl UrlResolver {
    /// Create a resolver for an app served from `app_origin`
    ///
    /// A missing or unparseable origin disables proxying.
    pub fn new(app_origin: Option<&str>, proxy_path: impl Into<String>) -> Self {
        let app_origin = app_origin.and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url.origin()),
            Err(e) => {
                warn!("Ignoring malformed app origin {:?}: {}", raw, e);
                None
            }
        });

        Self {
            app_origin,
            proxy_path: proxy_path.into(),
        }
    }

    /// Resolver that never proxies (non-browser hosts, tests)
    pub fn passthrough() -> Self {
        Self::new(None, "/audio-proxy")
    }

    pub fn proxy_path(&self) -> &str {
        &self.proxy_path
    }

    /// Whether `raw` would be rewritten
    pub fn needs_proxy(&self, raw: &str) -> bool {
        let Some(app_origin) = &self.app_origin else {
            return false;
        };
        let Ok(url) = Url::parse(raw) else {
            return false;
        };
        matches!(url.scheme(), "http" | "https") && url.origin() != *app_origin
    }

    /// Playable URL for `raw`
    ///
    /// Same-origin, relative, non-http and malformed inputs come back
    /// unchanged.
    pub fn resolve<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.needs_proxy(raw) {
            Cow::Owned(self.proxy_url(raw))
        } else {
            Cow::Borrowed(raw)
        }
    }

    /// Playable URL for a track, preferring its offline copy
    pub fn resolve_track<'a>(&self, track: &'a Track) -> Cow<'a, str> {
        self.resolve(track.preferred_source())
    }

    /// Proxy URL for `raw`, unconditionally
    pub fn proxy_url(&self, raw: &str) -> String {
        format!(
            "{}?url={}",
            self.proxy_path,
            utf8_percent_encode(raw, URI_COMPONENT)
        )
    }
}

impl Default for UrlResolver {
    fn default() -> Self {
        Self::passthrough()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> UrlResolver {
        UrlResolver::new(Some("https://app.example"), "/audio-proxy")
    }

    #[test]
    fn same_origin_is_unchanged() {
        let url = "https://app.example/audio/1.mp3";
        assert_eq!(resolver().resolve(url), url);
    }

    #[test]
    fn cross_origin_is_proxied() {
        let resolved = resolver().resolve("https://www.ethiopianorthodox.org/a b.mp3");
        assert_eq!(
            resolved,
            "/audio-proxy?url=https%3A%2F%2Fwww.ethiopianorthodox.org%2Fa%20b.mp3"
        );
    }

    #[test]
    fn proxy_url_keeps_unreserved_marks() {
        let resolved = resolver().resolve("https://www.ethiopianorthodox.org/(tsome)~v1!.mp3?x=1&y=*");
        assert_eq!(
            resolved,
            "/audio-proxy?url=https%3A%2F%2Fwww.ethiopianorthodox.org%2F(tsome)~v1!.mp3%3Fx%3D1%26y%3D*"
        );
    }

    #[test]
    fn different_port_is_cross_origin() {
        assert!(resolver().needs_proxy("https://app.example:8443/a.mp3"));
    }

    #[test]
    fn malformed_and_relative_pass_through() {
        assert_eq!(resolver().resolve("not a url"), "not a url");
        assert_eq!(resolver().resolve("/offline/a.mp3"), "/offline/a.mp3");
        assert_eq!(resolver().resolve("blob:https://app.example/x"), "blob:https://app.example/x");
    }

    #[test]
    fn no_origin_never_proxies() {
        let url = "https://elsewhere.example/a.mp3";
        assert_eq!(UrlResolver::passthrough().resolve(url), url);
    }

    #[test]
    fn malformed_origin_disables_proxying() {
        let resolver = UrlResolver::new(Some("::::"), "/audio-proxy");
        assert!(!resolver.needs_proxy("https://elsewhere.example/a.mp3"));
    }

    #[test]
    fn offline_copy_wins() {
        let track = Track::new("1", "One", "https://elsewhere.example/1.mp3")
            .with_local_uri("/offline/1.mp3");
        assert_eq!(resolver().resolve_track(&track), "/offline/1.mp3");
    }
}
