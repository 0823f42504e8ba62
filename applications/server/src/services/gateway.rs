//! Remote audio gateway
//!
//! Fetches allow-listed upstream audio for the same-origin proxy. The whole
//! body is buffered (bounded by the size cap) so its leading bytes can be
//! checked before anything is relayed.

use crate::config::ProxySettings;
use crate::error::{Result, ServerError};
use reqwest::{header, redirect, Client};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const MAX_REDIRECTS: usize = 10;

pub struct AudioGateway {
    http: Client,
    allowed_hosts: Arc<[String]>,
    max_bytes: u64,
}

impl AudioGateway {
    pub fn new(settings: &ProxySettings) -> Result<Self> {
        let allowed_hosts: Arc<[String]> = settings
            .allowed_hosts
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();

        // Redirects must stay on the allow-list
        let redirect_hosts = Arc::clone(&allowed_hosts);
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if is_allowed_url(&redirect_hosts, attempt.url()) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.clone())
            .redirect(policy)
            .build()
            .map_err(|e| ServerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            allowed_hosts,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Whether `url` may be fetched through the proxy
    pub fn is_allowed(&self, url: &Url) -> bool {
        is_allowed_url(&self.allowed_hosts, url)
    }

    /// Fetch and validate an upstream MP3
    pub async fn fetch(&self, raw: &str) -> Result<Vec<u8>> {
        let url = Url::parse(raw)
            .map_err(|_| ServerError::Forbidden("URL not allowed for proxy".to_string()))?;
        if !self.is_allowed(&url) {
            warn!("Refusing to proxy {}", url);
            return Err(ServerError::Forbidden("URL not allowed for proxy".to_string()));
        }

        let referer = format!("{}/", url.origin().ascii_serialization());
        debug!(url = %url, "Fetching upstream audio");

        let mut response = self
            .http
            .get(url)
            .header(header::ACCEPT, "audio/*,*/*")
            .header(header::REFERER, referer)
            .send()
            .await
            .map_err(|e| ServerError::BadGateway(format!("Failed to fetch audio: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::BadGateway(format!(
                "Upstream returned {}",
                status.as_u16()
            )));
        }

        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ServerError::BadGateway(format!("Failed to read audio: {}", e)))?
        {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        if !looks_like_mp3(&body) {
            let peek = String::from_utf8_lossy(&body[..body.len().min(80)]);
            warn!("Upstream did not return MP3. Peek: {:?}", peek);
            return Err(ServerError::BadGateway(
                "Upstream did not return valid MP3".to_string(),
            ));
        }

        Ok(body)
    }
}

fn too_large() -> ServerError {
    ServerError::PayloadTooLarge("Audio file too large".to_string())
}

/// http(s) URL whose host is an allowed host or a subdomain of one
pub fn is_allowed_url(allowed_hosts: &[String], url: &Url) -> bool {
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    allowed_hosts.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(allowed.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// ID3 tag or an MPEG audio frame sync
pub fn looks_like_mp3(bytes: &[u8]) -> bool {
    match bytes {
        [b'I', b'D', b'3', ..] => true,
        [0xFF, second, ..] => matches!(second, 0xFB | 0xFA | 0xF3 | 0xF2),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec!["ethiopianorthodox.org".to_string()]
    }

    #[test]
    fn exact_and_subdomain_hosts_allowed() {
        let allowed = hosts();
        for raw in [
            "https://ethiopianorthodox.org/a.mp3",
            "http://www.ethiopianorthodox.org/a.mp3",
            "https://WWW.EthiopianOrthodox.org/a.mp3",
        ] {
            assert!(is_allowed_url(&allowed, &Url::parse(raw).unwrap()), "{raw}");
        }
    }

    #[test]
    fn lookalike_hosts_refused() {
        let allowed = hosts();
        for raw in [
            "https://evilethiopianorthodox.org/a.mp3",
            "https://ethiopianorthodox.org.evil.example/a.mp3",
            "ftp://ethiopianorthodox.org/a.mp3",
        ] {
            assert!(!is_allowed_url(&allowed, &Url::parse(raw).unwrap()), "{raw}");
        }
    }

    #[test]
    fn mp3_signatures() {
        assert!(looks_like_mp3(b"ID3\x04\x00"));
        assert!(looks_like_mp3(&[0xFF, 0xFB, 0x90]));
        assert!(looks_like_mp3(&[0xFF, 0xF3]));
        assert!(!looks_like_mp3(&[0xFF, 0xE0]));
        assert!(!looks_like_mp3(b"<!DOCTYPE html>"));
        assert!(!looks_like_mp3(b"I"));
        assert!(!looks_like_mp3(&[]));
    }
}
