/// Same-origin audio proxy
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    /// Upstream URL, decoded once by the query extractor
    #[serde(default)]
    pub url: Option<String>,
}

/// GET <proxy path>?url=<encoded>
/// Relay allow-listed upstream MP3 with range request support
pub async fn proxy_audio(
    State(app_state): State<AppState>,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let upstream = query
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Missing url parameter".to_string()))?;

    let audio = app_state.gateway.fetch(&upstream).await?;
    let total = audio.len() as u64;

    // Check for Range header
    if let Some(range) = headers.get(header::RANGE) {
        let range_str = range
            .to_str()
            .map_err(|_| ServerError::BadRequest("Invalid Range header".to_string()))?;

        if let Some((start, end)) = parse_range(range_str, total) {
            let content_length = end - start + 1;
            let body = Body::from(audio[start as usize..=end as usize].to_vec());

            let response = Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, "audio/mpeg")
                .header(header::CONTENT_LENGTH, content_length)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, total),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .body(body)
                .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))?;

            return Ok(response);
        }
    }

    // No usable range - relay the whole payload
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::CONTENT_LENGTH, total)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from(audio))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Parse HTTP Range header
/// Format: "bytes=start-end" or "bytes=start-"
fn parse_range(range: &str, size: u64) -> Option<(u64, u64)> {
    let range = range.strip_prefix("bytes=")?;

    if let Some((start_str, end_str)) = range.split_once('-') {
        let start: u64 = start_str.parse().ok()?;
        let end: u64 = if end_str.is_empty() {
            size.checked_sub(1)?
        } else {
            end_str.parse::<u64>().ok()?.min(size.checked_sub(1)?)
        };

        if start <= end && end < size {
            return Some((start, end));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("bytes=0-999", 10000), Some((0, 999)));
        assert_eq!(parse_range("bytes=1000-", 10000), Some((1000, 9999)));
        assert_eq!(parse_range("bytes=0-9999", 10000), Some((0, 9999)));
        assert_eq!(parse_range("bytes=10000-", 10000), None); // Out of bounds
        assert_eq!(parse_range("invalid", 10000), None);
    }

    #[test]
    fn end_past_payload_is_truncated() {
        assert_eq!(parse_range("bytes=5-500", 10), Some((5, 9)));
    }

    #[test]
    fn empty_payload_has_no_ranges() {
        assert_eq!(parse_range("bytes=0-", 0), None);
    }

    #[test]
    fn suffix_ranges_are_not_supported() {
        assert_eq!(parse_range("bytes=-500", 10000), None);
    }
}
