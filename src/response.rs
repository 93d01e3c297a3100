//! Page responses built from raw API replies.
//!
//! The remote API answers with one JSON object per request. Depending on
//! which outputs were requested, the page body arrives as browser-rendered
//! HTML (plain UTF-8 text) or as a base64-encoded raw HTTP body; this module
//! picks the right representation and rebuilds a response the crawler can
//! consume like any directly fetched page.

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Headers that stop describing the body once the API has decoded it.
/// The API already decompresses the HTTP response body; keeping
/// `Content-Encoding` would make the crawler try to decompress it again.
const REMOVE_HEADERS: &[&str] = &["content-encoding"];

const DEFAULT_ENCODING: &str = "utf-8";

/// A page-like response reconstructed from a render-API reply.
#[derive(Debug, Clone)]
pub struct PageResponse {
    url: String,
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
    /// `Some` for text responses; the declared or assumed charset.
    encoding: Option<String>,
    raw_reply: Map<String, Value>,
}

impl PageResponse {
    /// Build a response from the raw API reply.
    ///
    /// A reply with browser-rendered HTML becomes a text response (the API
    /// renders in UTF-8). A raw HTTP body is base64-decoded and counts as
    /// text only when the reply headers declare a text media type.
    pub fn from_api_reply(reply: Map<String, Value>) -> Result<Self> {
        let url = reply
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Reply("missing \"url\"".to_string()))?
            .to_string();
        let status = reply
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(200);
        let headers = prepare_headers(reply.get("httpResponseHeaders"));

        let (body, encoding) = match reply.get("browserHtml").and_then(Value::as_str) {
            Some(html) if !html.is_empty() => (
                Bytes::from(html.to_string()),
                Some(DEFAULT_ENCODING.to_string()),
            ),
            _ => match reply.get("httpResponseBody").and_then(Value::as_str) {
                Some(encoded) => {
                    let body = Bytes::from(general_purpose::STANDARD.decode(encoded)?);
                    (body, text_encoding(&headers))
                }
                None => (Bytes::new(), None),
            },
        };

        Ok(Self {
            url,
            status,
            headers,
            body,
            encoding,
            raw_reply: reply,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Whether the body is text in a known encoding.
    pub fn is_text(&self) -> bool {
        self.encoding.is_some()
    }

    /// Body as text, for text responses. Invalid byte sequences are
    /// replaced rather than failing the whole page.
    pub fn text(&self) -> Option<String> {
        self.encoding
            .as_ref()
            .map(|_| String::from_utf8_lossy(&self.body).into_owned())
    }

    /// The unmodified API reply, for callers that need outputs beyond the
    /// page body (screenshots, echoed data).
    pub fn raw_reply(&self) -> &Map<String, Value> {
        &self.raw_reply
    }
}

/// Copy `[{name, value}, …]` reply headers, dropping the ones that no
/// longer describe the decoded body.
fn prepare_headers(raw: Option<&Value>) -> Vec<(String, String)> {
    let Some(Value::Array(entries)) = raw else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get("name")?.as_str()?;
            let value = entry.get("value")?.as_str()?;
            if REMOVE_HEADERS.contains(&name.to_lowercase().as_str()) {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Charset for a text media type, `None` for binary content.
fn text_encoding(headers: &[(String, String)]) -> Option<String> {
    let content_type = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.to_lowercase())?;
    let is_text = content_type.starts_with("text/")
        || content_type.contains("json")
        || content_type.contains("xml")
        || content_type.contains("html");
    if !is_text {
        return None;
    }
    let charset = content_type
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("charset="))
        .next()
        .map(|charset| charset.trim_matches('"').to_string());
    Some(charset.unwrap_or_else(|| DEFAULT_ENCODING.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_browser_html_is_text() {
        let response = PageResponse::from_api_reply(reply(json!({
            "url": "https://example.com",
            "browserHtml": "<html><body>hi</body></html>",
        })))
        .unwrap();
        assert!(response.is_text());
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().unwrap(), "<html><body>hi</body></html>");
    }

    #[test]
    fn test_http_body_decoded_as_text() {
        let response = PageResponse::from_api_reply(reply(json!({
            "url": "https://example.com",
            "statusCode": 404,
            "httpResponseBody": "Zm9v",
            "httpResponseHeaders": [
                {"name": "Content-Type", "value": "text/html; charset=utf-8"},
            ],
        })))
        .unwrap();
        assert_eq!(response.status(), 404);
        assert!(response.is_text());
        assert_eq!(response.text().unwrap(), "foo");
    }

    #[test]
    fn test_binary_body_stays_binary() {
        let response = PageResponse::from_api_reply(reply(json!({
            "url": "https://example.com/logo.png",
            "httpResponseBody": "iVBORw0=",
            "httpResponseHeaders": [
                {"name": "Content-Type", "value": "image/png"},
            ],
        })))
        .unwrap();
        assert!(!response.is_text());
        assert!(response.text().is_none());
        assert_eq!(response.body().len(), 5);
    }

    #[test]
    fn test_content_encoding_header_removed() {
        let response = PageResponse::from_api_reply(reply(json!({
            "url": "https://example.com",
            "httpResponseBody": "Zm9v",
            "httpResponseHeaders": [
                {"name": "Content-Encoding", "value": "gzip"},
                {"name": "Content-Type", "value": "text/plain"},
            ],
        })))
        .unwrap();
        assert!(response.header("content-encoding").is_none());
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_body_absent_is_empty() {
        let response = PageResponse::from_api_reply(reply(json!({
            "url": "https://example.com",
            "screenshot": "aWF6eQ==",
        })))
        .unwrap();
        assert!(response.body().is_empty());
        assert!(!response.is_text());
        assert!(response.raw_reply().contains_key("screenshot"));
    }

    #[test]
    fn test_missing_url_is_error() {
        let result = PageResponse::from_api_reply(reply(json!({"statusCode": 200})));
        assert!(matches!(result, Err(Error::Reply(_))));
    }

    #[test]
    fn test_invalid_base64_is_error() {
        let result = PageResponse::from_api_reply(reply(json!({
            "url": "https://example.com",
            "httpResponseBody": "!!!",
        })));
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
