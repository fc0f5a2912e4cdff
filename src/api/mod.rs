//! REST API Wrappers
//!
//! One async function per backend endpoint, organized by domain. Each
//! function only shapes the request and decodes the response; state
//! changes happen in `client_cache::flows`.

mod posts;
mod notifications;
mod directory;
mod media;
mod users;

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use client_cache::{ClientError, ClientResult, Page};

use crate::config::AppConfig;

pub use media::*;

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'?').add(b'<').add(b'>');

/// `{ "data": ... }` wrapper used for single resources
#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Laravel error body (`message` plus per-field validation errors)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: normalize_base(&config.api_base_url),
            token,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "request rejected");
        Err(ClientError::http(status.as_u16(), error_message(status.as_u16(), &body)))
    }

    async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = self.send(builder).await?;
        let envelope: DataEnvelope<T> = response.json().await.map_err(transport_error)?;
        Ok(envelope.data)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> ClientResult<()> {
        self.send(builder).await.map(|_| ())
    }

    async fn fetch_page<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Vec<T>> {
        let builder = self.request(Method::GET, path).query(query);
        let response = self.send(builder).await?;
        let page: Page<T> = response.json().await.map_err(transport_error)?;
        Ok(page.data)
    }
}

fn normalize_base(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// Escape an id for use as a path segment
fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Offset-based list mapped onto Laravel's 1-based `page` parameter
fn page_for_offset(offset: usize, page_size: usize) -> usize {
    offset / page_size.max(1) + 1
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}

/// Best user-facing message from an error body
///
/// First validation error wins, then `message`, then a generic text.
fn error_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .errors
        .values()
        .flat_map(|messages| messages.first())
        .next()
        .cloned()
        .or(parsed.message)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let config = AppConfig { api_base_url: "https://hub.example.com/api".into(), ..Default::default() };
        let api = ApiClient::new(&config, None);
        assert_eq!(api.url("/posts"), "https://hub.example.com/api/posts");
        assert_eq!(api.url("posts/1/comments"), "https://hub.example.com/api/posts/1/comments");
        assert!(!api.is_authenticated());
    }

    #[test]
    fn test_segment_escapes_reserved() {
        assert_eq!(segment("42"), "42");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_page_for_offset() {
        assert_eq!(page_for_offset(0, 10), 1);
        assert_eq!(page_for_offset(10, 10), 2);
        assert_eq!(page_for_offset(30, 10), 4);
    }

    #[test]
    fn test_error_message_prefers_validation() {
        let body = r#"{"message":"The given data was invalid.","errors":{"body":["The body field is required."]}}"#;
        assert_eq!(error_message(422, body), "The body field is required.");
        assert_eq!(error_message(403, r#"{"message":"Forbidden"}"#), "Forbidden");
        assert_eq!(error_message(500, "<html>"), "Request failed with status 500");
    }
}
