use std::time::Duration;

use futures_util::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use saver_logging::{saver_debug, saver_info};
use url::Url;

use crate::retry::RetryPolicy;
use crate::{EmbedResult, FailureKind, FetchError};

pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// oEmbed base address; the post URL is appended as the `url` query parameter.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 1024 * 1024,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<EmbedResult, FetchError>;
}

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ( )` is escaped, so a space
/// becomes `%20` rather than the form-encoded `+`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')');

/// Builds `{endpoint}?url={percent-encoded source}`, keeping any query the
/// endpoint already carries.
pub fn oembed_request_url(endpoint: &str, source_url: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(endpoint)
        .map_err(|err| FetchError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
    let param = format!("url={}", utf8_percent_encode(source_url, URI_COMPONENT));
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{param}"),
        _ => param,
    };
    url.set_query(Some(&query));
    Ok(url)
}

/// Single-attempt oEmbed client. Wrap it in [`crate::RetryingFetcher`] for the
/// retry policy.
#[derive(Debug, Clone)]
pub struct OembedFetcher {
    settings: FetchSettings,
}

impl OembedFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Fetcher for OembedFetcher {
    async fn fetch(&self, url: &str) -> Result<EmbedResult, FetchError> {
        let request_url = oembed_request_url(&self.settings.endpoint, url)?;
        let client = self.build_client()?;

        saver_info!("Making request to: {}", request_url);
        let response = client
            .get(request_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        saver_debug!("oEmbed response: {} bytes", bytes.len());

        serde_json::from_slice::<EmbedResult>(&bytes)
            .map_err(|err| FetchError::new(FailureKind::MalformedBody, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_url_is_percent_encoded_into_query() {
        let url = oembed_request_url(
            DEFAULT_OEMBED_ENDPOINT,
            "https://twitter.com/user/status/123?s=20&t=x",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://publish.twitter.com/oembed?url=https%3A%2F%2Ftwitter.com%2Fuser%2Fstatus%2F123%3Fs%3D20%26t%3Dx"
        );
        let decoded: Vec<_> = url.query_pairs().collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].1, "https://twitter.com/user/status/123?s=20&t=x");
    }

    #[test]
    fn spaces_use_percent_twenty_and_unreserved_marks_stay() {
        let url = oembed_request_url("https://example.com/oembed", "a b~'(x)*").unwrap();
        assert_eq!(url.query(), Some("url=a%20b~%27(x)*"));
        let decoded: Vec<_> = url.query_pairs().collect();
        assert_eq!(decoded[0].1, "a b~'(x)*");
    }

    #[test]
    fn existing_endpoint_query_is_kept() {
        let url = oembed_request_url("https://example.com/oembed?omit_script=1", "x y").unwrap();
        assert_eq!(url.query(), Some("omit_script=1&url=x%20y"));
    }

    #[test]
    fn unparsable_endpoint_is_reported() {
        let err = oembed_request_url("not an endpoint", "https://twitter.com/x").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidEndpoint);
    }
}
