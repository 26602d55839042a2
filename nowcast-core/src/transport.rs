use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::{
    error::{BoxError, TransportError},
    request::redacted,
};

/// Fetches a URL without blocking the calling task.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// One GET; returns the full body of a 2xx response.
    async fn fetch(&self, url: &Url) -> Result<String, TransportError>;
}

/// Fetches a URL on the calling thread.
///
/// Must not be called from inside an async runtime worker.
pub trait BlockingTransport: Send + Sync + Debug {
    fn fetch_blocking(&self, url: &Url) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport for both execution modes.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        let shown = redacted(url);
        log::debug!("GET {shown}");

        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: shown.clone(),
                source: Box::new(e),
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| Box::new(e) as BoxError);

        check_status(shown, status, body)
    }
}

impl BlockingTransport for HttpTransport {
    fn fetch_blocking(&self, url: &Url) -> Result<String, TransportError> {
        let shown = redacted(url);
        log::debug!("GET {shown} (blocking)");

        // Built per call: a blocking client owns a runtime thread of its own.
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| TransportError::Request {
                url: shown.clone(),
                source: Box::new(e),
            })?;

        let res = http
            .get(url.clone())
            .send()
            .map_err(|e| TransportError::Request {
                url: shown.clone(),
                source: Box::new(e),
            })?;

        let status = res.status();
        let body = res.text().map_err(|e| Box::new(e) as BoxError);

        check_status(shown, status, body)
    }
}

/// Classifies a finished exchange. A non-2xx status wins over a failed body read.
fn check_status(
    url: String,
    status: StatusCode,
    body: Result<String, BoxError>,
) -> Result<String, TransportError> {
    if !status.is_success() {
        log::debug!("Request to {url} failed with status {status}");
        let excerpt = match &body {
            Ok(text) => truncate_body(text),
            Err(_) => String::new(),
        };
        return Err(TransportError::Status {
            url,
            status: status.as_u16(),
            body: excerpt,
        });
    }

    let body = body.map_err(|source| TransportError::Body {
        url: url.clone(),
        source,
    })?;
    log::debug!("Received {} bytes from {url}", body.len());
    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
