use reqwest::Url;

use crate::{
    error::{Result, WeatherError},
    location::LocationSpec,
    model::{RawResponse, WeatherSnapshot},
    options::QueryOptions,
    parser::parse_snapshot,
    request::{CURRENT_WEATHER_URL, build_url, redacted},
    transport::{BlockingTransport, HttpTransport, Transport},
};

/// Entry point for current-weather queries.
///
/// Holds only immutable settings, so one client can serve any number of concurrent
/// queries. Nothing is cached: every call performs its own fetch.
#[derive(Debug, Clone)]
pub struct WeatherClient<T = HttpTransport> {
    api_key: String,
    endpoint: String,
    transport: T,
}

impl WeatherClient<HttpTransport> {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self::with_transport(api_key, HttpTransport::new())
    }
}

impl<T> WeatherClient<T> {
    pub fn with_transport<S: Into<String>>(api_key: S, transport: T) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: CURRENT_WEATHER_URL.to_string(),
            transport,
        }
    }

    /// Point the client at another "current weather" endpoint (proxy, test server).
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The URL a query would be sent to.
    pub fn request_url(&self, location: &LocationSpec, options: &QueryOptions) -> Result<Url> {
        build_url(&self.endpoint, &self.api_key, location, options)
    }

    /// Checks shared by both execution modes; runs before any network call.
    fn prepare_snapshot(&self, location: &LocationSpec, options: &QueryOptions) -> Result<Url> {
        if !options.format.is_structured() {
            return Err(WeatherError::usage(format!(
                "a weather snapshot can only be parsed from json responses, not {}",
                options.format
            )));
        }
        self.prepare_raw(location, options)
    }

    fn prepare_raw(&self, location: &LocationSpec, options: &QueryOptions) -> Result<Url> {
        let url = self.request_url(location, options)?;
        log::debug!(
            "Querying current weather by {} for {location}: {}",
            location.kind(),
            redacted(&url)
        );
        Ok(url)
    }
}

impl<T: Transport> WeatherClient<T> {
    /// Fetch and parse current conditions.
    ///
    /// Fails with [`WeatherError::Usage`] before touching the network when `options`
    /// asks for anything but JSON.
    pub async fn current(
        &self,
        location: &LocationSpec,
        options: &QueryOptions,
    ) -> Result<WeatherSnapshot> {
        let url = self.prepare_snapshot(location, options)?;
        let body = self.transport.fetch(&url).await?;
        parse_snapshot(&body)
    }

    /// Fetch the response body unparsed, in whatever format `options` asks for.
    pub async fn current_raw(
        &self,
        location: &LocationSpec,
        options: &QueryOptions,
    ) -> Result<RawResponse> {
        let url = self.prepare_raw(location, options)?;
        let body = self.transport.fetch(&url).await?;
        Ok(RawResponse {
            format: options.format,
            body,
        })
    }
}

impl<T: BlockingTransport> WeatherClient<T> {
    /// Blocking counterpart of [`WeatherClient::current`].
    pub fn current_blocking(
        &self,
        location: &LocationSpec,
        options: &QueryOptions,
    ) -> Result<WeatherSnapshot> {
        let url = self.prepare_snapshot(location, options)?;
        let body = self.transport.fetch_blocking(&url)?;
        parse_snapshot(&body)
    }

    /// Blocking counterpart of [`WeatherClient::current_raw`].
    pub fn current_raw_blocking(
        &self,
        location: &LocationSpec,
        options: &QueryOptions,
    ) -> Result<RawResponse> {
        let url = self.prepare_raw(location, options)?;
        let body = self.transport.fetch_blocking(&url)?;
        Ok(RawResponse {
            format: options.format,
            body,
        })
    }
}
