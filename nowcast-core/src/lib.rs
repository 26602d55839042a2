//! Core library for the `nowcast` CLI.
//!
//! This crate defines:
//! - Location and option types describing a current-weather query
//! - Request URL construction for the provider's "current weather" endpoint
//! - Blocking and async transports over HTTP
//! - Validated parsing of the JSON payload into a [`WeatherSnapshot`]
//!
//! It is used by `nowcast-cli`, but can also be reused by other binaries or services.
//!
//! ```no_run
//! use nowcast_core::{LocationSpec, QueryOptions, Units, WeatherClient};
//!
//! let client = WeatherClient::new("YOUR_API_KEY");
//! let options = QueryOptions::default().with_units(Units::Metric);
//! let snapshot = client.current_blocking(&LocationSpec::city("London"), &options)?;
//! println!("{}: {} {}", snapshot.city_name, snapshot.temperature, snapshot.description);
//! # Ok::<(), nowcast_core::WeatherError>(())
//! ```

pub mod client;
pub mod error;
pub mod location;
pub mod model;
pub mod options;
pub mod parser;
pub mod request;
pub mod transport;

pub use client::WeatherClient;
pub use error::{FieldProblem, TransportError, WeatherError};
pub use location::LocationSpec;
pub use model::{RawResponse, WeatherSnapshot};
pub use options::{QueryOptions, ResponseFormat, Units};
pub use parser::parse_snapshot;
pub use request::build_url;
pub use transport::{BlockingTransport, HttpTransport, Transport};

/// URL type accepted by transports.
pub use reqwest::Url;
