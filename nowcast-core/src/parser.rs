//! Maps the provider's JSON payload onto [`WeatherSnapshot`].
//!
//! The payload is parsed into a generic [`serde_json::Value`] tree first, then every
//! required field is looked up by path. The first path that is absent or mistyped is
//! reported, so an error payload (unknown city, bad key) is easy to tell apart from a
//! body that isn't JSON at all.

use serde_json::Value;

use crate::{
    error::{FieldProblem, Result, WeatherError},
    model::WeatherSnapshot,
};

/// Every field a snapshot is built from, in the order they're checked.
pub const REQUIRED_PATHS: [&str; 12] = [
    "name",
    "id",
    "coord.lon",
    "coord.lat",
    "weather[0].main",
    "weather[0].description",
    "main.temp",
    "main.pressure",
    "main.humidity",
    "wind.speed",
    "wind.deg",
    "clouds.all",
];

/// Parse a JSON response body into a snapshot. Nothing is returned unless all
/// [`REQUIRED_PATHS`] are present with the right types.
pub fn parse_snapshot(body: &str) -> Result<WeatherSnapshot> {
    let root: Value = serde_json::from_str(body).map_err(WeatherError::MalformedResponse)?;
    let doc = Document { root: &root };

    Ok(WeatherSnapshot {
        city_name: doc.string("name")?,
        city_id: doc.integer("id")?,
        longitude: doc.float("coord.lon")?,
        latitude: doc.float("coord.lat")?,
        title: doc.string("weather[0].main")?,
        description: doc.string("weather[0].description")?,
        temperature: doc.float("main.temp")?,
        pressure: doc.integer("main.pressure")?,
        humidity: doc.integer("main.humidity")?,
        wind_speed: doc.float("wind.speed")?,
        wind_direction: doc.integer("wind.deg")?,
        cloud_cover: doc.integer("clouds.all")?,
    })
}

struct Document<'a> {
    root: &'a Value,
}

impl<'a> Document<'a> {
    fn string(&self, path: &'static str) -> Result<String> {
        let value = self.lookup(path)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| self.incomplete(path, wrong_type("a string")))
    }

    fn integer(&self, path: &'static str) -> Result<i64> {
        let value = self.lookup(path)?;
        value
            .as_i64()
            .ok_or_else(|| self.incomplete(path, wrong_type("an integer")))
    }

    fn float(&self, path: &'static str) -> Result<f64> {
        let value = self.lookup(path)?;
        value
            .as_f64()
            .ok_or_else(|| self.incomplete(path, wrong_type("a number")))
    }

    /// Walks `path` (dot-separated keys, `key[n]` for list items).
    fn lookup(&self, path: &'static str) -> Result<&'a Value> {
        let mut node = self.root;

        for segment in path.split('.') {
            let (key, index) = split_index(segment);

            node = match node {
                Value::Object(map) => map
                    .get(key)
                    .ok_or_else(|| self.incomplete(path, FieldProblem::Missing))?,
                _ => {
                    return Err(self.incomplete(path, wrong_type("an object")));
                }
            };

            if let Some(index) = index {
                node = match node {
                    Value::Array(items) if items.is_empty() => {
                        return Err(self.incomplete(path, FieldProblem::EmptyList));
                    }
                    Value::Array(items) => items
                        .get(index)
                        .ok_or_else(|| self.incomplete(path, FieldProblem::Missing))?,
                    _ => {
                        return Err(self.incomplete(path, wrong_type("a list")));
                    }
                };
            }
        }

        if node.is_null() {
            return Err(self.incomplete(path, FieldProblem::Missing));
        }
        Ok(node)
    }

    fn incomplete(&self, path: &'static str, problem: FieldProblem) -> WeatherError {
        let provider_message = self.provider_message();
        log::debug!("Incomplete weather payload at '{path}': {problem}");

        WeatherError::IncompleteResponse {
            path,
            problem,
            provider_message,
        }
    }

    /// `message` from the provider's `{"cod": ..., "message": ...}` error envelope.
    fn provider_message(&self) -> Option<String> {
        let obj = self.root.as_object()?;
        if !obj.contains_key("cod") {
            return None;
        }
        obj.get("message").and_then(Value::as_str).map(str::to_owned)
    }
}

fn wrong_type(expected: &'static str) -> FieldProblem {
    FieldProblem::WrongType { expected }
}

fn split_index(segment: &str) -> (&str, Option<usize>) {
    match segment.split_once('[') {
        Some((key, rest)) => {
            let index = rest.trim_end_matches(']').parse().ok();
            (key, index)
        }
        None => (segment, None),
    }
}
