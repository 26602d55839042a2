//! `HttpTransport` against a local HTTP server serving canned responses.

use std::{
    io::{Read, Write},
    net::TcpListener,
    sync::mpsc,
    thread,
};

use nowcast_core::{LocationSpec, QueryOptions, ResponseFormat, WeatherClient, WeatherError};

const LONDON: &str = r#"{"coord":{"lon":-0.13,"lat":51.51},"weather":[{"id":804,"main":"Clouds","description":"overcast clouds","icon":"04n"}],"base":"stations","main":{"temp":282.55,"feels_like":280.1,"pressure":1012,"humidity":81},"visibility":10000,"wind":{"speed":4.1,"deg":280},"clouds":{"all":90},"dt":1560350645,"id":2643743,"name":"London","cod":200}"#;

const NOT_FOUND: &str = r#"{"cod":"404","message":"city not found"}"#;

/// Serves `responses` in order, one per connection, and reports each request line.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().expect("accept");

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).expect("read request");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let request = String::from_utf8_lossy(&request);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let reason = if status == 200 { "OK" } else { "Not Found" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\n\
                 Content-Type: application/json; charset=utf-8\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).expect("write response");
        }
    });

    (format!("http://{addr}/data/2.5/weather"), rx)
}

fn client(endpoint: &str) -> WeatherClient {
    WeatherClient::new("KEY").with_endpoint(endpoint)
}

#[test]
fn blocking_fetch_parses_snapshot() {
    let (endpoint, requests) = serve(vec![(200, LONDON)]);
    let options = QueryOptions::default();

    let snapshot = client(&endpoint)
        .current_blocking(&LocationSpec::city("London"), &options)
        .expect("snapshot");

    assert_eq!(snapshot.city_name, "London");
    assert_eq!(snapshot.city_id, 2643743);
    assert_eq!(snapshot.temperature, 282.55);
    assert_eq!(snapshot.pressure, 1012);
    assert_eq!(snapshot.wind_direction, 280);
    assert_eq!(snapshot.cloud_cover, 90);

    let request_line = requests.recv().unwrap();
    assert!(request_line.starts_with("GET /data/2.5/weather?q=London&appid=KEY"));
    assert!(request_line.contains("units=standard"));
    assert!(request_line.contains("lang=en"));
    assert!(!request_line.contains("mode="));
}

#[test]
fn blocking_and_async_agree_on_the_same_response() {
    let (endpoint, _requests) = serve(vec![(200, LONDON), (200, LONDON)]);
    let client = client(&endpoint);
    let location = LocationSpec::city_id(2643743);
    let options = QueryOptions::default();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let from_async = runtime
        .block_on(client.current(&location, &options))
        .expect("async snapshot");
    drop(runtime);

    let from_blocking = client
        .current_blocking(&location, &options)
        .expect("blocking snapshot");

    assert_eq!(from_async, from_blocking);
    assert_eq!(from_async.temperature.to_bits(), from_blocking.temperature.to_bits());
}

#[test]
fn blocking_not_found_is_a_transport_error() {
    let (endpoint, _requests) = serve(vec![(404, NOT_FOUND)]);

    let err = client(&endpoint)
        .current_blocking(&LocationSpec::city_id(1), &QueryOptions::default())
        .unwrap_err();

    assert!(matches!(err, WeatherError::Transport(_)));
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("city not found"));
    assert!(!err.to_string().contains("KEY"), "api key must not leak: {err}");
}

#[tokio::test]
async fn async_not_found_is_a_transport_error() {
    let (endpoint, _requests) = serve(vec![(404, NOT_FOUND)]);

    let err = client(&endpoint)
        .current(&LocationSpec::zip("00000", "us"), &QueryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Transport(_)));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn raw_fetch_sends_mode_and_returns_body() {
    let (endpoint, requests) = serve(vec![(200, "<current/>")]);
    let options = QueryOptions::default().with_format(ResponseFormat::Xml);

    let raw = client(&endpoint)
        .current_raw(&LocationSpec::coordinates(51.51, -0.13), &options)
        .await
        .expect("raw body");

    assert_eq!(raw.body, "<current/>");
    let request_line = requests.recv().unwrap();
    assert!(request_line.contains("lat=51.51&lon=-0.13"));
    assert!(request_line.contains("mode=xml"));
}

#[test]
fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/data/2.5/weather"))
        .current_blocking(&LocationSpec::city("London"), &QueryOptions::default())
        .unwrap_err();

    assert!(matches!(err, WeatherError::Transport(_)));
    assert_eq!(err.status(), None);
}
