//! Series sources and structured error types.
//!
//! The `SeriesSource` trait abstracts over where a competition's performance
//! history comes from (the live HTTP endpoint, a JSON file on disk) so the
//! refresh loop can swap implementations and tests can use files.
//!
//! Payload shape, shared by every source:
//!
//! ```json
//! { "team-a": [{"timestamp": "2024-06-03T14:00:00Z", "value": 10000.0}, ...],
//!   "team-b": [...] }
//! ```
//!
//! The same mapping wrapped as `{"data": {...}}` is also accepted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use standings_core::{series_from_json, TimeSeries};

/// Entity id → raw series, in stable (sorted) entity order.
pub type CompetitionSeries = BTreeMap<String, TimeSeries>;

/// Query window sent to the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    /// How many days of history to request.
    pub days: u32,
    /// Cap on points per entity.
    pub limit: u32,
}

impl Default for QueryWindow {
    fn default() -> Self {
        Self {
            days: 7,
            limit: 1000,
        }
    }
}

/// Structured error types for source operations.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("payload format not recognized: {0}")]
    Format(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Trait for performance-history sources.
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch every entity's series for the given window.
    fn fetch(&self, window: &QueryWindow) -> Result<CompetitionSeries, SourceError>;
}

/// Parse a payload body into per-entity series.
///
/// The top level must be a JSON object. Entity values that are not arrays
/// become empty series; individual points are read leniently.
pub fn parse_payload(body: &str) -> Result<CompetitionSeries, SourceError> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| SourceError::Format(e.to_string()))?;

    let Value::Object(mut map) = root else {
        return Err(SourceError::Format("top level is not an object".into()));
    };

    // Envelope: exactly one key, "data", holding the mapping
    if map.len() == 1 && matches!(map.get("data"), Some(Value::Object(_))) {
        if let Some(Value::Object(inner)) = map.remove("data") {
            map = inner;
        }
    }

    Ok(map
        .iter()
        .map(|(id, raw)| (id.clone(), series_from_json(raw)))
        .collect())
}

/// Keep at most the last `limit` points of each series.
pub fn cap_points(series: &mut CompetitionSeries, limit: u32) {
    let limit = limit as usize;
    for points in series.values_mut() {
        if points.len() > limit {
            points.drain(..points.len() - limit);
        }
    }
}

// ─── JSON file ──────────────────────────────────────────────────────

/// Reads a saved payload from disk. Applies `limit`; `days` is not used
/// because file snapshots are already windowed by whoever saved them.
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }
}

impl SeriesSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, window: &QueryWindow) -> Result<CompetitionSeries, SourceError> {
        let body = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut series = parse_payload(&body)?;
        cap_points(&mut series, window.limit);
        Ok(series)
    }
}

// ─── HTTP endpoint ──────────────────────────────────────────────────

/// Blocking GET against the performance-history endpoint.
///
/// Sends `days` and `limit` as query parameters and applies `limit` to the
/// parsed series as well. One attempt per fetch;
/// the refresh loop's next tick is the retry.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("standings/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SeriesSource for HttpSource {
    fn name(&self) -> &str {
        &self.endpoint
    }

    fn fetch(&self, window: &QueryWindow) -> Result<CompetitionSeries, SourceError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("days", window.days), ("limit", window.limit)])
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let mut series = parse_payload(&body)?;
        // Servers may ignore the limit parameter
        cap_points(&mut series, window.limit);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    const PAYLOAD: &str = r#"{
        "team-b": [
            {"timestamp": "2024-06-03T14:00:00Z", "value": 100.0},
            {"timestamp": "2024-06-03T14:01:00Z", "value": 101.0},
            {"timestamp": "2024-06-03T14:02:00Z", "value": 102.0}
        ],
        "team-a": [
            {"timestamp": "2024-06-03T14:00:00Z", "value": "oops"},
            {"timestamp": "2024-06-03T14:01:00Z", "value": 50.0}
        ],
        "team-c": null
    }"#;

    #[test]
    fn parse_mapping() {
        let series = parse_payload(PAYLOAD).unwrap();
        let ids: Vec<&str> = series.keys().map(String::as_str).collect();
        assert_eq!(ids, ["team-a", "team-b", "team-c"]);
        assert_eq!(series["team-b"].len(), 3);
        assert_eq!(series["team-a"].len(), 2);
        assert_eq!(series["team-a"][0].value, None);
        assert!(series["team-c"].is_empty());
    }

    #[test]
    fn parse_envelope() {
        let wrapped = format!(r#"{{"data": {PAYLOAD}}}"#);
        let series = parse_payload(&wrapped).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.contains_key("team-b"));
    }

    #[test]
    fn team_named_data_alongside_others_is_not_an_envelope() {
        let body = r#"{"data": [{"timestamp": "t", "value": 1}], "other": []}"#;
        let series = parse_payload(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series["data"].len(), 1);
    }

    #[test]
    fn parse_rejects_non_object() {
        assert!(matches!(parse_payload("[1, 2]"), Err(SourceError::Format(_))));
        assert!(matches!(parse_payload("not json"), Err(SourceError::Format(_))));
    }

    #[test]
    fn cap_keeps_most_recent() {
        let mut series = parse_payload(PAYLOAD).unwrap();
        cap_points(&mut series, 2);
        let b = &series["team-b"];
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].value, Some(101.0));
        assert_eq!(b[1].value, Some(102.0));
        assert_eq!(series["team-a"].len(), 2);
    }

    #[test]
    fn file_source_reads_and_caps() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PAYLOAD.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        assert!(source.name().starts_with("file:"));
        let series = source.fetch(&QueryWindow { days: 1, limit: 1 }).unwrap();
        assert_eq!(series["team-b"].len(), 1);
        assert_eq!(series["team-b"][0].value, Some(102.0));
    }

    #[test]
    fn file_source_missing_file() {
        let source = JsonFileSource::new("/nonexistent/payload.json");
        let err = source.fetch(&QueryWindow::default()).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn http_source_builds() {
        let source = HttpSource::new("http://127.0.0.1:9/perf", Duration::from_secs(1)).unwrap();
        assert_eq!(source.endpoint(), "http://127.0.0.1:9/perf");
        assert_eq!(source.name(), "http://127.0.0.1:9/perf");
    }

    /// Answer one HTTP request with `status` and `body`; yields the request head.
    fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let n = stream.read(&mut buf).unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{addr}/perf"), rx)
    }

    #[test]
    fn http_source_caps_points_when_server_ignores_limit() {
        let (url, requests) = serve_once("200 OK", PAYLOAD);
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let series = source.fetch(&QueryWindow { days: 3, limit: 1 }).unwrap();

        let head = requests.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(head.starts_with("GET /perf?days=3&limit=1 "));

        assert_eq!(series.len(), 3);
        assert_eq!(series["team-b"].len(), 1);
        assert_eq!(series["team-b"][0].value, Some(102.0));
        assert_eq!(series["team-a"].len(), 1);
        assert_eq!(series["team-a"][0].value, Some(50.0));
    }

    #[test]
    fn http_source_non_success_status() {
        let (url, _requests) = serve_once("503 Service Unavailable", "{}");
        let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();
        let err = source.fetch(&QueryWindow::default()).unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 503 }));
    }

    #[test]
    fn http_source_unreachable_is_network_error() {
        // Port 9 (discard) is not expected to be listening
        let source =
            HttpSource::new("http://127.0.0.1:9/perf", Duration::from_millis(500)).unwrap();
        let err = source.fetch(&QueryWindow::default()).unwrap_err();
        assert!(matches!(err, SourceError::Network(_)));
    }
}
