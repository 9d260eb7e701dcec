//! HTTP transport
//!
//! Writes go to `POST <url>/write?db=<database>` as plain text; queries go
//! to `GET <url>/query?db=<database>&q=<text>`. Response status codes map
//! onto the transport failure kinds: 4xx means the payload was malformed,
//! 5xx means the server failed, and anything below the HTTP layer means the
//! connection is down.

use std::time::Duration;

use influxdb_core::{InfluxError, InfluxResult};
use tracing::debug;

use crate::transport::{Transport, TransportError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP transport for an InfluxDB `/write` + `/query` endpoint pair.
pub struct HttpTransport {
    agent: ureq::Agent,
    write_url: String,
    query_url: String,
    database: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL (scheme://host:port) and
    /// database name.
    pub fn new(base_url: &str, database: &str) -> InfluxResult<Self> {
        if database.is_empty() {
            return Err(InfluxError::configuration("database name is required"));
        }
        let base = base_url.trim_end_matches('/');
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build();

        Ok(Self {
            agent,
            write_url: format!("{}/write?db={}&precision=ns", base, database),
            query_url: format!("{}/query", base),
            database: database.to_string(),
        })
    }

    /// Create a transport from a connection URL of the form
    /// `http://host:port?db=name`.
    pub fn from_url(url: &str) -> InfluxResult<Self> {
        let (base, params) = url
            .split_once('?')
            .ok_or_else(|| InfluxError::configuration(format!("missing ?db= in URL: {}", url)))?;
        let database = params
            .split('&')
            .find_map(|p| p.strip_prefix("db="))
            .ok_or_else(|| InfluxError::configuration(format!("missing db parameter in URL: {}", url)))?;
        Self::new(base, database)
    }

    /// The URL write payloads are posted to
    pub fn write_url(&self) -> &str {
        &self.write_url
    }
}

fn classify_http_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = format!("status {}: {}", code, body.trim());
            if (400..500).contains(&code) {
                TransportError::BadRequest(message)
            } else {
                TransportError::ServerError(message)
            }
        }
        ureq::Error::Transport(err) => TransportError::ConnectionFailed(err.to_string()),
    }
}

impl Transport for HttpTransport {
    fn send(&self, payload: &str) -> Result<(), TransportError> {
        debug!(bytes = payload.len(), "posting line protocol payload");
        self.agent
            .post(&self.write_url)
            .set("Content-Type", "text/plain; charset=utf-8")
            .send_string(payload)
            .map(|_| ())
            .map_err(classify_http_error)
    }

    fn query(&self, text: &str) -> Result<String, TransportError> {
        let response = self
            .agent
            .get(&self.query_url)
            .query("db", &self.database)
            .query("q", text)
            .call()
            .map_err(classify_http_error)?;
        response
            .into_string()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    #[test]
    fn test_write_url_construction() {
        let transport = HttpTransport::new("http://localhost:8086", "test").unwrap();
        assert_eq!(
            transport.write_url(),
            "http://localhost:8086/write?db=test&precision=ns"
        );

        let trailing = HttpTransport::new("http://localhost:8086/", "test").unwrap();
        assert_eq!(trailing.write_url(), transport.write_url());
    }

    #[test]
    fn test_from_url() {
        let transport = HttpTransport::from_url("http://localhost:8086?db=metrics").unwrap();
        assert_eq!(
            transport.write_url(),
            "http://localhost:8086/write?db=metrics&precision=ns"
        );

        assert!(HttpTransport::from_url("http://localhost:8086").is_err());
        assert!(HttpTransport::from_url("http://localhost:8086?foo=bar").is_err());
    }

    /// One-shot HTTP server that answers the first request with the given
    /// status line, for driving the classification paths.
    fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // Read the full request (headers, then Content-Length bytes of
                // body) before answering, or the client may still be writing.
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                let header_end = loop {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                    if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                };
                let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                while request.len() < header_end + content_length {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let response = format!("HTTP/1.1 {}\r\nContent-Length: 0\r\n\r\n", status_line);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_send_success() {
        let base = serve_once("204 No Content");
        let transport = HttpTransport::new(&base, "test").unwrap();
        assert!(transport.send("m value=1i").is_ok());
    }

    #[test]
    fn test_client_error_maps_to_bad_request() {
        let base = serve_once("400 Bad Request");
        let transport = HttpTransport::new(&base, "test").unwrap();
        assert!(matches!(
            transport.send("garbage"),
            Err(TransportError::BadRequest(_))
        ));
    }

    #[test]
    fn test_server_error_maps_to_server_error() {
        let base = serve_once("500 Internal Server Error");
        let transport = HttpTransport::new(&base, "test").unwrap();
        assert!(matches!(
            transport.send("m value=1i"),
            Err(TransportError::ServerError(_))
        ));
    }

    #[test]
    fn test_unreachable_maps_to_connection_failed() {
        // Bind and drop to get a port nothing is listening on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport =
            HttpTransport::new(&format!("http://127.0.0.1:{}", port), "test").unwrap();
        assert!(matches!(
            transport.send("m value=1i"),
            Err(TransportError::ConnectionFailed(_))
        ));
    }
}
