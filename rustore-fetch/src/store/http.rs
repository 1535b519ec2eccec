//! HTTP transport abstraction for testability.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{FetchError, FetchResult};

/// Content type sent with JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// An open streaming response.
pub struct PayloadStream {
    /// Value of the `content-length` header, if the server sent one.
    pub content_length: Option<u64>,
    /// Blocking reader over the response body.
    pub reader: Box<dyn Read + Send>,
}

impl fmt::Debug for PayloadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadStream")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Trait for the HTTP operations the store client needs.
///
/// This abstraction allows the whole pipeline to run against a mock backend
/// in tests.
pub trait StoreTransport: Send + Sync {
    /// Perform a GET and return the full body, regardless of HTTP status.
    fn get(&self, url: &str) -> FetchResult<Vec<u8>>;

    /// POST a JSON body and return the full response body, regardless of
    /// HTTP status.
    fn post_json(&self, url: &str, body: &[u8]) -> FetchResult<Vec<u8>>;

    /// Perform a GET and return a stream over the body.
    ///
    /// A non-success status is an error.
    fn open_stream(&self, url: &str) -> FetchResult<PayloadStream>;
}

/// Real transport implementation using reqwest's blocking client.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientInit(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    fn read_body(&self, url: &str, response: reqwest::blocking::Response) -> FetchResult<Vec<u8>> {
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::from_reqwest(url, e, self.timeout.as_secs()))
    }
}

impl StoreTransport for ReqwestTransport {
    fn get(&self, url: &str) -> FetchResult<Vec<u8>> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::from_reqwest(url, e, self.timeout.as_secs()))?;

        tracing::debug!(url, status = %response.status(), "response received");
        self.read_body(url, response)
    }

    fn post_json(&self, url: &str, body: &[u8]) -> FetchResult<Vec<u8>> {
        tracing::debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body.to_vec())
            .send()
            .map_err(|e| FetchError::from_reqwest(url, e, self.timeout.as_secs()))?;

        tracing::debug!(url, status = %response.status(), "response received");
        self.read_body(url, response)
    }

    fn open_stream(&self, url: &str) -> FetchResult<PayloadStream> {
        tracing::debug!(url, "GET (streamed)");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::from_reqwest(url, e, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        Ok(PayloadStream {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::io::Cursor;

    /// Mock transport answering every request with fixed data.
    pub struct MockTransport {
        pub body: Vec<u8>,
    }

    impl StoreTransport for MockTransport {
        fn get(&self, _url: &str) -> FetchResult<Vec<u8>> {
            Ok(self.body.clone())
        }

        fn post_json(&self, _url: &str, _body: &[u8]) -> FetchResult<Vec<u8>> {
            Ok(self.body.clone())
        }

        fn open_stream(&self, _url: &str) -> FetchResult<PayloadStream> {
            Ok(PayloadStream {
                content_length: Some(self.body.len() as u64),
                reader: Box::new(Cursor::new(self.body.clone())),
            })
        }
    }

    #[test]
    fn test_reqwest_transport_new() {
        assert!(ReqwestTransport::new(Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_mock_stream_reads_body() {
        let mock = MockTransport {
            body: vec![1, 2, 3, 4],
        };

        let mut stream = mock.open_stream("http://example.com").unwrap();
        assert_eq!(stream.content_length, Some(4));

        let mut buf = Vec::new();
        stream.reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_payload_stream_debug_hides_reader() {
        let stream = PayloadStream {
            content_length: None,
            reader: Box::new(Cursor::new(Vec::new())),
        };
        assert!(format!("{:?}", stream).contains("content_length: None"));
    }
}
