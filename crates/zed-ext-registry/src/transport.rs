//! The HTTP seam shared by the registry client and the downloader.
//!
//! One [`ReqwestTransport`] is built per process and handed to both sides as
//! an `Arc<dyn Transport>`, so tests can swap in a scripted implementation.

use std::io::Read;
use std::time::Duration;

use crate::error::TransportError;

/// Default timeout for a whole request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A response whose body has not been read yet.
pub struct HttpResponse {
    pub status: u16,
    /// The advertised `Content-Length`, if any.
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Blocking HTTP GET.
pub trait Transport: Send + Sync {
    /// Issue a GET, following redirects. Any status is a successful response;
    /// only failures to get one at all are errors.
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zed-ext/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::new("<client>", e))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TransportError::new(url, e))?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

/// Scripted transport for unit tests.
#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::Mutex;

    use super::*;

    pub(crate) enum Reply {
        Fail(&'static str),
        Respond {
            status: u16,
            content_length: Option<u64>,
            body: Vec<u8>,
        },
    }

    impl Reply {
        pub(crate) fn ok(body: &[u8]) -> Self {
            Self::Respond {
                status: 200,
                content_length: Some(body.len() as u64),
                body: body.to_vec(),
            }
        }

        pub(crate) fn json(body: &str) -> Self {
            Self::Respond {
                status: 200,
                content_length: None,
                body: body.as_bytes().to_vec(),
            }
        }
    }

    /// Replays queued replies, then repeats `fallback` forever.
    pub(crate) struct FakeTransport {
        replies: Mutex<VecDeque<Reply>>,
        fallback: fn() -> Reply,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub(crate) fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                fallback: || Reply::Fail("connection refused"),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn always(fallback: fn() -> Reply) -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                fallback,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(url.to_string());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(self.fallback);
            match reply {
                Reply::Fail(message) => Err(TransportError::new(url, message)),
                Reply::Respond {
                    status,
                    content_length,
                    body,
                } => Ok(HttpResponse {
                    status,
                    content_length,
                    body: Box::new(Cursor::new(body)),
                }),
            }
        }
    }
}
