//! Downloading archives with exponential-backoff retries.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::FetchError;
use crate::transport::Transport;

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first try.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that retries without sleeping.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Total tries, the first one included.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry `retry` (1-based): `min(base * 2^(retry-1), max)`.
    /// Retry 0 is the first try and has no delay.
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        2u32.checked_pow(retry - 1)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Downloads a URL to a file, retrying on any failure.
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    progress: bool,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            progress: false,
        }
    }

    /// Draw a progress bar on stderr when the size is known.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Download `url` into `dest`, returning the number of bytes written.
    ///
    /// Transport errors, non-200 statuses, write failures and short bodies
    /// all trigger a retry. Whatever the attempt wrote is deleted before the
    /// next one, so after a failed call `dest` does not exist.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            match self.try_fetch(url, dest) {
                Ok(written) => {
                    tracing::debug!(url, written, attempt, "Download complete");
                    return Ok(written);
                }
                Err(err) => {
                    let _ = fs::remove_file(dest);
                    tracing::warn!(url, attempt, error = %err, "Download attempt failed");

                    if attempt >= attempts {
                        return Err(FetchError::Exhausted {
                            url: url.to_string(),
                            attempts,
                            last: Box::new(err),
                        });
                    }

                    let delay = self.policy.delay_for(attempt);
                    eprintln!(
                        "  attempt {attempt}/{attempts} failed: {err}; retrying in {}s",
                        delay.as_secs()
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    fn try_fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.transport.get(url)?;
        if response.status != 200 {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }

        let mut file = File::create(dest).map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })?;

        let bar = match response.content_length {
            Some(total) if self.progress => Some(progress_bar(total)),
            _ => None,
        };

        let mut body = response.body;
        let copied = match &bar {
            Some(bar) => copy(&mut bar.wrap_read(body), &mut file, url, dest),
            None => copy(&mut body, &mut file, url, dest),
        };
        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }
        let written = copied?;

        file.flush().map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })?;

        match response.content_length {
            Some(expected) if expected != written => Err(FetchError::IncompleteDownload {
                expected,
                actual: written,
            }),
            _ => Ok(written),
        }
    }
}

/// `io::copy` that tells read failures (the connection) from write failures
/// (the disk).
fn copy(
    reader: &mut impl io::Read,
    writer: &mut File,
    url: &str,
    dest: &Path,
) -> Result<u64, FetchError> {
    let mut buf = [0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(written),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(FetchError::Interrupted {
                    url: url.to_string(),
                    source,
                });
            }
        };
        writer
            .write_all(&buf[..n])
            .map_err(|source| FetchError::Write {
                path: dest.to_path_buf(),
                source,
            })?;
        written += n as u64;
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("  downloading... {percent}% ({bytes} / {total_bytes})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
