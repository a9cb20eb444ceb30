//! Header-only redirect probing.
//!
//! Uses the curl crate (libcurl) to issue a HEAD request with
//! transport-level redirect following disabled, so each hop can be
//! inspected individually through its status code and `Location` header.

mod parse;

use std::str;
use std::time::Duration;

use thiserror::Error;

/// Browser-like User-Agent sent with every probe. Several shorteners
/// answer 403 instead of a redirect when they see a non-browser client.
pub const PROBE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Result of one header-only request: the status code plus the raw
/// `Location` value when the server sent one.
#[derive(Debug, Clone)]
pub struct HopResponse {
    pub status: u32,
    pub location: Option<String>,
}

impl HopResponse {
    /// The redirect target, when this response is a 3xx that carries one.
    pub fn redirect_target(&self) -> Option<&str> {
        if (300..400).contains(&self.status) {
            self.location.as_deref()
        } else {
            None
        }
    }
}

/// Per-hop transport failure.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// libcurl failure at any stage of the request (DNS, connect, TLS,
    /// timeout).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// The transfer completed without a usable status line.
    #[error("malformed response")]
    MalformedResponse,
}

/// Transport seam for the resolver: one header-only request per hop.
pub trait RedirectProbe {
    fn probe(&self, url: &str) -> Result<HopResponse, ProbeError>;
}

/// Performs a single header-only probe of `url`.
///
/// Redirects are NOT followed; the caller inspects the returned status and
/// `Location` and decides the next hop itself. Runs in the current thread;
/// call from `spawn_blocking` if used from async code.
pub fn probe(
    url: &str,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<HopResponse, ProbeError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(false)?;
    easy.useragent(PROBE_USER_AGENT)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    if status == 0 {
        return Err(ProbeError::MalformedResponse);
    }

    Ok(HopResponse {
        status,
        location: parse::location_header(&headers),
    })
}

/// libcurl-backed probe used outside of tests.
#[derive(Debug, Clone, Copy)]
pub struct CurlProbe {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlProbe {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(20),
        }
    }
}

impl RedirectProbe for CurlProbe {
    fn probe(&self, url: &str) -> Result<HopResponse, ProbeError> {
        probe(url, self.connect_timeout, self.timeout)
    }
}
