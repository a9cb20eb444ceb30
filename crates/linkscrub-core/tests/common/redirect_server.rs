//! Minimal HTTP/1.1 server that scripts redirect chains for integration
//! tests.
//!
//! Each configured path answers with a fixed status and optional
//! `Location` header. Requests are counted and their User-Agent values
//! recorded so tests can assert on probe behavior.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Scripted response for one path.
#[derive(Debug, Clone)]
pub struct Hop {
    pub status: u16,
    pub location: Option<String>,
}

impl Hop {
    pub fn redirect(status: u16, location: &str) -> Self {
        Self {
            status,
            location: Some(location.to_string()),
        }
    }

    pub fn terminal(status: u16) -> Self {
        Self {
            status,
            location: None,
        }
    }
}

/// Handle returned by [`start`]: the base URL plus request observations.
pub struct RedirectServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

impl RedirectServer {
    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Total requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// User-Agent header of every request, in arrival order.
    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread with the given path → response
/// table. Unknown paths answer 404. The server runs until the process
/// exits.
pub fn start(routes: Vec<(&str, Hop)>) -> RedirectServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Hop>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, hop)| (path.to_string(), hop))
            .collect(),
    );
    let hits = Arc::new(AtomicUsize::new(0));
    let user_agents = Arc::new(Mutex::new(Vec::new()));
    {
        let hits = Arc::clone(&hits);
        let user_agents = Arc::clone(&user_agents);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&hits);
                let user_agents = Arc::clone(&user_agents);
                thread::spawn(move || handle(stream, &routes, &hits, &user_agents));
            }
        });
    }
    RedirectServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
        user_agents,
    }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Hop>,
    hits: &AtomicUsize,
    user_agents: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (path, user_agent) = parse_request(request);
    hits.fetch_add(1, Ordering::SeqCst);
    if let Some(ua) = user_agent {
        user_agents.lock().unwrap().push(ua);
    }

    let (status, location) = match routes.get(&path) {
        Some(hop) => (hop.status, hop.location.clone()),
        None => (404, None),
    };
    let location_header = match &location {
        Some(target) => format!("Location: {}\r\n", target),
        None => String::new(),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\n{}Content-Length: 0\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        location_header
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Returns (request path, optional User-Agent value).
fn parse_request(request: &str) -> (String, Option<String>) {
    let mut path = String::new();
    let mut user_agent = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if path.is_empty() {
            let mut parts = line.split_whitespace();
            let _method = parts.next();
            path = parts.next().unwrap_or("/").to_string();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim().to_string());
            }
        }
    }
    (path, user_agent)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        307 => "Temporary Redirect",
        404 => "Not Found",
        _ => "OK",
    }
}
