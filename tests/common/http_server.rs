//! Minimal HTTP/1.1 server for download cache tests.
//!
//! Serves one body with an optional ETag: a request whose `If-None-Match`
//! matches gets 304, anything else gets 200. Can also answer every request
//! with a redirect or a fixed error status. Counts accepted requests so
//! tests can assert exactly when the network was touched.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Body served on 200 responses.
    pub body: Vec<u8>,
    /// ETag header value, served verbatim and compared against
    /// `If-None-Match`.
    pub etag: Option<String>,
    /// When set, every request gets a 301 with this Location.
    pub redirect_to: Option<String>,
    /// Send the 301 without any Location header.
    pub redirect_without_location: bool,
    /// When set, every request gets this status line (e.g. "404 Not
    /// Found") with an empty body.
    pub status_line: Option<String>,
}

pub struct TestServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Number of requests accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Starts a server for `body` with `etag`. The listener thread runs until
/// the test process exits.
pub fn start(body: &[u8], etag: &str) -> TestServer {
    start_with_options(ServerOptions {
        body: body.to_vec(),
        etag: Some(etag.to_string()),
        ..ServerOptions::default()
    })
}

pub fn start_with_options(opts: ServerOptions) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let port = listener.local_addr().expect("local addr").port();
    let hits = Arc::new(AtomicUsize::new(0));
    let hit_counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            hit_counter.fetch_add(1, Ordering::SeqCst);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &opts));
        }
    });
    TestServer {
        url: format!("http://127.0.0.1:{}/data.json", port),
        hits,
    }
}

fn handle(mut stream: TcpStream, opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(request) => request,
        Err(_) => return,
    };

    if opts.redirect_to.is_some() || opts.redirect_without_location {
        let mut response = String::from("HTTP/1.1 301 Moved Permanently\r\n");
        if let Some(target) = &opts.redirect_to {
            response.push_str(&format!("Location: {}\r\n", target));
        }
        response.push_str("Content-Length: 0\r\nConnection: close\r\n\r\n");
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if let Some(status_line) = &opts.status_line {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status_line
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let if_none_match = header_value(request, "if-none-match");
    if let (Some(candidate), Some(etag)) = (&if_none_match, &opts.etag) {
        if candidate == etag {
            let response = format!(
                "HTTP/1.1 304 Not Modified\r\nETag: {}\r\nConnection: close\r\n\r\n",
                etag
            );
            let _ = stream.write_all(response.as_bytes());
            return;
        }
    }

    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n",
        opts.body.len()
    );
    if let Some(etag) = &opts.etag {
        response.push_str(&format!("ETag: {}\r\n", etag));
    }
    response.push_str("Connection: close\r\n\r\n");
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&opts.body);
}

fn header_value(request: &str, name: &str) -> Option<String> {
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((header, value)) = line.split_once(':') {
            if header.trim().eq_ignore_ascii_case(name) {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}
