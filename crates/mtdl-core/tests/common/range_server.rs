//! Minimal HTTP/1.1 server that supports HEAD and Range GET for integration tests.
//!
//! Serves a single static body at every path except `/moved`, which redirects
//! to `/`. Every GET is recorded so tests can assert which ranges were asked for.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, omit `Accept-Ranges: bytes` even if ranges work.
    pub advertise_ranges: bool,
    /// If false, HEAD omits `Content-Length`.
    pub send_length: bool,
    /// A ranged GET starting at this offset gets `500 Internal Server Error`.
    pub fail_range_start: Option<u64>,
    /// If set, 206 bodies go out in 1 KiB pieces with this pause between them,
    /// and the failing range answers only after three pauses.
    pub trickle: Option<Duration>,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
            advertise_ranges: true,
            send_length: true,
            fail_range_start: None,
            trickle: None,
        }
    }
}

/// A running server: base URL plus the log of GET requests (range or None).
pub struct RangeServer {
    pub url: String,
    gets: Arc<Mutex<Vec<Option<(u64, u64)>>>>,
}

impl RangeServer {
    pub fn gets(&self) -> Vec<Option<(u64, u64)>> {
        let mut v = self.gets.lock().unwrap().clone();
        v.sort();
        v
    }
}

/// Starts a server in a background thread serving `body`. Runs until the process exits.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let gets = Arc::new(Mutex::new(Vec::new()));
    let gets_srv = Arc::clone(&gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let gets = Arc::clone(&gets_srv);
            thread::spawn(move || handle(stream, &body, opts, &gets));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/", port),
        gets,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: RangeServerOptions,
    gets: &Mutex<Vec<Option<(u64, u64)>>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let (method, path, range) = parse_request(request);
    let total = body.len() as u64;
    let accept_ranges = if opts.advertise_ranges {
        "Accept-Ranges: bytes\r\n"
    } else {
        ""
    };

    if path == "/moved" {
        let _ = stream.write_all(
            b"HTTP/1.1 302 Found\r\nLocation: /\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    if method.eq_ignore_ascii_case("HEAD") {
        let length = if opts.send_length {
            format!("Content-Length: {}\r\n", total)
        } else {
            String::new()
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\n{}{}Connection: close\r\n\r\n",
            length, accept_ranges
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    }

    gets.lock().unwrap().push(range);
    let range = range.filter(|_| opts.support_ranges);
    if let (Some((start, _)), Some(fail)) = (range, opts.fail_range_start) {
        if start == fail {
            if let Some(pause) = opts.trickle {
                thread::sleep(pause * 3);
            }
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
            return;
        }
    }

    let (status, slice) = match range {
        Some((start, end_incl)) => {
            let end_incl = end_incl.min(total.saturating_sub(1));
            if start > end_incl {
                let response = format!(
                    "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Range: bytes */{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    total
                );
                let _ = stream.write_all(response.as_bytes());
                return;
            }
            (
                format!(
                    "206 Partial Content\r\nContent-Range: bytes {}-{}/{}",
                    start, end_incl, total
                ),
                &body[start as usize..=end_incl as usize],
            )
        }
        None => ("200 OK".to_string(), body),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        slice.len(),
        accept_ranges
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    match opts.trickle.filter(|_| range.is_some()) {
        Some(pause) => {
            for piece in slice.chunks(1024) {
                if stream.write_all(piece).and_then(|_| stream.flush()).is_err() {
                    return;
                }
                thread::sleep(pause);
            }
        }
        None => {
            let _ = stream.write_all(slice);
        }
    }
}

/// Returns (method, path, optional (start, end_inclusive) for `Range: bytes=X-Y`).
fn parse_request(request: &str) -> (&str, &str, Option<(u64, u64)>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("/");
    let mut range = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("range") {
            continue;
        }
        let value = value.trim();
        if let Some(spec) = value.strip_prefix("bytes=") {
            if let Some((a, b)) = spec.split_once('-') {
                let start = a.trim().parse::<u64>().unwrap_or(0);
                let end = b.trim().parse::<u64>().unwrap_or(u64::MAX);
                range = Some((start, end));
            }
        }
    }
    (method, path, range)
}
