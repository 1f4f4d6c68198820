//! Tiny range server for exercising the `mtdl` binary end to end.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

/// Serves `body` with `Accept-Ranges: bytes`; a ranged GET starting at
/// `fail_range_start` gets a 500. Returns the base URL.
pub fn serve(body: Vec<u8>, fail_range_start: Option<u64>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            thread::spawn(move || {
                let mut buf = [0u8; 8192];
                let n = stream.read(&mut buf).unwrap_or(0);
                let req = String::from_utf8_lossy(&buf[..n]).to_string();
                let head = req.starts_with("HEAD");
                let range = req
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        if !name.eq_ignore_ascii_case("range") {
                            return None;
                        }
                        let (a, b) = value.trim().strip_prefix("bytes=")?.split_once('-')?;
                        Some((a.parse::<usize>().ok()?, b.trim().parse::<usize>().ok()?))
                    });
                let (status, slice) = match range {
                    Some((start, _)) if Some(start as u64) == fail_range_start => {
                        let _ = stream.write_all(
                            b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                        );
                        return;
                    }
                    Some((start, end)) => {
                        let end = end.min(body.len().saturating_sub(1));
                        if start > end {
                            let _ = stream.write_all(
                                b"HTTP/1.1 416 Range Not Satisfiable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            );
                            return;
                        }
                        ("206 Partial Content", &body[start..=end])
                    }
                    None => ("200 OK", &body[..]),
                };
                let header = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nAccept-Ranges: bytes\r\nConnection: close\r\n\r\n",
                    status,
                    slice.len()
                );
                let _ = stream.write_all(header.as_bytes());
                if !head {
                    let _ = stream.write_all(slice);
                }
            });
        }
    });
    format!("http://127.0.0.1:{}/", port)
}
