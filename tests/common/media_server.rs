//! Minimal HTTP/1.1 server for probe tests.
//!
//! Answers HEAD and GET with configurable `Content-Length` headers and an
//! optional delay before HEAD responses. Can also bounce through a 302 and
//! hang up on GET. One request per connection.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct MediaServerOptions {
    /// `Content-Length` sent on HEAD, none when `None`
    pub head_length: Option<u64>,
    /// `Content-Length` sent on GET, none when `None`
    pub get_length: Option<u64>,
    /// Sleep this long before answering HEAD
    pub head_delay: Option<Duration>,
    /// Hand out `/start`, which answers 302 to `/video.mp4`
    pub redirect: bool,
    /// Close GET connections without answering
    pub drop_get: bool,
}

#[derive(Debug, Default)]
pub struct RequestCounts {
    pub head: AtomicUsize,
    pub get: AtomicUsize,
    pub redirects: AtomicUsize,
    pub user_agents: Mutex<Vec<String>>,
}

impl RequestCounts {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }

    pub fn head(&self) -> usize {
        self.head.load(Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }
}

/// Start serving in background threads; returns the base URL and counters.
pub fn start(opts: MediaServerOptions) -> (String, Arc<RequestCounts>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let counts = Arc::new(RequestCounts::default());

    let server_counts = Arc::clone(&counts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let counts = Arc::clone(&server_counts);
            thread::spawn(move || handle(stream, opts, &counts));
        }
    });

    let path = if opts.redirect { "start" } else { "video.mp4" };
    (format!("http://127.0.0.1:{}/{}", port, path), counts)
}

/// A URL nothing listens on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/video.mp4", port)
}

fn handle(mut stream: TcpStream, opts: MediaServerOptions, counts: &RequestCounts) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let text = String::from_utf8_lossy(&request);
    let mut request_line = text.split_whitespace();
    let method = request_line.next().unwrap_or("");
    let path = request_line.next().unwrap_or("/");

    if let Some(agent) = text.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("user-agent")
            .then(|| value.trim().to_string())
    }) {
        counts.user_agents.lock().unwrap().push(agent);
    }

    let response = if path == "/start" {
        counts.redirects.fetch_add(1, Ordering::SeqCst);
        redirect_response("/video.mp4")
    } else if method.eq_ignore_ascii_case("HEAD") {
        counts.head.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = opts.head_delay {
            thread::sleep(delay);
        }
        head_response(opts.head_length)
    } else {
        counts.get.fetch_add(1, Ordering::SeqCst);
        if opts.drop_get {
            return;
        }
        get_response(opts.get_length)
    };

    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn head_response(length: Option<u64>) -> String {
    let mut response = String::from("HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nConnection: close\r\n");
    if let Some(len) = length {
        response.push_str(&format!("Content-Length: {}\r\n", len));
    }
    response.push_str("\r\n");
    response
}

fn get_response(length: Option<u64>) -> String {
    // Only a token body is written; the prober reads headers and hangs up.
    let mut response = String::from("HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nConnection: close\r\n");
    if let Some(len) = length {
        response.push_str(&format!("Content-Length: {}\r\n", len));
    }
    response.push_str("\r\npartial");
    response
}

fn redirect_response(location: &str) -> String {
    format!(
        "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        location
    )
}
