//! Minimal HTTP/1.1 server for unit tests.
//!
//! Serves canned responses by request path (or from a closure) and records
//! every raw request (head and body) so tests can check what the client sent.
//! Unknown paths get a 404. The server runs until the process exits.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub type Requests = Arc<Mutex<Vec<String>>>;

/// Returns the base URL (e.g. "http://127.0.0.1:12345") and the request log.
pub fn start(routes: Vec<(&'static str, String)>) -> (String, Requests) {
    start_with(move |request| {
        let path = request
            .lines()
            .next()
            .and_then(|l| l.split_whitespace().nth(1))
            .unwrap_or_default();
        routes
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| response("404 Not Found", &[], ""))
    })
}

/// Like `start` but the reply is computed from the raw request.
pub fn start_with<F>(reply: F) -> (String, Requests)
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests: Requests = Arc::default();
    let log = Arc::clone(&requests);
    let reply = Arc::new(reply);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let reply = Arc::clone(&reply);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &*reply, &log));
        }
    });
    (format!("http://127.0.0.1:{}", port), requests)
}

pub fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut s = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for (k, v) in headers {
        s.push_str(&format!("{}: {}\r\n", k, v));
    }
    s.push_str("\r\n");
    s.push_str(body);
    s
}

fn handle(mut stream: TcpStream, reply: &dyn Fn(&str) -> String, log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let out = reply(&request);
    log.lock().unwrap().push(request);
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let mut continued = false;
    loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&data).to_string();
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let head = text[..head_end].to_ascii_lowercase();
        if !continued && head.contains("expect: 100-continue") {
            continued = true;
            stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").ok()?;
        }
        let length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= head_end + 4 + length {
            break;
        }
    }
    (!data.is_empty()).then(|| String::from_utf8_lossy(&data).to_string())
}
