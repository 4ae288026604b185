//! Minimal HTTP/1.1 server serving canned JSON bodies for integration tests.
//!
//! Routes are matched on the full request target (path and query) first, then
//! on the path alone. Unknown targets get 404. Every request target is recorded.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Route {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }
}

pub struct JsonServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl JsonServer {
    /// Request targets received so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> JsonServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(target, route)| (target.to_string(), route))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));
    let server_hits = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    JsonServer {
        base_url: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

/// A base URL on which nothing listens.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, hits: &Mutex<Vec<String>>) {
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
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let route = routes
        .get(&target)
        .or_else(|| routes.get(path))
        .cloned()
        .unwrap_or_else(|| Route::status(404));
    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason,
        route.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&route.body);
}
