//! Throwaway HTTP/1.1 responder on a random local port.
//!
//! Answers each connection with the next scripted `(status, body)` pair (200
//! and `{}` once the script is exhausted), closes it, and records what the
//! client sent.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use lib_sicap::portal::client::{CONTENT_TYPE, REFERER};
use lib_sicap::{ClientOptions, ReqwestTransport, RetryPolicy, SicapClient};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct MockPortal {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockPortal {
    pub fn spawn(script: Vec<(u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let mut script: Vec<(u16, String)> =
            script.into_iter().rev().map(|(s, b)| (s, b.to_string())).collect();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let Some(request) = read_request(&mut stream) else { continue };
                recorded.lock().unwrap().push(request);

                let (status, body) = script.pop().unwrap_or((200, "{}".to_string()));
                let response = format!(
                    "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { addr, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api-pub", self.addr)
    }

    /// Client wired to this responder with the portal's headers and a short retry delay.
    pub fn client(&self) -> SicapClient {
        client_for(&self.base_url(), Duration::from_secs(5))
    }
}

pub fn client_for(base_url: &str, timeout: Duration) -> SicapClient {
    let transport = ReqwestTransport::new(
        base_url,
        &[("Referer", REFERER), ("Content-Type", CONTENT_TYPE)],
        timeout,
        Duration::from_secs(1),
    )
    .unwrap();
    SicapClient::with_transport(transport, &ClientOptions::default())
        .with_retry_policy(RetryPolicy::default().with_delay(Duration::from_millis(10)))
}

/// Accepts connections and never answers. Returns the address and an accept counter.
pub fn spawn_silent() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);

    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(stream);
        }
    });

    (addr, accepted)
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).ok()?;

    Some(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
