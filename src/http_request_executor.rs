use crate::http_request::{Headers, ParsedRequest};
use anyhow::{Context, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};

/// Characters of the response body shown after the status line
const RESPONSE_SNIPPET_CHARS: usize = 200;

pub struct ExecutionContext {
    pub client: reqwest::blocking::Client,
}

impl ExecutionContext {
    /// Client sending all traffic through `proxy`, without certificate checks
    /// and without following redirects.
    pub fn new(proxy: &str) -> Result<ExecutionContext> {
        let proxy = reqwest::Proxy::all(proxy).with_context(|| format!("invalid proxy url '{}'", proxy))?;
        let client = reqwest::blocking::Client::builder()
            .proxy(proxy)
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("couldn't build http client")?;
        return Ok(ExecutionContext { client });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { status: u16 },
    Skipped,
    Failed,
}

/// `http://<host>` joined with the request target. An absolute-form target
/// replaces the host entirely.
pub fn target_url(host: &str, path: &str) -> Result<Url> {
    let base = Url::parse(&format!("http://{}", host))?;
    return Ok(base.join(path)?);
}

fn header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.iter() {
        // recomputed by the client from the actual body
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        map.append(HeaderName::try_from(name)?, HeaderValue::try_from(value)?);
    }
    return Ok(map);
}

fn send(
    method: &str,
    url: &Url,
    headers: &Headers,
    body: Option<String>,
    context: &ExecutionContext,
) -> Result<(u16, String)> {
    let method = Method::from_bytes(method.as_bytes())?;
    let mut req = context
        .client
        .request(method, url.clone())
        .headers(header_map(headers)?);
    if let Some(body) = body {
        req = req.body(body);
    }

    let res = req.send()?;
    let status = res.status().as_u16();
    return Ok((status, res.text()?));
}

/// Sends one parsed request through the proxy and prints the outcome.
///
/// Failures are reported and turned into [`SendOutcome::Failed`] so a batch
/// can carry on with the next request.
pub fn execute_http_request(request: ParsedRequest, context: &ExecutionContext) -> SendOutcome {
    let ParsedRequest {
        method,
        path,
        mut headers,
        body,
        ..
    } = request;

    let host = match headers.remove("Host") {
        Some(host) if !host.is_empty() => host,
        _ => {
            println!("No Host header found. Skipping.");
            return SendOutcome::Skipped;
        }
    };

    let url = match target_url(&host, &path) {
        Ok(url) => url,
        Err(e) => {
            println!("Request to http://{}{} failed: {:#}", host, path, e);
            return SendOutcome::Failed;
        }
    };

    debug!("sending {} {}", method, url);
    return match send(&method, &url, &headers, body, context) {
        Ok((status, text)) => {
            println!("[{}] {} {}", status, method, url);
            println!("{}", text.chars().take(RESPONSE_SNIPPET_CHARS).collect::<String>());
            SendOutcome::Sent { status }
        }
        Err(e) => {
            println!("Request to {} failed: {:#}", url, e);
            SendOutcome::Failed
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_file_parser::parse_raw_request;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use test_case::test_case;

    /// Accepts one connection, answers it with `response` and hands back what
    /// the client sent.
    fn spawn_proxy(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&received).to_string()
        });
        return (format!("http://{}", addr), handle);
    }

    #[test_case("x.com", "/search?q=1" => "http://x.com/search?q=1" ; "origin form")]
    #[test_case("x.com:8080", "/" => "http://x.com:8080/" ; "host with port")]
    #[test_case("x.com", "http://y.com/a" => "http://y.com/a" ; "absolute form")]
    fn builds_target_url(host: &str, path: &str) -> String {
        target_url(host, path).unwrap().to_string()
    }

    #[test]
    fn missing_host_is_skipped() {
        let context = ExecutionContext::new("http://127.0.0.1:9").unwrap();
        let request = parse_raw_request("GET / HTTP/1.1\r\nAccept: */*\r\n\r\n").unwrap();
        assert_eq!(execute_http_request(request, &context), SendOutcome::Skipped);
    }

    #[test]
    fn sends_through_proxy_without_following_redirects() {
        let (proxy, handle) = spawn_proxy(
            "HTTP/1.1 302 Found\r\nLocation: /elsewhere\r\nContent-Length: 5\r\nConnection: close\r\n\r\nmoved",
        );
        let context = ExecutionContext::new(&proxy).unwrap();
        let request =
            parse_raw_request("GET /search?q=1 HTTP/1.1\r\nHost: x.com\r\nX-Test: 1\r\n\r\n").unwrap();

        assert_eq!(
            execute_http_request(request, &context),
            SendOutcome::Sent { status: 302 }
        );
        let received = handle.join().unwrap();
        assert!(received.starts_with("GET http://x.com/search?q=1 HTTP/1.1\r\n"));
        assert!(received.to_lowercase().contains("x-test: 1\r\n"));
    }

    #[test]
    fn unreachable_proxy_fails_without_panicking() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let proxy = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let context = ExecutionContext::new(&proxy).unwrap();
        let request = parse_raw_request("GET / HTTP/1.1\r\nHost: x.com\r\n\r\n").unwrap();
        assert_eq!(execute_http_request(request, &context), SendOutcome::Failed);
    }

    #[test]
    fn invalid_method_fails() {
        let context = ExecutionContext::new("http://127.0.0.1:9").unwrap();
        let request = parse_raw_request("G(E)T / HTTP/1.1\r\nHost: x.com\r\n\r\n").unwrap();
        assert_eq!(execute_http_request(request, &context), SendOutcome::Failed);
    }
}
