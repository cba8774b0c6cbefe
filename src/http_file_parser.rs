use crate::errors::FormatError;
use crate::http_request::{Headers, ParsedRequest};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

// Part of the message the next line belongs to
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ParseState {
    RequestLine,
    Header,
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    return line.strip_suffix('\r').unwrap_or(line);
}

fn parse_request_line(line: &str) -> Result<(String, String, String), FormatError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    return match parts.as_slice() {
        [method, path, version] => Ok((method.to_string(), path.to_string(), version.to_string())),
        _ => Err(FormatError::RequestLine(line.to_string())),
    };
}

fn parse_header(line: &str, line_no: usize) -> Result<(&str, &str), FormatError> {
    return match line.split_once(':') {
        Some((name, value)) => Ok((name.trim(), value.trim())),
        None => Err(FormatError::Header {
            header: line.to_string(),
            line: line_no,
        }),
    };
}

/// Splits raw request text into request line, headers and body.
///
/// Lines end in `\n` with an optional `\r`. Headers run until the first empty
/// line; whatever follows it is the body, kept byte for byte.
pub fn parse_raw_request(content: &str) -> Result<ParsedRequest, FormatError> {
    let mut parse_state = ParseState::RequestLine;
    let mut request_line = None;
    let mut headers = Headers::new();
    let mut body = None;
    let mut offset = 0;

    for (index, raw_line) in content.split_inclusive('\n').enumerate() {
        offset += raw_line.len();
        let line = strip_line_ending(raw_line);

        match parse_state {
            ParseState::RequestLine => {
                request_line = Some(parse_request_line(line)?);
                parse_state = ParseState::Header;
            }
            ParseState::Header => {
                if line.is_empty() {
                    let rest = &content[offset..];
                    if !rest.is_empty() {
                        body = Some(rest.to_string());
                    }
                    break;
                }
                let (name, value) = parse_header(line, index + 1)?;
                headers.insert(name, value);
            }
        }
    }

    let (method, path, version) = request_line.ok_or(FormatError::Empty)?;
    return Ok(ParsedRequest {
        method,
        path,
        version,
        headers,
        body,
    });
}

pub fn parse_request_file(path: &Path) -> Result<ParsedRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("couldn't read {}", path.display()))?;
    return Ok(parse_raw_request(&content)?);
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parses_request_line_headers_and_body() {
        let request = parse_raw_request(
            "POST /login HTTP/1.1\r\nHost: x.com\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nuser=a&pass=b",
        )
        .unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/login");
        assert_eq!(request.version, "HTTP/1.1");
        assert_eq!(request.headers.get("Host"), Some("x.com"));
        assert_eq!(
            request.headers.get("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.body.as_deref(), Some("user=a&pass=b"));
    }

    #[test]
    fn header_value_keeps_colons_after_the_first() {
        let request = parse_raw_request("GET / HTTP/1.1\nHost:  x.com:8080 \n").unwrap();
        assert_eq!(request.headers.get("Host"), Some("x.com:8080"));
        assert_eq!(request.body, None);
    }

    #[test]
    fn body_is_kept_verbatim() {
        let request =
            parse_raw_request("PUT /a HTTP/1.1\r\nHost: x\r\n\r\nline one\r\n\r\nline two\n").unwrap();
        assert_eq!(request.body.as_deref(), Some("line one\r\n\r\nline two\n"));
    }

    #[test_case("GET /search?q=1 HTTP/1.1\r\nHost: x.com\r\n\r\n" ; "no body")]
    #[test_case("POST /login HTTP/1.1\r\nHost: x.com\r\nCookie: a=b; c=d\r\n\r\nuser=a&pass=b" ; "form body")]
    #[test_case("PUT /doc HTTP/1.0\r\nHost: x.com\r\n\r\n{\"k\":\r\n\"v\"}\r\n" ; "multiline body")]
    fn reserializing_reproduces_input(raw: &str) {
        assert_eq!(parse_raw_request(raw).unwrap().to_raw(), raw);
    }

    #[test_case("" => FormatError::Empty ; "empty input")]
    #[test_case("GET /\r\nHost: x\r\n\r\n" => FormatError::RequestLine("GET /".to_string()) ; "missing version")]
    #[test_case("GET / HTTP/1.1 extra\r\n" => FormatError::RequestLine("GET / HTTP/1.1 extra".to_string()) ; "too many tokens")]
    #[test_case("GET / HTTP/1.1\r\nHost: x\r\nbroken\r\n\r\n" => FormatError::Header { header: "broken".to_string(), line: 3 } ; "header without colon")]
    fn rejects_malformed_requests(raw: &str) -> FormatError {
        parse_raw_request(raw).unwrap_err()
    }

    #[test]
    fn reads_request_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("req.txt");
        fs::write(&path, "GET /a?b=c HTTP/1.1\nHost: x.com\n\n").unwrap();

        let request = parse_request_file(&path).unwrap();
        assert_eq!(request.path, "/a?b=c");
    }
}
