use indexmap::IndexMap;

/// Header fields in the order they were read. Names keep their original case
/// and each name holds a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, String>,
}

impl Headers {
    pub fn new() -> Headers {
        return Headers { entries: IndexMap::new() };
    }

    /// Sets `name` to `value`. A name seen before keeps its position and gets
    /// the new value.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        return self.entries.get(name).map(|value| value.as_str());
    }

    /// Takes `name` out, leaving the other headers in order.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        return self.entries.shift_remove(name);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        return self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub version: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl ParsedRequest {
    /// Request line, headers and body framed as an HTTP/1.1 message with CRLF
    /// line endings.
    pub fn to_raw(&self) -> String {
        let mut raw = format!("{} {} {}\r\n", self.method, self.path, self.version);
        for (name, value) in self.headers.iter() {
            raw.push_str(&format!("{}: {}\r\n", name, value));
        }
        raw.push_str("\r\n");
        if let Some(body) = &self.body {
            raw.push_str(body);
        }
        return raw;
    }
}
