use std::collections::{BTreeSet, HashSet};

/// What makes a captured request a distinct case: method, path and the names
/// (not values) of its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub method: String,
    pub path: String,
    pub params: BTreeSet<String>,
}

impl DedupKey {
    pub fn new(method: &str, path: &str, params: BTreeSet<String>) -> DedupKey {
        return DedupKey {
            method: method.to_string(),
            path: path.to_string(),
            params,
        };
    }
}

/// Keys seen so far in one extraction run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<DedupKey>,
}

impl Deduplicator {
    pub fn new() -> Deduplicator {
        return Deduplicator::default();
    }

    /// Records `key`, returning `true` only the first time it is offered.
    pub fn first_seen(&mut self, key: DedupKey) -> bool {
        return self.seen.insert(key);
    }
}

/// Names of form-encoded parameters. Pairs with an empty or missing value
/// don't count.
pub fn form_param_names(encoded: &str) -> impl Iterator<Item = String> + '_ {
    return url::form_urlencoded::parse(encoded.as_bytes())
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, _)| name.into_owned());
}

/// Path and query of `url` exactly as written. Only the scheme, authority
/// and fragment are cut away; nothing is resolved or re-encoded.
pub fn split_url(url: &str) -> (&str, Option<&str>) {
    let mut rest = url;
    if let Some((scheme, after)) = url.split_once(':') {
        let mut chars = scheme.chars();
        let valid_scheme = chars.next().map_or(false, |c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid_scheme {
            rest = after;
        }
    }
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(|c: char| matches!(c, '/' | '?' | '#')).unwrap_or(after.len());
        rest = &after[end..];
    }
    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    return match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
}

/// Parameter names from `query`, plus the form body of `raw_request` when
/// `method` is POST.
pub fn param_names(method: &str, query: Option<&str>, raw_request: &str) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = query.map(|q| form_param_names(q).collect()).unwrap_or_default();

    if method.eq_ignore_ascii_case("POST") {
        if let Some((_, body)) = raw_request.split_once("\r\n\r\n") {
            names.extend(form_param_names(body));
        }
    }
    return names;
}
