//! `Link` response header parsing.
//!
//! GitHub advertises pagination through a `Link` header listing relation
//! links. The parser implements this subset of RFC 8288:
//!
//! ```text
//! header      = link-value *( OWS "," OWS link-value )
//! link-value  = "<" uri ">" *( OWS ";" OWS link-param )
//! link-param  = token [ OWS "=" OWS ( token / quoted-string ) ]
//! ```
//!
//! Commas inside `<...>` or quoted strings never split entries. The `rel`
//! parameter may carry several space-separated relation types and is
//! compared case-insensitively. Entries that fail to parse are skipped
//! without discarding the well-formed entries around them.

use reqwest::header::{HeaderMap, LINK};
use url::Url;

/// One `<uri>; param=value` entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target URI, as written between the angle brackets.
    pub uri: String,
    /// Relation types from the first `rel` parameter, lowercased.
    pub rels: Vec<String>,
    /// All parameters in order. Names are lowercased, values unquoted.
    pub params: Vec<(String, Option<String>)>,
}

impl Link {
    /// Whether this link carries the given relation type.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(rel))
    }
}

/// Parsed `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkHeader {
    links: Vec<Link>,
}

impl LinkHeader {
    /// Parse a single header value.
    pub fn parse(header: &str) -> Self {
        let mut links = Vec::new();
        Self::parse_into(header, &mut links);
        Self { links }
    }

    /// Collect every `Link` field of a response.
    ///
    /// Field values that are not visible ASCII are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut links = Vec::new();
        for value in headers.get_all(LINK) {
            match value.to_str() {
                Ok(v) => Self::parse_into(v, &mut links),
                Err(_) => tracing::debug!("ignoring non-ASCII Link header"),
            }
        }
        Self { links }
    }

    fn parse_into(header: &str, links: &mut Vec<Link>) {
        for raw in split_top_level(header, ',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match parse_link_value(raw) {
                Ok(link) => links.push(link),
                // An unbalanced '<' or '"' swallows the separators after it.
                // Retry from each later entry start.
                Err(_) if split_at_entry_starts(raw).len() > 1 => {
                    for piece in split_at_entry_starts(raw) {
                        match parse_link_value(piece.trim()) {
                            Ok(link) => links.push(link),
                            Err(reason) => {
                                tracing::debug!(entry = piece, reason, "skipping malformed Link entry");
                            }
                        }
                    }
                }
                Err(reason) => {
                    tracing::debug!(entry = raw, reason, "skipping malformed Link entry");
                }
            }
        }
    }

    /// All well-formed entries, in header order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// First entry carrying `rel`.
    pub fn find(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.has_rel(rel))
    }

    /// Target URI of the first entry carrying `rel`.
    pub fn url_for(&self, rel: &str) -> Option<&str> {
        self.find(rel).map(|l| l.uri.as_str())
    }

    /// Whether a `next` relation is advertised.
    pub fn has_next(&self) -> bool {
        self.find("next").is_some()
    }

    pub fn next_url(&self) -> Option<&str> {
        self.url_for("next")
    }

    /// The `page` query parameter of the `rel` target, if it has one.
    pub fn page_for(&self, rel: &str) -> Option<u32> {
        let url = Url::parse(self.url_for(rel)?).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
    }
}

/// Split on `sep` where it is not inside `<...>` or a quoted string.
fn split_top_level(input: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_uri = false;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '<' if !in_uri => in_uri = true,
            '>' if in_uri => in_uri = false,
            '"' if !in_uri => in_quotes = true,
            c if c == sep && !in_uri => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Split before every `,` followed by optional whitespace and `<`, ignoring
/// quoting.
fn split_at_entry_starts(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, _) in input.match_indices(',') {
        if input[i + 1..].trim_start().starts_with('<') {
            parts.push(&input[start..i]);
            start = i + 1;
        }
    }
    parts.push(&input[start..]);
    parts
}

fn parse_link_value(raw: &str) -> Result<Link, &'static str> {
    let rest = raw.strip_prefix('<').ok_or("missing '<'")?;
    let end = rest.find('>').ok_or("unterminated URI reference")?;
    let uri = rest[..end].trim();
    if uri.is_empty() || uri.contains('<') || uri.contains(char::is_whitespace) {
        return Err("invalid URI reference");
    }

    let mut params = Vec::new();
    let tail = rest[end + 1..].trim_start();
    if !tail.is_empty() {
        let tail = tail
            .strip_prefix(';')
            .ok_or("expected ';' after URI reference")?;
        for raw_param in split_top_level(tail, ';') {
            let raw_param = raw_param.trim();
            // tolerate a trailing ';'
            if raw_param.is_empty() {
                continue;
            }
            params.push(parse_param(raw_param)?);
        }
    }

    let rels = params
        .iter()
        .find(|(name, _)| name == "rel")
        .and_then(|(_, value)| value.as_deref())
        .map(|v| v.split_whitespace().map(str::to_ascii_lowercase).collect())
        .unwrap_or_default();

    Ok(Link {
        uri: uri.to_string(),
        rels,
        params,
    })
}

fn parse_param(raw: &str) -> Result<(String, Option<String>), &'static str> {
    let (name, value) = match raw.split_once('=') {
        Some((n, v)) => (n.trim(), Some(v.trim())),
        None => (raw, None),
    };
    if name.is_empty() || !name.chars().all(is_token_char) {
        return Err("invalid parameter name");
    }

    let value = match value {
        None => None,
        Some(v) if v.starts_with('"') => Some(unquote(v)?),
        Some(v) if !v.is_empty() && v.chars().all(is_token_char) => Some(v.to_string()),
        Some(_) => return Err("invalid parameter value"),
    };

    Ok((name.to_ascii_lowercase(), value))
}

/// Strip the quotes of a quoted-string that must span all of `raw`.
fn unquote(raw: &str) -> Result<String, &'static str> {
    let mut out = String::new();
    let mut chars = raw[1..].chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().ok_or("dangling escape")?),
            '"' => {
                return if chars.as_str().trim().is_empty() {
                    Ok(out)
                } else {
                    Err("trailing data after quoted string")
                };
            }
            c => out.push(c),
        }
    }
    Err("unterminated quoted string")
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}
