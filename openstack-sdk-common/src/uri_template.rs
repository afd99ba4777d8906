//! A small URI template binder.
//!
//! Supports the subset of RFC 6570 the REST clients need:
//!
//! - `{name}` simple expansion, every non-unreserved byte is percent-encoded
//! - `{+name}` reserved expansion, `/` and the other reserved characters stay literal
//!   except `?` and `#`, which would end the path
//! - `{?a,b}` and `{&a,b}` query expansion, unbound names are skipped
//!
//! A template without a leading `/` is resolved under the base path, one with a
//! leading `/` replaces the base path.

use crate::Error;
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Bytes encoded by reserved expansion. `?` and `#` are included since they
/// would end the path, `%` since only valid triplets pass through.
const RESERVED_KEEP: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Reserved expansion: keeps `/` and the other reserved characters as well as
/// existing `%XX` triplets, encodes everything else.
fn encode_reserved(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let is_triplet = bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit();
        if is_triplet {
            out.extend(utf8_percent_encode(&value[start..i], RESERVED_KEEP));
            out.push_str(&value[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    out.extend(utf8_percent_encode(&value[start..], RESERVED_KEEP));
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operator {
    Simple,
    Reserved,
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Expression { op: Operator, names: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    template: String,
    parts: Vec<Part>,
}

impl UriTemplate {
    pub fn new(template: &str) -> Result<Self, Error> {
        let mut parts = Vec::new();
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            if start > 0 {
                parts.push(Part::Literal(rest[..start].to_owned()));
            }
            let end = rest[start..]
                .find('}')
                .map(|i| start + i)
                .ok_or_else(|| Error::Common(format!("unclosed expression in `{template}`")))?;
            let body = &rest[start + 1..end];
            let (op, names) = match body.chars().next() {
                Some('+') => (Operator::Reserved, &body[1..]),
                Some('?') | Some('&') => (Operator::Query, &body[1..]),
                _ => (Operator::Simple, body),
            };
            let names: Vec<String> = names
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
            if names.is_empty() {
                return Err(Error::Common(format!("empty expression in `{template}`")));
            }
            parts.push(Part::Expression { op, names });
            rest = &rest[end + 1..];
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_owned()));
        }

        Ok(Self {
            template: template.to_owned(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Expands the template to a relative reference.
    ///
    /// Path variables are required, query variables are optional.
    pub fn expand(&self, params: &[(&str, &str)]) -> Result<String, Error> {
        let (mut out, query) = self.expand_parts(params)?;
        if let Some(query) = query {
            out.push('?');
            out.push_str(&query);
        }
        Ok(out)
    }

    /// Expands path and query separately. The query starts at the first
    /// literal `?` or the first query expression, so expanded values never
    /// move the boundary.
    fn expand_parts(&self, params: &[(&str, &str)]) -> Result<(String, Option<String>), Error> {
        let lookup = |name: &str| params.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);

        let mut path = String::new();
        let mut query: Option<String> = None;
        for part in &self.parts {
            match part {
                Part::Literal(s) => {
                    if let Some(q) = query.as_mut() {
                        q.push_str(s);
                    } else if let Some((p, q)) = s.split_once('?') {
                        path.push_str(p);
                        query = Some(q.to_owned());
                    } else {
                        path.push_str(s);
                    }
                }
                Part::Expression { op, names } => match op {
                    Operator::Simple | Operator::Reserved => {
                        let values = names
                            .iter()
                            .map(|name| {
                                lookup(name)
                                    .map(|v| match op {
                                        Operator::Reserved => encode_reserved(v),
                                        _ => utf8_percent_encode(v, UNRESERVED).to_string(),
                                    })
                                    .ok_or_else(|| {
                                        Error::Common(format!(
                                            "missing value for `{name}` in `{}`",
                                            self.template
                                        ))
                                    })
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        match &mut query {
                            Some(q) => q.push_str(&values.join(",")),
                            None => path.push_str(&values.join(",")),
                        }
                    }
                    Operator::Query => {
                        for name in names {
                            if let Some(value) = lookup(name) {
                                let q = query.get_or_insert_with(String::new);
                                if !q.is_empty() {
                                    q.push('&');
                                }
                                q.push_str(&utf8_percent_encode(name, UNRESERVED).to_string());
                                q.push('=');
                                q.push_str(&utf8_percent_encode(value, UNRESERVED).to_string());
                            }
                        }
                    }
                },
            }
        }
        Ok((path, query))
    }

    /// Expands the template and resolves it against `base`.
    pub fn bind(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, Error> {
        let (path, query) = self.expand_parts(params)?;

        let mut url = base.clone();
        if path.starts_with('/') {
            url.set_path(&path);
        } else if !path.is_empty() {
            let joined = format!("{}/{}", url.path().trim_end_matches('/'), path);
            url.set_path(&joined);
        }

        if let Some(query) = query.as_deref().filter(|q| !q.is_empty()) {
            let merged = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{query}"),
                _ => query.to_owned(),
            };
            url.set_query(Some(&merged));
        }
        Ok(url)
    }
}
