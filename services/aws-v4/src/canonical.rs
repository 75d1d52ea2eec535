use crate::constants::{AWS_QUERY_ENCODE_SET, EMPTY_STRING_SHA256, X_AMZ_CONTENT_SHA_256};
use http::header::AUTHORIZATION;
use http::{HeaderMap, Method};
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use sigv4_core::hash::hex_sha256;
use sigv4_core::{Error, Result, SigningRequest};
use std::fmt::{self, Display, Formatter, Write};

/// Canonical request of SigV4.
///
/// ```text
/// <HTTPMethod>\n
/// <CanonicalURI>\n
/// <CanonicalQueryString>\n
/// <CanonicalHeaders>\n
/// <SignedHeaders>\n
/// <HashedPayload>
/// ```
///
/// - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// Uppercase HTTP method.
    pub method: String,
    /// Percent-encoded path, `/` if empty.
    pub uri: String,
    /// Percent-encoded query pairs sorted by key then value.
    pub query: Vec<(String, String)>,
    /// Lowercase header names with normalized values, sorted by name.
    pub headers: Vec<(String, String)>,
    /// Hex encoded SHA-256 of the payload.
    pub payload_hash: String,
}

impl CanonicalRequest {
    /// Canonical query string like `a=1&b=2`, empty if there is no query.
    pub fn query_string(&self) -> String {
        let mut s = String::new();
        for (i, (k, v)) in self.query.iter().enumerate() {
            if i > 0 {
                s.push('&');
            }
            s.push_str(k);
            s.push('=');
            s.push_str(v);
        }
        s
    }

    /// Signed header names like `host;x-amz-date`.
    pub fn signed_headers(&self) -> String {
        signed_headers(self.headers.iter().map(|(k, _)| k.as_str()))
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query_string())?;
        for (k, v) in &self.headers {
            writeln!(f, "{k}:{v}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        f.write_str(&self.payload_hash)
    }
}

/// Build the canonical request of given request.
///
/// The `host` header must already be present. Returns a `RequestInvalid`
/// error if the method requires a body but the request has none.
pub fn canonicalize(req: &SigningRequest, payload_hash: &str) -> Result<CanonicalRequest> {
    if requires_body(&req.method) && req.body.is_none() {
        return Err(
            Error::request_invalid(format!("{} request requires a body", req.method))
                .with_context(format!("path: {}", req.path)),
        );
    }
    if !req.headers.contains_key(http::header::HOST) {
        return Err(Error::request_invalid(
            "host header is required for canonical request",
        ));
    }

    Ok(CanonicalRequest {
        method: req.method.as_str().to_uppercase(),
        uri: canonical_uri(&req.path)?,
        query: canonical_query(&req.query),
        headers: canonical_headers(&req.headers)?,
        payload_hash: payload_hash.to_string(),
    })
}

/// Methods that must carry a body to be signed.
pub fn requires_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Payload hash of given request.
///
/// A caller-supplied `x-amz-content-sha256` header wins, which allows
/// values like `UNSIGNED-PAYLOAD`. Otherwise the SHA-256 of the body is
/// used, and the hash of the empty string if there is no body.
pub fn payload_hash(req: &SigningRequest) -> Result<String> {
    if let Some(v) = req.headers.get(X_AMZ_CONTENT_SHA_256) {
        return Ok(v.to_str()?.trim().to_string());
    }

    Ok(match req.body_bytes() {
        None => EMPTY_STRING_SHA256.to_string(),
        Some(bs) if bs.is_empty() => EMPTY_STRING_SHA256.to_string(),
        Some(bs) => hex_sha256(bs),
    })
}

/// Percent-encode the path segment by segment.
///
/// Every segment is decoded first so that an already encoded path is not
/// encoded twice. An encoded `/` inside a segment stays encoded.
pub fn canonical_uri(path: &str) -> Result<String> {
    let mut s = String::with_capacity(path.len() + 1);
    if !path.starts_with('/') {
        s.push('/');
    }

    for (i, segment) in path.split('/').enumerate() {
        if i > 0 {
            s.push('/');
        }
        let segment = percent_decode_str(segment).decode_utf8().map_err(|e| {
            Error::request_invalid("path is not valid utf-8 after percent decoding")
                .with_source(e)
                .with_context(format!("path: {path}"))
        })?;
        write!(s, "{}", utf8_percent_encode(&segment, &AWS_QUERY_ENCODE_SET))?;
    }
    Ok(s)
}

/// Percent-encode every pair and sort by key then value.
pub fn canonical_query(query: &[(String, String)]) -> Vec<(String, String)> {
    let mut query = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    query.sort();
    query
}

/// Lowercase, normalize and sort headers.
///
/// Multiple values of the same header are joined with `,`. The
/// `authorization` header is never part of the signature.
pub fn canonical_headers(headers: &HeaderMap) -> Result<Vec<(String, String)>> {
    let mut hs = Vec::with_capacity(headers.keys_len());
    for name in headers.keys() {
        if *name == AUTHORIZATION {
            continue;
        }

        let mut value = String::new();
        for (i, v) in headers.get_all(name).iter().enumerate() {
            if i > 0 {
                value.push(',');
            }
            let v = v.to_str().map_err(|e| {
                Error::request_invalid("header value must be visible ascii")
                    .with_source(e)
                    .with_context(format!("header: {name}"))
            })?;
            value.push_str(&normalize_header_value(v));
        }

        // HeaderName is always lowercase already.
        hs.push((name.as_str().to_string(), value));
    }
    hs.sort();
    Ok(hs)
}

/// Trim the value, and collapse sequential spaces unless it's quoted.
pub fn normalize_header_value(v: &str) -> String {
    let v = v.trim();
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        return v.to_string();
    }
    v.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join header names with `;`.
pub fn signed_headers<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(";")
}
