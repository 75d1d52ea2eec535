use std::mem;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use http::header::HeaderName;
use http::header::CONTENT_TYPE;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Request descriptor that will be signed.
///
/// The path and query values are kept as given by the caller. Signers are
/// responsible for encoding them the way their protocol requires.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme, used only to assemble the final URL.
    pub scheme: Scheme,
    /// Hostname (with optional port) the request is sent to.
    pub hostname: String,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// Request body, `None` if there is no body at all.
    pub body: Option<Bytes>,
}

impl SigningRequest {
    /// Create a new request with `https` scheme and `/` path.
    pub fn new(method: Method, hostname: impl Into<String>) -> Self {
        Self {
            method,
            scheme: Scheme::HTTPS,
            hostname: hostname.into(),
            path: "/".to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Build a signing request from an `http::Request`.
    ///
    /// Query values are percent-decoded. An empty body is treated as no body,
    /// except for `POST` and `PUT` which always carry one.
    pub fn from_http(req: http::Request<Bytes>) -> Result<Self> {
        let (mut parts, body) = req.into_parts();
        let body = if body.is_empty() && !matches!(parts.method, Method::POST | Method::PUT) {
            None
        } else {
            Some(body)
        };
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));
        let authority = uri.authority.ok_or_else(|| {
            Error::request_invalid("request without authority is invalid for signing")
        })?;

        Ok(SigningRequest {
            method: parts.method,
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            hostname: authority.as_str().to_string(),
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            // Take the headers out of the request to avoid copy.
            headers: mem::take(&mut parts.headers),
            body,
        })
    }

    /// Set the scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set a query parameter, replacing the existing value of the same key.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_insert(key, value);
        self
    }

    /// Insert a header, replacing existing values of the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_str(name)?;
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize the value as JSON into the body.
    ///
    /// `content-type: application/json` is added if no content type is set.
    pub fn with_json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        self.body = Some(Bytes::from(body));
        Ok(self)
    }

    /// Get query value by key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert a query pair, replacing the existing value of the same key.
    pub fn query_insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.query.push((key, value)),
        }
    }

    /// Get header names as sorted vector.
    ///
    /// `http::HeaderName` is always lowercase.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }

    /// Get the body as bytes, `None` if there is no body.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// SigningMethod is the method that used in signing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with headers, the signature lands in the `Authorization` header.
    Header,
    /// Signing with query, producing a presigned URL.
    ///
    /// The duration, if given, is announced as the validity window of the URL.
    Query(Option<Duration>),
}

impl SigningMethod {
    /// Presign with the given validity window.
    pub fn presign(expires_in: Duration) -> Self {
        SigningMethod::Query(Some(expires_in))
    }
}

/// Signed request ready to be handed to a transport.
///
/// Unlike [`SigningRequest`], `path` and `query` are percent-encoded exactly
/// as they were signed, so they must be sent verbatim.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// Hostname (with optional port).
    pub hostname: String,
    /// Percent-encoded path.
    pub path: String,
    /// Percent-encoded query pairs.
    pub query: Vec<(String, String)>,
    /// HTTP headers, including signing headers in header mode.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
    /// Hex encoded signature.
    pub signature: String,
}

impl SignedRequest {
    /// Assemble the full URL: `scheme://hostname/path?query`.
    pub fn url(&self) -> String {
        let query_size = self
            .query
            .iter()
            .map(|(k, v)| k.len() + v.len() + 2)
            .sum::<usize>();
        let mut s = String::with_capacity(
            self.scheme.as_str().len() + 3 + self.hostname.len() + self.path.len() + query_size,
        );

        s.push_str(self.scheme.as_str());
        s.push_str("://");
        s.push_str(&self.hostname);
        s.push_str(&self.path);
        for (i, (k, v)) in self.query.iter().enumerate() {
            s.push(if i == 0 { '?' } else { '&' });
            s.push_str(k);
            s.push('=');
            s.push_str(v);
        }

        s
    }

    /// Convert into an `http::Request`.
    pub fn into_http_request(self) -> Result<http::Request<Bytes>> {
        let uri = Uri::from_str(&self.url())?;

        let mut req = http::Request::new(self.body.unwrap_or_default());
        *req.method_mut() = self.method;
        *req.uri_mut() = uri;
        *req.headers_mut() = self.headers;

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_http() -> anyhow::Result<()> {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri("https://example.com/users?b=2&a=hello%20world")
            .header("x-custom", "value")
            .body(Bytes::new())?;

        let req = SigningRequest::from_http(req)?;
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.scheme, Scheme::HTTPS);
        assert_eq!(req.hostname, "example.com");
        assert_eq!(req.path, "/users");
        assert_eq!(
            req.query,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "hello world".to_string())
            ]
        );
        assert_eq!(req.header_name_to_vec_sorted(), vec!["x-custom"]);
        assert!(req.body.is_none());
        Ok(())
    }

    #[test]
    fn test_from_http_keeps_empty_body_for_put() -> anyhow::Result<()> {
        for method in [Method::PUT, Method::POST] {
            let req = http::Request::builder()
                .method(method.clone())
                .uri("https://example.com/k")
                .body(Bytes::new())?;

            let req = SigningRequest::from_http(req)?;
            assert_eq!(req.body_bytes(), Some(b"".as_slice()), "{method}");
        }
        Ok(())
    }

    #[test]
    fn test_from_http_without_authority() -> anyhow::Result<()> {
        let req = http::Request::builder().uri("/users").body(Bytes::new())?;

        let err = SigningRequest::from_http(req).expect_err("must fail");
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
        Ok(())
    }

    #[test]
    fn test_query_insert_replaces_existing_key() {
        let req = SigningRequest::new(Method::GET, "example.com")
            .with_query("a", "1")
            .with_query("b", "2")
            .with_query("a", "3");

        assert_eq!(req.query_get("a"), Some("3"));
        assert_eq!(req.query.len(), 2);
    }

    #[test]
    fn test_with_json_body() -> anyhow::Result<()> {
        let req = SigningRequest::new(Method::POST, "example.com")
            .with_json_body(&serde_json::json!({"name": "alice"}))?;

        assert_eq!(req.body_bytes(), Some(br#"{"name":"alice"}"#.as_slice()));
        assert_eq!(req.headers[CONTENT_TYPE], "application/json");
        Ok(())
    }

    #[test]
    fn test_signed_request_url() -> anyhow::Result<()> {
        let signed = SignedRequest {
            method: Method::GET,
            scheme: Scheme::HTTPS,
            hostname: "example.com".to_string(),
            path: "/users".to_string(),
            query: vec![
                ("X-Amz-Signature".to_string(), "abc".to_string()),
                ("param1".to_string(), "paramValue".to_string()),
            ],
            headers: HeaderMap::new(),
            body: None,
            signature: "abc".to_string(),
        };

        assert_eq!(
            signed.url(),
            "https://example.com/users?X-Amz-Signature=abc&param1=paramValue"
        );

        let req = signed.into_http_request()?;
        assert_eq!(req.uri().host(), Some("example.com"));
        assert_eq!(req.uri().query(), Some("X-Amz-Signature=abc&param1=paramValue"));
        Ok(())
    }
}
