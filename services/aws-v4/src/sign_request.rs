use crate::canonical::{canonicalize, payload_hash, signed_headers};
use crate::constants::{
    AWS4_HMAC_SHA256, X_AMZ_ALGORITHM_QUERY, X_AMZ_CREDENTIAL_QUERY, X_AMZ_DATE,
    X_AMZ_DATE_QUERY, X_AMZ_EXPIRES_QUERY, X_AMZ_SECURITY_TOKEN, X_AMZ_SECURITY_TOKEN_QUERY,
    X_AMZ_SIGNATURE_QUERY, X_AMZ_SIGNED_HEADERS_QUERY,
};
use crate::scope::SigningContext;
use crate::signing_key::derive_signing_key;
use crate::string_to_sign::build_string_to_sign;
use crate::Credential;
use http::header::{AUTHORIZATION, HOST};
use http::HeaderValue;
use log::{debug, warn};
use sigv4_core::hash::hex_hmac_sha256;
use sigv4_core::time::{now, DateTime};
use sigv4_core::{Error, Result, SignRequest, SignedRequest, SigningMethod, SigningRequest};
use std::time::Duration;

/// Longest lifetime of a presigned url, 7 days.
const MAX_EXPIRES_IN: Duration = Duration::from_secs(7 * 24 * 3600);

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
    keep_host_header: bool,
}

impl RequestSigner {
    /// Create a new signer for given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
            keep_host_header: false,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or replaying a known signature.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Keep the `host` header in the output if it was synthesized from the
    /// hostname.
    ///
    /// By default the synthesized header is removed after signing so that a
    /// transport setting `Host` itself doesn't send it twice.
    pub fn with_host_header(mut self, keep: bool) -> Self {
        self.keep_host_header = keep;
        self
    }

    /// Sign the request.
    ///
    /// The current time is captured once at the beginning, everything after
    /// that is a pure function of the inputs.
    pub fn sign(
        &self,
        mut req: SigningRequest,
        cred: &Credential,
        method: SigningMethod,
    ) -> Result<SignedRequest> {
        cred.validate()?;
        let ctx = SigningContext::new(&self.region, &self.service, self.time.unwrap_or_else(now))?;
        debug!("calculated scope: {}", ctx.scope());

        // A stale signature must never be part of the new one.
        req.headers.remove(AUTHORIZATION);
        let synthetic_host = insert_host_header(&mut req)?;

        match method {
            SigningMethod::Header => canonicalize_header(&mut req, cred, &ctx)?,
            SigningMethod::Query(expires_in) => {
                canonicalize_query(&mut req, cred, &ctx, expires_in)?
            }
        }

        let creq = canonicalize(&req, &payload_hash(&req)?)?;
        debug!("calculated canonical request: {creq}");

        let string_to_sign = build_string_to_sign(&creq, &ctx);
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = derive_signing_key(
            &cred.secret_access_key,
            &ctx.date(),
            ctx.region(),
            ctx.service(),
        );
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut query = creq.query.clone();
        match method {
            SigningMethod::Header => {
                let mut authorization = HeaderValue::from_str(&format!(
                    "{AWS4_HMAC_SHA256} Credential={}/{}, SignedHeaders={}, Signature={}",
                    cred.access_key_id,
                    ctx.scope(),
                    creq.signed_headers(),
                    signature
                ))?;
                authorization.set_sensitive(true);

                req.headers.insert(AUTHORIZATION, authorization);
            }
            SigningMethod::Query(_) => {
                query.push((X_AMZ_SIGNATURE_QUERY.to_string(), signature.clone()));
            }
        }

        if synthetic_host && !self.keep_host_header {
            req.headers.remove(HOST);
        }

        Ok(SignedRequest {
            method: req.method,
            scheme: req.scheme,
            hostname: req.hostname,
            path: creq.uri,
            query,
            headers: req.headers,
            body: req.body,
            signature,
        })
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: SigningRequest,
        credential: &Self::Credential,
        method: SigningMethod,
    ) -> Result<SignedRequest> {
        self.sign(req, credential, method)
    }
}

/// Insert HOST header from hostname if not present.
///
/// Returns `true` if the header has been synthesized.
fn insert_host_header(req: &mut SigningRequest) -> Result<bool> {
    if req.headers.contains_key(HOST) {
        return Ok(false);
    }
    if req.hostname.is_empty() {
        return Err(Error::request_invalid(
            "hostname or host header is required for signing",
        ));
    }

    req.headers.insert(HOST, HeaderValue::from_str(&req.hostname)?);
    Ok(true)
}

fn canonicalize_header(
    req: &mut SigningRequest,
    cred: &Credential,
    ctx: &SigningContext,
) -> Result<()> {
    // The date header must match the signing time, so always overwrite it.
    req.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(ctx.timestamp())?);

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to valid leaking.
        value.set_sensitive(true);

        req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(
    req: &mut SigningRequest,
    cred: &Credential,
    ctx: &SigningContext,
    expires_in: Option<Duration>,
) -> Result<()> {
    if let Some(expires) = expires_in {
        if expires > MAX_EXPIRES_IN {
            return Err(Error::request_invalid(format!(
                "presigned url can't be valid for more than {}s",
                MAX_EXPIRES_IN.as_secs()
            ))
            .with_context(format!("expires_in: {}s", expires.as_secs())));
        }
    }

    req.query.retain(|(k, _)| k != X_AMZ_SIGNATURE_QUERY);

    req.query_insert(X_AMZ_ALGORITHM_QUERY, AWS4_HMAC_SHA256);
    req.query_insert(
        X_AMZ_CREDENTIAL_QUERY,
        format!("{}/{}", cred.access_key_id, ctx.scope()),
    );
    req.query_insert(X_AMZ_DATE_QUERY, ctx.timestamp());
    if let Some(expires) = expires_in {
        req.query_insert(X_AMZ_EXPIRES_QUERY, expires.as_secs().to_string());
        warn_if_outlived(cred, ctx, expires);
    }
    let signed = signed_headers(req.header_name_to_vec_sorted());
    req.query_insert(X_AMZ_SIGNED_HEADERS_QUERY, signed);

    if let Some(token) = &cred.session_token {
        req.query_insert(X_AMZ_SECURITY_TOKEN_QUERY, token);
    }
    Ok(())
}

fn warn_if_outlived(cred: &Credential, ctx: &SigningContext, expires: Duration) {
    let (Some(cred_expires_in), Ok(expires)) =
        (cred.expires_in, chrono::TimeDelta::from_std(expires))
    else {
        return;
    };

    let Some(url_expires_at) = ctx.time().checked_add_signed(expires) else {
        return;
    };
    if cred_expires_in < url_expires_at {
        warn!(
            "presigned url valid for {}s outlives its credential which expires at {cred_expires_in}",
            expires.num_seconds()
        );
    }
}
