mod presigned;
mod standard;

use anyhow::Result;
use http::uri::Scheme;
use http::{Method, StatusCode, Uri};
use log::debug;
use reqwest::Client;
use sigv4_aws::{Credential, RequestSigner};
use sigv4_core::{SigningMethod, SigningRequest};
use std::env;
use std::str::FromStr;

/// Load static credential from environment variables
pub fn load_static_credential() -> Credential {
    let access_key =
        env::var("SIGV4_AWS_ACCESS_KEY").expect("SIGV4_AWS_ACCESS_KEY must be set");
    let secret_key =
        env::var("SIGV4_AWS_SECRET_KEY").expect("SIGV4_AWS_SECRET_KEY must be set");

    let cred = Credential::new(&access_key, &secret_key);
    match env::var("SIGV4_AWS_SESSION_TOKEN") {
        Ok(token) => cred.with_session_token(&token),
        Err(_) => cred,
    }
}

/// Initialize test environment
///
/// Returns the signer and the base url, `None` if tests are not enabled.
pub fn init_signing_test() -> Option<(RequestSigner, Uri)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("SIGV4_AWS_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let region = env::var("SIGV4_AWS_REGION").expect("SIGV4_AWS_REGION must be set");
    let service = env::var("SIGV4_AWS_SERVICE").unwrap_or_else(|_| "s3".to_string());
    let url = env::var("SIGV4_AWS_URL").expect("SIGV4_AWS_URL must be set");
    let url = Uri::from_str(&url).expect("SIGV4_AWS_URL must be valid");

    Some((RequestSigner::new(&service, &region), url))
}

/// Build a request against the configured url with the given object path.
pub fn build_request(url: &Uri, method: Method, path: &str) -> SigningRequest {
    let base = url.path().trim_end_matches('/');
    let hostname = url
        .authority()
        .map(|v| v.as_str().to_string())
        .unwrap_or_default();

    SigningRequest::new(method, hostname)
        .with_scheme(url.scheme().cloned().unwrap_or(Scheme::HTTPS))
        .with_path(format!("{base}/{path}"))
}

/// Send signed request and return response
pub async fn send_signed_request(
    signer: &RequestSigner,
    req: SigningRequest,
    cred: &Credential,
    method: SigningMethod,
) -> Result<(StatusCode, String)> {
    let signed = signer.sign(req, cred, method)?;
    debug!("signed request url: {}", signed.url());
    let req = signed.into_http_request()?;

    let resp = Client::new().execute(req.try_into()?).await?;
    let status = resp.status();
    let body = resp.text().await?;

    debug!("response status: {status}, body: {body}");
    Ok((status, body))
}
