mod signing;

use anyhow::Result;
use http::{Method, StatusCode};
use log::{debug, warn};
use reqwest::Client;
use sigv4_aws::{Config, RequestSigner, EMPTY_STRING_SHA256};
use sigv4_core::{Context, OsEnv, Signer, SigningMethod};
use sigv4_http_send_reqwest::ReqwestHttpSend;
use std::env;

/// Build a signer resolving credentials the way an application would.
///
/// `SIGV4_AWS_ROLE_ARN`, if set, makes the signer assume that role first.
fn init_signer() -> Option<(Signer<sigv4_aws::Credential>, http::Uri)> {
    let (_, url) = signing::init_signing_test()?;

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let region = env::var("SIGV4_AWS_REGION").expect("SIGV4_AWS_REGION must be set");
    let service = env::var("SIGV4_AWS_SERVICE").unwrap_or_else(|_| "s3".to_string());

    let cfg = Config {
        region: Some(region.clone()),
        access_key_id: env::var("SIGV4_AWS_ACCESS_KEY").ok(),
        secret_access_key: env::var("SIGV4_AWS_SECRET_KEY").ok(),
        session_token: env::var("SIGV4_AWS_SESSION_TOKEN").ok(),
        role_arn: env::var("SIGV4_AWS_ROLE_ARN").ok(),
        ..Default::default()
    }
    .from_env(&ctx);

    let signer = Signer::new(
        ctx.clone(),
        cfg.credential_provider(&ctx),
        RequestSigner::new(&service, &region),
    );
    Some((signer, url))
}

#[tokio::test]
async fn test_head_object_with_config_credential() -> Result<()> {
    let Some((signer, url)) = init_signer() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };

    let req = signing::build_request(&url, Method::HEAD, "not_exist_file")
        .with_header("x-amz-content-sha256", EMPTY_STRING_SHA256)?;
    let signed = signer.sign(req, SigningMethod::Header).await?;
    debug!("signed request url: {}", signed.url());

    let resp = Client::new()
        .execute(signed.into_http_request()?.try_into()?)
        .await?;
    debug!("got response: {resp:?}");
    assert_eq!(StatusCode::NOT_FOUND, resp.status());
    Ok(())
}

#[tokio::test]
async fn test_credential_is_cached_between_requests() -> Result<()> {
    let Some((signer, _)) = init_signer() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };

    let first = signer.credential().await?;
    let second = signer.credential().await?;
    assert_eq!(first.access_key_id, second.access_key_id);
    assert_eq!(first.expires_in, second.expires_in);
    Ok(())
}
