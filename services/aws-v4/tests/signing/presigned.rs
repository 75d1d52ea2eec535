use super::{build_request, init_signing_test, load_static_credential, send_signed_request};
use anyhow::Result;
use http::{Method, StatusCode};
use log::warn;
use sigv4_core::SigningMethod;
use std::time::Duration;

const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

#[tokio::test]
async fn test_get_object_with_presigned_url() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let cred = load_static_credential();

    let req = build_request(&url, Method::GET, "not_exist_file")
        .with_header("x-amz-content-sha256", UNSIGNED_PAYLOAD)?;

    let (status, _) = send_signed_request(
        &signer,
        req,
        &cred,
        SigningMethod::presign(Duration::from_secs(3600)),
    )
    .await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object_with_presigned_url() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let cred = load_static_credential();

    let req = build_request(&url, Method::PUT, "presigned_put_object_test")
        .with_header("x-amz-content-sha256", UNSIGNED_PAYLOAD)?
        .with_body("Hello, presigned!");

    let (status, _) = send_signed_request(
        &signer,
        req,
        &cred,
        SigningMethod::presign(Duration::from_secs(3600)),
    )
    .await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}
