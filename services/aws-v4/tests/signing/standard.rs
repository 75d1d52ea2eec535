use super::{build_request, init_signing_test, load_static_credential, send_signed_request};
use anyhow::Result;
use http::{Method, StatusCode};
use log::warn;
use sha2::{Digest, Sha256};
use sigv4_aws::EMPTY_STRING_SHA256;
use sigv4_core::SigningMethod;

#[tokio::test]
async fn test_head_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let cred = load_static_credential();

    let req = build_request(&url, Method::HEAD, "not_exist_file")
        .with_header("x-amz-content-sha256", EMPTY_STRING_SHA256)?;

    let (status, _) = send_signed_request(&signer, req, &cred, SigningMethod::Header).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_head_object_with_special_characters() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let cred = load_static_credential();

    let req = build_request(&url, Method::HEAD, "!@#$^&*()_+-=;:'><,?.txt")
        .with_header("x-amz-content-sha256", EMPTY_STRING_SHA256)?;

    let (status, _) = send_signed_request(&signer, req, &cred, SigningMethod::Header).await?;
    assert_eq!(StatusCode::NOT_FOUND, status);
    Ok(())
}

#[tokio::test]
async fn test_put_object() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let cred = load_static_credential();

    let body = "Hello, World!";
    let body_digest = hex::encode(Sha256::digest(body).as_slice());
    let req = build_request(&url, Method::PUT, "put_object_test")
        .with_header("x-amz-content-sha256", &body_digest)?
        .with_body(body);

    let (status, _) = send_signed_request(&signer, req, &cred, SigningMethod::Header).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_list_bucket() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let cred = load_static_credential();

    let req = build_request(&url, Method::GET, "")
        .with_query("list-type", "2")
        .with_query("delimiter", "/")
        .with_query("encoding-type", "url")
        .with_header("x-amz-content-sha256", EMPTY_STRING_SHA256)?;

    let (status, _) = send_signed_request(&signer, req, &cred, SigningMethod::Header).await?;
    assert_eq!(StatusCode::OK, status);
    Ok(())
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() -> Result<()> {
    let Some((signer, url)) = init_signing_test() else {
        warn!("SIGV4_AWS_TEST is not set, skipped");
        return Ok(());
    };
    let mut cred = load_static_credential();
    cred.secret_access_key.push('x');

    let req = build_request(&url, Method::HEAD, "not_exist_file")
        .with_header("x-amz-content-sha256", EMPTY_STRING_SHA256)?;

    let (status, _) = send_signed_request(&signer, req, &cred, SigningMethod::Header).await?;
    assert_eq!(StatusCode::FORBIDDEN, status);
    Ok(())
}
