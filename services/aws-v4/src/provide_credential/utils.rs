use http::StatusCode;
use quick_xml::de;
use serde::Deserialize;
use sigv4_core::{Error, Result};

/// Get the sts endpoint.
///
/// The returning format may look like `sts.{region}.amazonaws.com`
///
/// # Notes
///
/// AWS could have different sts endpoint based on it's region.
/// We can check them by region name.
///
/// ref: https://github.com/awslabs/aws-sdk-rust/blob/31cfae2cf23be0c68a47357070dea1aee9227e3a/sdk/sts/src/aws_endpoint.rs
pub fn sts_endpoint(region: Option<&str>, use_regional: bool) -> Result<String> {
    if use_regional {
        let region =
            region.ok_or_else(|| Error::config_invalid("regional STS endpoint requires region"))?;
        if region.starts_with("cn-") {
            Ok(format!("sts.{region}.amazonaws.com.cn"))
        } else {
            Ok(format!("sts.{region}.amazonaws.com"))
        }
    } else {
        let region = region.unwrap_or_default();
        if region.starts_with("cn-") {
            Ok("sts.amazonaws.com.cn".to_string())
        } else {
            Ok("sts.amazonaws.com".to_string())
        }
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct ErrorResponse {
    error: StsError,
    request_id: String,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct StsError {
    code: String,
    message: String,
}

/// Turn a non-200 STS response into an [`Error`].
///
/// Denials map to `CredentialDenied`, throttling and server errors are
/// retryable, everything else is `Unexpected`.
pub fn parse_sts_error(
    action: &str,
    status: StatusCode,
    body: &str,
    request_id: Option<&str>,
) -> Error {
    let resp: ErrorResponse = de::from_str(body).unwrap_or_default();
    let code = resp.error.code.as_str();

    let message = if resp.error.message.is_empty() {
        format!("STS {action} failed with status {status}")
    } else {
        format!("STS {action} failed: {}", resp.error.message)
    };
    let err = match code {
        "AccessDenied" | "InvalidClientTokenId" | "SignatureDoesNotMatch" => {
            Error::credential_denied(message)
        }
        "ExpiredToken" | "ExpiredTokenException" => Error::credential_expired(message),
        _ => Error::unexpected(message)
            .set_retryable(code == "Throttling" || status.is_server_error()),
    };

    let mut err = err.with_context(format!("status: {status}"));
    if !code.is_empty() {
        err = err.with_context(format!("code: {code}"));
    }
    let request_id = request_id
        .map(str::to_string)
        .or_else(|| (!resp.request_id.is_empty()).then_some(resp.request_id));
    if let Some(request_id) = request_id {
        err = err.with_context(format!("request_id: {request_id}"));
    }
    err
}
