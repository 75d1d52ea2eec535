use crate::constants::X_AMZ_CONTENT_SHA_256;
use crate::credential::Credential;
use crate::provide_credential::utils::{parse_sts_error, sts_endpoint};
use crate::EMPTY_STRING_SHA256;
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::Method;
use log::debug;
use quick_xml::de;
use serde::Deserialize;
use sigv4_core::time::parse_rfc3339;
use sigv4_core::{
    Context, Error, ProvideCredential, Result, Signer, SigningMethod, SigningRequest,
};

/// Default lifetime of assumed role credentials, in seconds.
pub const DEFAULT_DURATION_SECONDS: u32 = 3600;
const DEFAULT_ROLE_SESSION_NAME: &str = "sigv4";

/// AssumeRoleCredentialProvider will load credential via assume role.
///
/// The STS request is signed by `sts_signer`, which holds the base
/// credential.
#[derive(Debug)]
pub struct AssumeRoleCredentialProvider {
    role_arn: String,
    role_session_name: String,
    external_id: Option<String>,
    duration_seconds: u32,

    region: Option<String>,
    use_regional_sts_endpoint: bool,

    sts_signer: Signer<Credential>,
}

impl AssumeRoleCredentialProvider {
    /// Create a new assume role loader.
    pub fn new(role_arn: String, sts_signer: Signer<Credential>) -> Self {
        Self {
            role_arn,
            role_session_name: DEFAULT_ROLE_SESSION_NAME.to_string(),
            external_id: None,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            region: None,
            use_regional_sts_endpoint: false,
            sts_signer,
        }
    }

    /// Set the role session name.
    pub fn with_role_session_name(mut self, name: String) -> Self {
        self.role_session_name = name;
        self
    }

    /// Set the external ID.
    pub fn with_external_id(mut self, id: String) -> Self {
        self.external_id = Some(id);
        self
    }

    /// Set the duration in seconds.
    pub fn with_duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: String) -> Self {
        self.region = Some(region);
        self
    }

    /// Use regional STS endpoint.
    pub fn with_regional_sts_endpoint(mut self) -> Self {
        self.use_regional_sts_endpoint = true;
        self
    }

    fn build_request(&self, endpoint: &str) -> Result<SigningRequest> {
        let mut req = SigningRequest::new(Method::GET, endpoint)
            .with_query("Action", "AssumeRole")
            .with_query("RoleArn", &self.role_arn)
            .with_query("Version", "2011-06-15")
            .with_query("RoleSessionName", &self.role_session_name)
            .with_header(CONTENT_TYPE.as_str(), "application/x-www-form-urlencoded")?
            .with_header(X_AMZ_CONTENT_SHA_256, EMPTY_STRING_SHA256)?;
        if let Some(external_id) = &self.external_id {
            req = req.with_query("ExternalId", external_id);
        }

        Ok(req.with_query("DurationSeconds", self.duration_seconds.to_string()))
    }
}

#[async_trait]
impl ProvideCredential for AssumeRoleCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let endpoint = sts_endpoint(self.region.as_deref(), self.use_regional_sts_endpoint)
            .map_err(|e| e.with_context(format!("role_arn: {}", self.role_arn)))?;

        let req = self.build_request(&endpoint).map_err(|e| {
            e.with_context(format!("role_arn: {}", self.role_arn))
                .with_context(format!("endpoint: https://{endpoint}"))
        })?;
        let req = self
            .sts_signer
            .sign(req, SigningMethod::Header)
            .await?
            .into_http_request()?;

        debug!("assuming role {} via {endpoint}", self.role_arn);
        let resp = ctx.http_send_as_string(req).await.map_err(|e| {
            Error::unexpected("failed to send AssumeRole request to STS")
                .with_source(e)
                .with_context(format!("role_arn: {}", self.role_arn))
                .with_context(format!("endpoint: https://{endpoint}"))
                .set_retryable(true)
        })?;

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("x-amzn-requestid")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if status != http::StatusCode::OK {
            let content = resp.into_body();
            return Err(
                parse_sts_error("AssumeRole", status, &content, request_id.as_deref())
                    .with_context(format!("role_arn: {}", self.role_arn))
                    .with_context(format!("session_name: {}", self.role_session_name)),
            );
        }

        let body = resp.into_body();
        let resp: AssumeRoleResponse = de::from_str(&body).map_err(|e| {
            Error::unexpected("failed to parse STS AssumeRole response")
                .with_source(e)
                .with_context(format!("response_length: {}", body.len()))
                .with_context(format!("role_arn: {}", self.role_arn))
        })?;
        let resp_cred = resp.result.credentials;

        let expires_in = parse_rfc3339(&resp_cred.expiration).map_err(|e| {
            Error::unexpected("failed to parse AssumeRole credential expiration")
                .with_source(e)
                .with_context(format!("expiration_value: {}", resp_cred.expiration))
                .with_context(format!("role_arn: {}", self.role_arn))
        })?;

        let cred = Credential::new(&resp_cred.access_key_id, &resp_cred.secret_access_key)
            .with_session_token(resp_cred.session_token.trim())
            .with_expires_in(expires_in);
        Ok(Some(cred))
    }
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleResponse {
    #[serde(rename = "AssumeRoleResult")]
    result: AssumeRoleResult,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleResult {
    credentials: AssumeRoleCredentials,
}

#[derive(Default, Debug, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct AssumeRoleCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiration: String,
}
