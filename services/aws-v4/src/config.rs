use crate::constants::*;
use crate::provide_credential::{
    AssumeRoleCredentialProvider, DefaultCredentialProvider, DEFAULT_DURATION_SECONDS,
};
use crate::{Credential, RequestSigner};
use sigv4_core::utils::Redact;
use sigv4_core::{Context, ProvideCredential, Signer};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Region used to reach STS when none is configured.
const DEFAULT_STS_REGION: &str = "us-east-1";

/// Config for aws services.
#[derive(Clone, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    pub region: Option<String>,
    /// `sts_regional_endpoints` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_STS_REGIONAL_ENDPOINTS`]
    /// - default to `legacy`
    pub sts_regional_endpoints: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SECRET_ACCESS_KEY`]
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_SESSION_TOKEN`]
    pub session_token: Option<String>,
    /// `role_arn` value will be load from:
    ///
    /// - this field if it's `is_some`.
    /// - env value: [`AWS_ROLE_ARN`]
    ///
    /// The role is assumed through STS if set.
    pub role_arn: Option<String>,
    /// `role_session_name` value will be load from:
    ///
    /// - this field if it's `is_some`.
    /// - env value: [`AWS_ROLE_SESSION_NAME`]
    /// - default to `sigv4`.
    pub role_session_name: Option<String>,
    /// `external_id` value will be load from:
    ///
    /// - this field if it's `is_some`.
    /// - env value: [`AWS_EXTERNAL_ID`]
    pub external_id: Option<String>,
    /// Lifetime of the assumed role credential, default to 3600 seconds.
    pub duration_seconds: Option<u32>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("sts_regional_endpoints", &self.sts_regional_endpoints)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("role_arn", &self.role_arn)
            .field("role_session_name", &self.role_session_name)
            .field("external_id", &self.external_id)
            .field("duration_seconds", &self.duration_seconds)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();
        let fill = |field: &mut Option<String>, key: &str| {
            if field.is_none() {
                *field = envs.get(key).filter(|v| !v.is_empty()).cloned();
            }
        };

        fill(&mut self.region, AWS_REGION);
        fill(&mut self.sts_regional_endpoints, AWS_STS_REGIONAL_ENDPOINTS);
        fill(&mut self.access_key_id, AWS_ACCESS_KEY_ID);
        fill(&mut self.secret_access_key, AWS_SECRET_ACCESS_KEY);
        fill(&mut self.session_token, AWS_SESSION_TOKEN);
        fill(&mut self.role_arn, AWS_ROLE_ARN);
        fill(&mut self.role_session_name, AWS_ROLE_SESSION_NAME);
        fill(&mut self.external_id, AWS_EXTERNAL_ID);
        self
    }

    /// Build the credential source this config describes.
    ///
    /// - With `role_arn`: assume the role, signing the STS call with the
    ///   default chain credential.
    /// - Otherwise: the default chain.
    pub fn credential_provider(
        self,
        ctx: &Context,
    ) -> Box<dyn ProvideCredential<Credential = Credential>> {
        let cfg = Arc::new(self);
        let base = DefaultCredentialProvider::new(cfg.clone());

        let Some(role_arn) = cfg.role_arn.clone() else {
            return Box::new(base);
        };

        let sts_region = cfg.region.as_deref().unwrap_or(DEFAULT_STS_REGION);
        let sts_signer = Signer::new(ctx.clone(), base, RequestSigner::new("sts", sts_region));

        let mut provider = AssumeRoleCredentialProvider::new(role_arn, sts_signer)
            .with_duration_seconds(cfg.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS));
        if let Some(name) = &cfg.role_session_name {
            provider = provider.with_role_session_name(name.clone());
        }
        if let Some(id) = &cfg.external_id {
            provider = provider.with_external_id(id.clone());
        }
        if let Some(region) = &cfg.region {
            provider = provider.with_region(region.clone());
        }
        if cfg.sts_regional_endpoints.as_deref() == Some("regional") {
            provider = provider.with_regional_sts_endpoint();
        }

        Box::new(provider)
    }
}
