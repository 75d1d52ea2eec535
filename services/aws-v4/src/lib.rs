//! AWS Signature Version 4 signer
//!
//! ## Example
//!
//! ```no_run
//! use sigv4_aws::{Config, RequestSigner};
//! use sigv4_core::{Context, OsEnv, Signer, SigningMethod, SigningRequest};
//!
//! # async fn example() -> sigv4_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let cfg = Config::default().from_env(&ctx);
//! let region = cfg.region.clone().unwrap_or_else(|| "us-east-1".to_string());
//!
//! let signer = Signer::new(
//!     ctx.clone(),
//!     cfg.credential_provider(&ctx),
//!     RequestSigner::new("execute-api", &region),
//! );
//!
//! let req = SigningRequest::new(http::Method::GET, "example.com")
//!     .with_path("/users")
//!     .with_query("param1", "paramValue");
//! let signed = signer.sign(req, SigningMethod::Header).await?;
//! println!("{}", signed.url());
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod constants;
pub use constants::EMPTY_STRING_SHA256;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod canonical;
pub use canonical::{
    canonical_headers, canonical_query, canonical_uri, canonicalize, normalize_header_value,
    payload_hash, requires_body, CanonicalRequest,
};

mod scope;
pub use scope::SigningContext;

mod string_to_sign;
pub use string_to_sign::build_string_to_sign;

mod signing_key;
pub use signing_key::derive_signing_key;

mod sign_request;
pub use sign_request::RequestSigner;
