//! Core components for signing API requests.
//!
//! This crate provides the foundational types and traits shared by signers.
//!
//! ## Overview
//!
//! - **Context**: holds the environment and HTTP capabilities credential sources may use
//! - **Traits**: credential resolution (`ProvideCredential`) and request signing (`SignRequest`)
//! - **Signer**: resolves the credential once, caches it, and signs requests with it
//!
//! ## Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use sigv4_core::{
//!     Context, ProvideCredential, Result, SignRequest, SignedRequest, Signer,
//!     SigningCredential, SigningMethod, SigningRequest,
//! };
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         _req: SigningRequest,
//!         _cred: &Self::Credential,
//!         _method: SigningMethod,
//!     ) -> Result<SignedRequest> {
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::new(), MyLoader, MySigner);
//!
//! let req = SigningRequest::new(http::Method::GET, "example.com");
//! let signed = signer.sign(req, SigningMethod::Header).await?;
//! println!("{}", signed.url());
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
mod request;
pub use request::{SignedRequest, SigningMethod, SigningRequest};
mod signer;
pub use signer::Signer;
