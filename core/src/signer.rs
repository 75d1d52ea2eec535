use crate::{
    Context, Error, ProvideCredential, Result, SignRequest, SignedRequest, SigningCredential,
    SigningMethod, SigningRequest,
};
use log::debug;
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// It resolves the credential through the configured source, caches it until
/// it becomes invalid, and then hands the request to the signing
/// implementation. Only the credential is cached, never derived keys.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get a valid credential, resolving it from the source if needed.
    pub async fn credential(&self) -> Result<K> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|v| v.is_valid()) {
            return Ok(cred);
        }

        debug!("no valid cached credential, resolving from {:?}", self.loader);
        let cred = self
            .loader
            .provide_credential(&self.ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no valid credential found"))?;
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());

        Ok(cred)
    }

    /// Signing request.
    pub async fn sign(&self, req: SigningRequest, method: SigningMethod) -> Result<SignedRequest> {
        let cred = self.credential().await?;
        self.builder.sign_request(req, &cred, method)
    }
}
