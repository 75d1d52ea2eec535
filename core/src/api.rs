use crate::{Context, Result, SignedRequest, SigningMethod, SigningRequest};
use std::fmt::Debug;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the credential source used by signer.
///
/// A source may be static (access keys given by the user), read from the
/// environment, or resolved remotely like assuming a role through STS.
/// Resolution is awaited once before signing begins.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this source.
    type Credential: Send + Sync + Unpin + 'static;

    /// Resolve the credential.
    ///
    /// Returns `Ok(None)` if this source has nothing to offer, so that a
    /// chain can move on to the next one.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

#[async_trait::async_trait]
impl<C: Send + Sync + Unpin + 'static> ProvideCredential
    for Box<dyn ProvideCredential<Credential = C>>
{
    type Credential = C;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.as_ref().provide_credential(ctx).await
    }
}

/// SignRequest is the trait used by signer to sign the request.
///
/// Signing is a pure, CPU bound computation: implementations must not
/// perform I/O or resolve credentials themselves.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request with given credential.
    ///
    /// ## Method
    ///
    /// `SigningMethod::Header` attaches the signature as a header while
    /// `SigningMethod::Query` produces a presigned URL.
    fn sign_request(
        &self,
        req: SigningRequest,
        credential: &Self::Credential,
        method: SigningMethod,
    ) -> Result<SignedRequest>;
}
