use crate::canonical::CanonicalRequest;
use crate::constants::AWS4_HMAC_SHA256;
use crate::scope::SigningContext;
use sigv4_core::hash::hex_sha256;

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn build_string_to_sign(creq: &CanonicalRequest, ctx: &SigningContext) -> String {
    let hashed = hex_sha256(creq.to_string().as_bytes());

    format!(
        "{AWS4_HMAC_SHA256}\n{}\n{}\n{hashed}",
        ctx.timestamp(),
        ctx.scope()
    )
}
