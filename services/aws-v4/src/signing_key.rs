use crate::constants::AWS4_REQUEST;
use sigv4_core::hash::hmac_sha256;

/// Derive the signing key scoped to one date, region and service.
///
/// `date` is the `YYYYMMDD` form of the signing time. Intermediate keys are
/// raw bytes, never hex. The result must not be logged or persisted.
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret_key}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
