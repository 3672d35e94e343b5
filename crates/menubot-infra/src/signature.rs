//! Webhook payload signature verification.
//!
//! Meta signs every webhook delivery with the app secret and sends the
//! result as `X-Hub-Signature-256: sha256=<hex>`.
//!
//! - `verify_signature()` -- constant-time HMAC-SHA256 check of a raw body
//! - `sign()` -- compute the header value for a body

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Errors from webhook signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("missing {SIGNATURE_HEADER} header")]
    Missing,

    #[error("malformed signature header")]
    Malformed,

    #[error("signature does not match payload")]
    Mismatch,

    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// Verify `header` (the `X-Hub-Signature-256` value, if any) against `body`.
///
/// Accepts both `sha256=<hex>` and bare hex. Comparison is constant-time
/// (via the hmac crate's `verify_slice`).
pub fn verify_signature(
    secret: &[u8],
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?.trim();
    let hex = header.strip_prefix(SIGNATURE_PREFIX).unwrap_or(header);
    let expected = hex_decode(hex).ok_or(SignatureError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute the `sha256=<hex>` header value for `body`.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Ok(format!("{SIGNATURE_PREFIX}{}", hex_encode(&digest)))
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.is_empty() || hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"app-secret";
    const BODY: &[u8] = br#"{"object":"whatsapp_business_account","entry":[]}"#;

    #[test]
    fn test_sign_then_verify() {
        let header = sign(SECRET, BODY).unwrap();
        assert!(header.starts_with("sha256="));
        assert_eq!(header.len(), "sha256=".len() + 64);
        assert!(verify_signature(SECRET, BODY, Some(&header)).is_ok());
    }

    #[test]
    fn test_verify_accepts_bare_hex() {
        let header = sign(SECRET, BODY).unwrap();
        let bare = header.trim_start_matches("sha256=");
        assert!(verify_signature(SECRET, BODY, Some(bare)).is_ok());
    }

    #[test]
    fn test_verify_rejects_other_body() {
        let header = sign(SECRET, BODY).unwrap();
        let err = verify_signature(SECRET, b"{}", Some(&header)).unwrap_err();
        assert!(matches!(err, SignatureError::Mismatch));
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let header = sign(b"someone-else", BODY).unwrap();
        assert!(matches!(
            verify_signature(SECRET, BODY, Some(&header)),
            Err(SignatureError::Mismatch)
        ));
    }

    #[test]
    fn test_verify_missing_header() {
        assert!(matches!(
            verify_signature(SECRET, BODY, None),
            Err(SignatureError::Missing)
        ));
    }

    #[test]
    fn test_verify_malformed_header() {
        for header in ["sha256=", "sha256=zz", "sha256=abc", "sha256=ñá"] {
            assert!(
                matches!(
                    verify_signature(SECRET, BODY, Some(header)),
                    Err(SignatureError::Malformed)
                ),
                "{header}"
            );
        }
    }

    #[test]
    fn test_hmac_sha256_rfc4231_vector2() {
        let header = sign(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            header,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }
}
