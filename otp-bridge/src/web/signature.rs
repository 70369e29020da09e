//! LINE webhook signature verification.
//!
//! LINE signs every webhook body with HMAC-SHA256 keyed by the channel secret
//! and sends the base64 digest in the `x-line-signature` header.
//! Reference: https://developers.line.biz/en/docs/messaging-api/receiving-messages/#verify-signature

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verify a LINE webhook signature.
///
/// # Arguments
///
/// * `channel_secret` - The channel secret from the LINE console
/// * `body` - The request body exactly as received
/// * `signature` - The `x-line-signature` header value, if present
///
/// The digest is compared in constant time.
pub fn verify_signature(
    channel_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), SignatureError> {
    let signature = match signature.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => {
            warn!(body_length = body.len(), "line_signature_missing");
            return Err(SignatureError::Missing);
        }
    };

    let provided = BASE64.decode(signature).map_err(|_| {
        warn!(signature_length = signature.len(), "line_signature_malformed");
        SignatureError::Malformed
    })?;

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).map_err(|_| {
        warn!("line_signature_invalid_key");
        SignatureError::Mismatch
    })?;
    mac.update(body);

    mac.verify_slice(&provided).map_err(|_| {
        warn!(body_length = body.len(), "line_signature_mismatch");
        SignatureError::Mismatch
    })
}

#[cfg(test)]
pub(crate) fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).unwrap();
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-channel-secret";
    const BODY: &[u8] = br#"{"destination":"U0","events":[]}"#;

    #[test]
    fn test_verify_signature_valid() {
        let signature = sign(SECRET, BODY);
        assert_eq!(verify_signature(SECRET, BODY, Some(&signature)), Ok(()));
    }

    #[test]
    fn test_verify_signature_known_vector() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog"), base64.
        let body = b"The quick brown fox jumps over the lazy dog";
        let signature = "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg=";
        assert_eq!(verify_signature("key", body, Some(signature)), Ok(()));
    }

    #[test]
    fn test_verify_signature_missing() {
        assert_eq!(verify_signature(SECRET, BODY, None), Err(SignatureError::Missing));
        assert_eq!(
            verify_signature(SECRET, BODY, Some("  ")),
            Err(SignatureError::Missing)
        );
    }

    #[test]
    fn test_verify_signature_malformed() {
        assert_eq!(
            verify_signature(SECRET, BODY, Some("not base64!")),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let signature = sign("other-secret", BODY);
        assert_eq!(
            verify_signature(SECRET, BODY, Some(&signature)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_any_single_byte_mutation_fails() {
        let signature = sign(SECRET, BODY);

        for i in 0..BODY.len() {
            let mut mutated = BODY.to_vec();
            mutated[i] ^= 0x01;
            assert_eq!(
                verify_signature(SECRET, &mutated, Some(&signature)),
                Err(SignatureError::Mismatch),
                "mutation at byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_truncated_signature_fails() {
        let signature = sign(SECRET, BODY);
        let digest = BASE64.decode(&signature).unwrap();
        let truncated = BASE64.encode(&digest[..16]);
        assert_eq!(
            verify_signature(SECRET, BODY, Some(&truncated)),
            Err(SignatureError::Mismatch)
        );
    }
}
