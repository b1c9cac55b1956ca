use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::PortalError;

type HmacSha256 = Hmac<Sha256>;

/// Checks the hex-encoded HMAC-SHA256 of `body` carried in the
/// `x-webhook-signature` header against the shared secret.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> Result<(), PortalError> {
    let provided = hex::decode(signature.trim()).map_err(|_| PortalError::SignatureMismatch)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PortalError::SignatureMismatch)?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| PortalError::SignatureMismatch)
}

#[cfg(test)]
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "portal-webhook-secret";

    #[test]
    fn accepts_a_valid_signature() {
        let body = br#"{"order_number":"W-1042"}"#;
        let signature = sign(SECRET, body);
        assert!(verify(SECRET, body, &signature).is_ok());
    }

    #[test]
    fn rejects_a_tampered_body() {
        let signature = sign(SECRET, b"original");
        assert!(verify(SECRET, b"tampered", &signature).is_err());
    }

    #[test]
    fn rejects_the_wrong_secret() {
        let body = b"payload";
        let signature = sign("other-secret", body);
        assert!(verify(SECRET, body, &signature).is_err());
    }

    #[test]
    fn rejects_non_hex_signatures() {
        assert!(verify(SECRET, b"payload", "not hex at all").is_err());
    }
}
