//! Payment signature verification
//!
//! The gateway signs `"{gateway_order_id}|{payment_id}"` with HMAC-SHA256
//! over the merchant secret and sends the hex digest back through the
//! client. Verification recomputes the digest and compares in constant
//! time; the client-supplied hex is decoded first so casing differences
//! cannot cause a false mismatch.

use ring::hmac;

/// Compute the hex HMAC-SHA256 signature for a payment confirmation
pub fn compute_signature(secret: &str, gateway_order_id: &str, payment_id: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let message = format!("{gateway_order_id}|{payment_id}");
    let tag = hmac::sign(&key, message.as_bytes());
    hex::encode(tag.as_ref())
}

/// Constant-time check of a client-supplied signature
pub fn verify_signature(
    secret: &str,
    gateway_order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let message = format!("{gateway_order_id}|{payment_id}");
    hmac::verify(&key, message.as_bytes(), &provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_round_trip() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz");
        assert!(verify_signature("secret", "order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_altered_payment_id_fails() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz");
        assert!(!verify_signature("secret", "order_abc", "pay_other", &signature));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz");
        assert!(!verify_signature("other", "order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let signature = compute_signature("secret", "order_abc", "pay_xyz").to_uppercase();
        assert!(verify_signature("secret", "order_abc", "pay_xyz", &signature));
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        assert!(!verify_signature("secret", "order_abc", "pay_xyz", "not-hex!"));
    }
}
