//! Access Token Signing
//!
//! Stateless credential: `base64url(json payload) "." base64url(HMAC-SHA256)`.
//! The signature covers the encoded payload exactly as transmitted.

use std::fmt;
use std::sync::Arc;

use platform::clock::SharedClock;
use platform::config::env_first;
use platform::crypto::{constant_time_eq, from_base64url, hmac_sha256, random_bytes, to_base64url};
use zeroize::Zeroizing;

use crate::domain::entity::AccessTokenPayload;
use crate::error::{AccessError, AccessResult};

/// Environment keys holding the signing secret, in priority order.
pub const SECRET_ENV_KEYS: [&str; 2] = ["ACCESS_TOKEN_SECRET", "NEXTAUTH_SECRET"];

/// Signs and verifies access tokens
pub trait TokenSigner: Send + Sync {
    /// Encode and sign a payload.
    fn sign(&self, payload: &AccessTokenPayload) -> AccessResult<String>;

    /// Verified, well-formed, unexpired payload, or `None`.
    fn verify(&self, token: &str) -> Option<AccessTokenPayload>;
}

pub type SharedSigner = Arc<dyn TokenSigner>;

/// HMAC-SHA256 token signer
pub struct HmacTokenSigner {
    secret: Option<Zeroizing<Vec<u8>>>,
    clock: SharedClock,
}

impl HmacTokenSigner {
    /// Signer with an explicit secret. An empty secret counts as missing.
    pub fn new(secret: impl Into<Vec<u8>>, clock: SharedClock) -> Self {
        let secret: Vec<u8> = secret.into();
        Self {
            secret: (!secret.is_empty()).then(|| Zeroizing::new(secret)),
            clock,
        }
    }

    /// Secret from `ACCESS_TOKEN_SECRET`, falling back to `NEXTAUTH_SECRET`
    ///
    /// Without either, signing fails and every token is rejected.
    pub fn from_env(clock: SharedClock) -> Self {
        match env_first(&SECRET_ENV_KEYS) {
            Some(secret) => Self::new(secret.into_bytes(), clock),
            None => {
                tracing::warn!("No access token secret configured, paid routes will deny all tokens");
                Self {
                    secret: None,
                    clock,
                }
            }
        }
    }

    /// Create signer with a random 32-byte secret (for development)
    pub fn with_random_secret(clock: SharedClock) -> Self {
        Self::new(random_bytes(32), clock)
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    fn signature(&self, secret: &[u8], encoded_body: &str) -> AccessResult<String> {
        let mac = hmac_sha256(secret, encoded_body.as_bytes())?;
        Ok(to_base64url(&mac))
    }
}

impl TokenSigner for HmacTokenSigner {
    fn sign(&self, payload: &AccessTokenPayload) -> AccessResult<String> {
        let secret = self.secret.as_ref().ok_or(AccessError::MissingSecret)?;
        let json = serde_json::to_vec(payload)
            .map_err(|e| AccessError::Internal(format!("Failed to encode token payload: {e}")))?;
        let body = to_base64url(&json);
        let sig = self.signature(secret, &body)?;
        Ok(format!("{body}.{sig}"))
    }

    fn verify(&self, token: &str) -> Option<AccessTokenPayload> {
        let secret = self.secret.as_ref()?;

        let mut parts = token.split('.');
        let (body, sig) = match (parts.next(), parts.next(), parts.next()) {
            (Some(body), Some(sig), None) if !body.is_empty() && !sig.is_empty() => (body, sig),
            _ => return None,
        };

        let expected = self.signature(secret, body).ok()?;
        if expected.len() != sig.len() || !constant_time_eq(expected.as_bytes(), sig.as_bytes()) {
            return None;
        }

        let json = from_base64url(body).ok()?;
        let payload: AccessTokenPayload = serde_json::from_slice(&json).ok()?;
        if !payload.is_well_formed() || payload.is_expired_at(self.clock.now_secs()) {
            return None;
        }
        Some(payload)
    }
}

impl fmt::Debug for HmacTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacTokenSigner")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::AccessPlan;
    use platform::clock::ManualClock;

    const NOW_SECS: i64 = 1_750_000_000;

    fn signer() -> (Arc<ManualClock>, HmacTokenSigner) {
        let clock = ManualClock::shared(NOW_SECS * 1000);
        (clock.clone(), HmacTokenSigner::new(b"test-secret".to_vec(), clock))
    }

    fn payload(lifetime: i64) -> AccessTokenPayload {
        AccessTokenPayload::new(AccessPlan::Daypass, "cus_1", None, NOW_SECS, lifetime)
    }

    #[test]
    fn test_round_trip() {
        let (_, signer) = signer();
        let p = payload(3600);
        let token = signer.sign(&p).unwrap();
        assert_eq!(token.split('.').count(), 2);
        assert!(!token.contains('='));
        assert_eq!(signer.verify(&token), Some(p));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let (_, signer) = signer();
        let token = signer.sign(&payload(3600)).unwrap();
        let last = token.chars().last().unwrap();
        let swapped = if last == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}{}", &token[..token.len() - 1], swapped);
        assert_eq!(signer.verify(&tampered), None);
    }

    #[test]
    fn test_tampered_body_rejected() {
        let (_, signer) = signer();
        let token = signer.sign(&payload(3600)).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = AccessTokenPayload::new(AccessPlan::Team, "cus_1", None, NOW_SECS, 3600);
        let body = to_base64url(&serde_json::to_vec(&forged).unwrap());
        assert_eq!(signer.verify(&format!("{body}.{sig}")), None);
    }

    #[test]
    fn test_single_char_change_in_body_rejected() {
        let (_, signer) = signer();
        let token = signer.sign(&payload(3600)).unwrap();
        let (body, sig) = token.split_once('.').unwrap();
        for i in [0, body.len() / 2, body.len() - 1] {
            let mut chars: Vec<char> = body.chars().collect();
            chars[i] = if chars[i] == 'x' { 'y' } else { 'x' };
            let tampered: String = chars.into_iter().collect();
            assert_eq!(signer.verify(&format!("{tampered}.{sig}")), None);
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let (clock, signer) = signer();
        let token = signer.sign(&payload(60)).unwrap();
        clock.advance_ms(59_000);
        assert!(signer.verify(&token).is_some());
        clock.advance_ms(1_000);
        assert_eq!(signer.verify(&token), None);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let (_, signer) = signer();
        let token = signer.sign(&payload(60)).unwrap();
        assert_eq!(signer.verify(""), None);
        assert_eq!(signer.verify("abc"), None);
        assert_eq!(signer.verify(".sig"), None);
        assert_eq!(signer.verify("body."), None);
        assert_eq!(signer.verify(&format!("{token}.extra")), None);
    }

    #[test]
    fn test_wrong_version_rejected_even_when_signed() {
        let (_, signer) = signer();
        let mut p = payload(60);
        p.v = 2;
        let token = signer.sign(&p).unwrap();
        assert_eq!(signer.verify(&token), None);
    }

    #[test]
    fn test_other_secret_rejected() {
        let (clock, signer) = signer();
        let token = signer.sign(&payload(60)).unwrap();
        let other = HmacTokenSigner::new(b"another-secret".to_vec(), clock);
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn test_missing_secret() {
        let clock = ManualClock::shared(NOW_SECS * 1000);
        let signer = HmacTokenSigner::new(Vec::new(), clock);
        assert!(!signer.has_secret());
        assert!(matches!(signer.sign(&payload(60)), Err(AccessError::MissingSecret)));
        assert_eq!(signer.verify("a.b"), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let (_, signer) = signer();
        let debug = format!("{signer:?}");
        assert!(!debug.contains("test-secret"));
        assert!(debug.contains("redacted"));
    }
}
