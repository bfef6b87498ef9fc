use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, state::AppState};

/// Claim set carried by a session token: user id, login email, expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub exp: usize,
}

/// HS256 signing/verification keys plus the token lifetime. Built once per
/// request from config; the secret itself never leaves `AppConfig`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_hours } = state.config.jwt.clone();
        Self::new(secret.as_bytes(), Duration::hours(ttl_hours))
    }
}

impl JwtKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Sign a token expiring `ttl` after `now`. `now` is explicit so expiry
    /// behavior is testable with a pinned clock.
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            exp: (now + self.ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn issue(&self, user_id: i64, email: &str) -> anyhow::Result<String> {
        self.issue_at(user_id, email, OffsetDateTime::now_utc())
    }

    /// Verify signature, structure and expiry against the supplied clock.
    /// Bad signature, malformed token and expired token all collapse into
    /// `None`; callers never learn which it was.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Option<Claims> {
        let mut validation = Validation::default();
        // expiry is checked below against the caller's clock, not the system's
        validation.validate_exp = false;
        let claims = match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!(error = %e, "jwt rejected");
                return None;
            }
        };
        if claims.exp as i64 <= now.unix_timestamp() {
            debug!(user_id = claims.sub, "jwt expired");
            return None;
        }
        Some(claims)
    }

    pub fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn keys() -> JwtKeys {
        JwtKeys::new(b"test-secret", Duration::hours(24))
    }

    #[test]
    fn issue_and_verify_within_lifetime() {
        let keys = keys();
        let issued_at = datetime!(2024-01-01 00:00:00 UTC);
        let token = keys.issue_at(42, "a@b.com", issued_at).expect("issue");

        let claims = keys
            .verify_at(&token, issued_at + Duration::hours(1))
            .expect("token should still be valid");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn verify_rejects_after_expiry() {
        let keys = keys();
        let issued_at = datetime!(2024-01-01 00:00:00 UTC);
        let token = keys.issue_at(42, "a@b.com", issued_at).expect("issue");

        assert!(keys
            .verify_at(&token, issued_at + Duration::hours(25))
            .is_none());
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let keys = keys();
        let issued_at = datetime!(2024-01-01 00:00:00 UTC);
        let token = keys.issue_at(7, "edge@case.dev", issued_at).expect("issue");

        let just_before = issued_at + Duration::hours(23) + Duration::minutes(59);
        let exactly = issued_at + Duration::hours(24);
        let just_after = issued_at + Duration::hours(24) + Duration::minutes(1);

        assert!(keys.verify_at(&token, just_before).is_some());
        assert!(keys.verify_at(&token, exactly).is_none());
        assert!(keys.verify_at(&token, just_after).is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = keys();
        let now = datetime!(2024-01-01 00:00:00 UTC);
        let token = keys.issue_at(1, "t@t.dev", now).expect("issue");

        let mid = token.len() / 2;
        let original = token.as_bytes()[mid];
        let flipped = if original == b'A' { b'B' } else { b'A' };
        let mut bytes = token.into_bytes();
        bytes[mid] = flipped;
        let tampered = String::from_utf8(bytes).expect("still utf8");

        assert!(keys.verify_at(&tampered, now + Duration::hours(1)).is_none());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = datetime!(2024-01-01 00:00:00 UTC);
        let token = keys().issue_at(1, "t@t.dev", now).expect("issue");
        let other = JwtKeys::new(b"another-secret", Duration::hours(24));
        assert!(other.verify_at(&token, now + Duration::hours(1)).is_none());
    }

    #[test]
    fn malformed_token_is_rejected_not_an_error() {
        let keys = keys();
        let now = datetime!(2024-01-01 00:00:00 UTC);
        assert!(keys.verify_at("", now).is_none());
        assert!(keys.verify_at("not.a.jwt", now).is_none());
        assert!(keys.verify_at("a.b", now).is_none());
    }
}
