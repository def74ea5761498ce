//! Bearer token issuance and verification (HS256 JWT).
//!
//! Tokens are stateless: nothing is persisted on issue, and validity is decided
//! solely by signature, issuer and expiry at verification time.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use rbac_core::UserId;

use crate::claims::{validate_claims, ClaimsValidationError, TokenClaims};
use crate::Role;

/// Token service configuration.
#[derive(Clone)]
pub struct TokenConfig {
    /// Server-held HMAC secret.
    pub secret: String,
    /// Lifetime of an issued token.
    pub ttl: Duration,
    /// `iss` claim written on issue and required on verify.
    pub issuer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: "dev-secret".to_string(),
            ttl: Duration::hours(24),
            issuer: "rbac-demo".to_string(),
        }
    }
}

impl core::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature and shape were fine but `now >= exp`.
    #[error("token has expired")]
    Expired,

    /// Malformed, wrongly signed, wrong issuer, or an impossible time window.
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired)
    }
}

/// Identity recovered from a successfully verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies signed, time-limited bearer tokens.
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked by `validate_claims` with an exclusive boundary and
        // no leeway, so the library's own exp check is turned off.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Issue a token for `user_id` with the given role claim.
    pub fn issue(&self, user_id: UserId, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub fn issue_at(&self, user_id: UserId, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let exp = now
            .checked_add_signed(self.config.ttl)
            .ok_or_else(|| TokenError::Signing(format!("expiry out of range for ttl {}", self.config.ttl)))?;
        let claims = TokenClaims {
            sub: user_id,
            role,
            iss: self.config.issuer.clone(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, issuer and expiry. Pure: no store lookups.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        let claims = data.claims;

        validate_claims(&claims, now).map_err(|e| match e {
            ClaimsValidationError::Expired => TokenError::Expired,
            other => TokenError::Invalid(other.to_string()),
        })?;

        Ok(VerifiedToken {
            user_id: claims.sub,
            role: claims.role,
            expires_at: claims.exp,
        })
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService").field("config", &self.config).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(TokenConfig {
            secret: secret.to_string(),
            ..TokenConfig::default()
        })
    }

    #[test]
    fn issue_then_verify_returns_same_identity() {
        let svc = service("s3cret");
        for role in [Role::User, Role::Admin] {
            let user_id = UserId::new();
            let token = svc.issue(user_id, role).unwrap();
            let verified = svc.verify(&token).unwrap();
            assert_eq!(verified.user_id, user_id);
            assert_eq!(verified.role, role);
        }
    }

    #[test]
    fn token_expires_at_ttl() {
        let svc = service("s3cret");
        let issued_at = Utc::now();
        let token = svc.issue_at(UserId::new(), Role::User, issued_at).unwrap();

        assert!(svc.verify_at(&token, issued_at + Duration::hours(23)).is_ok());

        let err = svc.verify_at(&token, issued_at + Duration::hours(24) + Duration::seconds(1)).unwrap_err();
        assert!(err.is_expired());
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        let svc = TokenService::new(TokenConfig {
            ttl: Duration::try_days(100_000_000).unwrap(),
            ..TokenConfig::default()
        });
        let err = svc.issue(UserId::new(), Role::User).unwrap_err();
        assert!(matches!(err, TokenError::Signing(_)));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = service("one").issue(UserId::new(), Role::Admin).unwrap();
        let err = service("two").verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn wrong_issuer_is_invalid() {
        let other = TokenService::new(TokenConfig {
            issuer: "someone-else".into(),
            ..TokenConfig::default()
        });
        let token = other.issue(UserId::new(), Role::User).unwrap();
        let err = TokenService::new(TokenConfig::default()).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn malformed_tokens_are_invalid() {
        let svc = service("s3cret");
        for garbage in ["", "abc", "a.b.c", "Bearer xyz"] {
            assert!(matches!(svc.verify(garbage), Err(TokenError::Invalid(_))), "{garbage:?}");
        }
    }

    #[test]
    fn tampered_role_claim_is_rejected() {
        let svc = service("s3cret");
        let token = svc.issue(UserId::new(), Role::User).unwrap();

        // Swap the payload for one claiming admin, keeping the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = TokenClaims {
            sub: UserId::new(),
            role: Role::Admin,
            iss: "rbac-demo".into(),
            iat: Utc::now(),
            exp: Utc::now() + Duration::hours(1),
        };
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &forged_claims,
            &EncodingKey::from_secret(b"attacker"),
        )
        .unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(svc.verify(&spliced), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn debug_output_hides_secret() {
        let svc = service("very-secret-value");
        assert!(!format!("{svc:?}").contains("very-secret-value"));
    }
}
