use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rbac_core::UserId;

use crate::Role;

/// JWT claims carried by every bearer token.
///
/// Timestamps are encoded as Unix seconds (`iat`/`exp`), which is what the
/// JWT registered claims expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the account the token was issued to.
    pub sub: UserId,

    /// Role at issue time. Informational for the store-backed lookups, which
    /// always re-read the account; authoritative for the authorization gate.
    pub role: Role,

    /// Issuer.
    pub iss: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
///
/// Validates the *claims* only; signature and issuer checks happen in
/// [`crate::TokenService`] before this runs.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), ClaimsValidationError> {
    if claims.exp <= claims.iat {
        return Err(ClaimsValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(ClaimsValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(ClaimsValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(iat: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: UserId::new(),
            role: Role::User,
            iss: "test".into(),
            iat,
            exp: iat + ttl,
        }
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let iat = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::hours(1));

        assert_eq!(validate_claims(&claims, iat), Ok(()));
        assert_eq!(validate_claims(&claims, claims.exp - Duration::seconds(1)), Ok(()));
        assert_eq!(validate_claims(&claims, claims.exp), Err(ClaimsValidationError::Expired));
    }

    #[test]
    fn rejects_future_and_inverted_windows() {
        let iat = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, iat - Duration::seconds(5)),
            Err(ClaimsValidationError::NotYetValid)
        );

        let inverted = claims_at(iat, Duration::seconds(0));
        assert_eq!(validate_claims(&inverted, iat), Err(ClaimsValidationError::InvalidTimeWindow));
    }

    #[test]
    fn timestamps_serialize_as_seconds() {
        let iat = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::hours(1));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iat"], 1_704_067_200i64);
        assert_eq!(json["exp"], 1_704_070_800i64);
        assert_eq!(json["role"], "user");
    }
}
