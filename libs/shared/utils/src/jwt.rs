use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_config::TOKEN_TTL_HOURS;
use shared_models::auth::{Identity, JwtClaims, JwtHeader};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Failed to encode token")]
    Encoding,
}

/// Signs a 24-hour assertion of `identity`.
pub fn issue_token(identity: &Identity, jwt_secret: &str) -> Result<String, TokenError> {
    issue_token_at(identity, jwt_secret, Utc::now())
}

pub fn issue_token_at(
    identity: &Identity,
    jwt_secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let header = JwtHeader {
        alg: ALGORITHM.to_string(),
        typ: "JWT".to_string(),
    };
    let claims = JwtClaims {
        sub: identity.account_id(),
        role: identity.role(),
        iat: issued_at.timestamp(),
        exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };

    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).map_err(|_| TokenError::Encoding)?);
    let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).map_err(|_| TokenError::Encoding)?);
    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let signature = sign(signing_input.as_bytes(), jwt_secret)?;
    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

fn sign(input: &[u8], jwt_secret: &str) -> Result<Vec<u8>, TokenError> {
    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes()).map_err(|_| TokenError::Encoding)?;
    mac.update(input);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Verifies signature and expiry and returns the asserted identity.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Identity, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let parts: Vec<&str> = token.split('.').collect();
    let [header_b64, claims_b64, signature_b64] = parts.as_slice() else {
        return Err(TokenError::Malformed);
    };

    let header: JwtHeader = decode_segment(header_b64)?;
    if header.alg != ALGORITHM {
        debug!("Rejected token signed with {}", header.alg);
        return Err(TokenError::Malformed);
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::BadSignature
    })?;

    let mut mac = HmacSha256::new_from_slice(jwt_secret.as_bytes()).map_err(|_| TokenError::BadSignature)?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let claims: JwtClaims = decode_segment(claims_b64)?;

    let now = Utc::now().timestamp();
    if claims.exp <= now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(TokenError::Expired);
    }

    Ok(claims.identity())
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        debug!("Failed to parse token segment: {}", e);
        TokenError::Malformed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-for-jwt-validation";

    #[test]
    fn issued_token_validates_to_same_identity() {
        let identity = Identity::Doctor { account_id: Uuid::new_v4() };
        let token = issue_token(&identity, SECRET).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, SECRET).unwrap(), identity);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let identity = Identity::Patient { account_id: Uuid::new_v4() };
        let token = issue_token(&identity, "another-secret").unwrap();

        assert_matches!(validate_token(&token, SECRET), Err(TokenError::BadSignature));
    }

    #[test]
    fn token_expires_after_a_day() {
        let identity = Identity::Patient { account_id: Uuid::new_v4() };
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS) - Duration::minutes(1);
        let token = issue_token_at(&identity, SECRET, issued).unwrap();

        assert_matches!(validate_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_claims_fail_signature() {
        let token = issue_token(&Identity::Patient { account_id: Uuid::new_v4() }, SECRET).unwrap();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::json!({
                "sub": Uuid::new_v4(),
                "role": "admin",
                "iat": Utc::now().timestamp(),
                "exp": Utc::now().timestamp() + 3600,
            })
            .to_string(),
        );
        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert_matches!(validate_token(&forged, SECRET), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(validate_token("invalid.token", SECRET), Err(TokenError::Malformed));
        assert_matches!(validate_token("a.b.c", SECRET), Err(TokenError::Malformed));
        assert_matches!(validate_token("a.b.c", ""), Err(TokenError::MissingSecret));
    }
}
