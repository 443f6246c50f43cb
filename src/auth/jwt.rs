use axum::http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::debug;

use super::claims::{Claims, Permission};
use super::error::AuthError;
use super::jwks::JwksClient;
use crate::config::AuthConfig;

/// Verifies bearer tokens issued by the external identity provider
pub struct TokenVerifier {
    keys: JwksClient,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(keys: JwksClient, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(JwksClient::from_config(config)?, config.issuer(), &config.audience))
    }

    /// Verify the request's bearer token and require `permission` in its claims
    pub async fn authorize(&self, headers: &HeaderMap, permission: Permission) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.verify(token).await?;
        claims.check_permission(permission)?;
        Ok(claims)
    }

    /// Check signature, expiry, audience and issuer and return the claims
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::Unparseable)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let jwk = self.keys.key_for(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|_| AuthError::UnknownKey)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
                AuthError::IncorrectClaims
            }
            _ => AuthError::Unparseable,
        })?;

        debug!("Verified token for subject {}", data.claims.sub);
        Ok(data.claims)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Scheme and token are separated by exactly one space; any other spacing
/// counts as a malformed header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::NotBearer)?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::NotBearer),
        [_] | [_, ""] => Err(AuthError::TokenMissing),
        [_, token] => Ok(*token),
        _ => Err(AuthError::TooManyParts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Ok("abc"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::HeaderMissing));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), Err(AuthError::NotBearer));
        assert_eq!(bearer_token(&headers("Bearer")), Err(AuthError::TokenMissing));
        assert_eq!(bearer_token(&headers("Bearer a b")), Err(AuthError::TooManyParts));
        assert_eq!(bearer_token(&headers("Bearer  abc")), Err(AuthError::TooManyParts));
        assert_eq!(bearer_token(&headers("Bearer ")), Err(AuthError::TokenMissing));
        assert_eq!(bearer_token(&headers("")), Err(AuthError::NotBearer));
    }

    #[tokio::test]
    async fn garbage_token_is_unparseable() {
        let keys = serde_json::from_str(include_str!("../../tests/fixtures/jwks.json")).unwrap();
        let verifier = TokenVerifier::new(JwksClient::fixed(keys), "https://issuer/", "drinks");
        assert_eq!(verifier.verify("not-a-jwt").await.unwrap_err(), AuthError::Unparseable);
    }
}
