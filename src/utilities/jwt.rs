use crate::utilities::errors::AppError;
use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utilities::config::Config;

#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_token(config: &Config, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = now + Duration::minutes(config.access_token_expire_in_minutes);

    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret_key.as_bytes());
    let encoded_token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)?;
    Ok(encoded_token)
}

pub fn verify_token(config: &Config, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_key.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

impl<S> FromRequestParts<S> for Claims
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::MissingAuthorizationToken)?;

        let config = Config::from_ref(state);

        let claims = verify_token(&config, bearer.token())?;

        Ok(claims)
    }
}

/// Identity for endpoints that also serve anonymous requests. A missing or
/// invalid bearer token resolves to `None` instead of rejecting, so the
/// visibility filter treats the requester as no-match.
pub struct OptionalClaims(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalClaims
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(TypedHeader(Authorization(bearer))) =
            parts.extract::<TypedHeader<Authorization<Bearer>>>().await
        else {
            return Ok(OptionalClaims(None));
        };

        let config = Config::from_ref(state);

        Ok(OptionalClaims(verify_token(&config, bearer.token()).ok()))
    }
}

impl OptionalClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|claims| claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(ttl_minutes: i64) -> Config {
        Config {
            server_address: "127.0.0.1:0".to_string(),
            tracing_level: tracing::Level::DEBUG,
            database_url: "postgresql://localhost/test".to_string(),
            jwt_secret_key: "test-secret".to_string(),
            access_token_expire_in_minutes: ttl_minutes,
            location_iq_api_key: "key".to_string(),
            unsplash_access_key: "key".to_string(),
        }
    }

    #[test]
    fn token_round_trips() {
        let config = test_config(40);
        let user_id = Uuid::new_v4();

        let token = create_token(&config, user_id).unwrap();
        let claims = verify_token(&config, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config(-5);
        let token = create_token(&config, Uuid::new_v4()).unwrap();

        assert!(matches!(
            verify_token(&config, &token),
            Err(AppError::JsonWebTokenError(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config(40);
        let mut other = test_config(40);
        other.jwt_secret_key = "different-secret".to_string();

        let token = create_token(&other, Uuid::new_v4()).unwrap();

        assert!(verify_token(&config, &token).is_err());
    }
}
