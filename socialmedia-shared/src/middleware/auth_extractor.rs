use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims, JwtSecret};

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let secret = JwtSecret::from_ref(state);
        let token = extract_bearer_token(&parts.headers)?;
        let claims = validate_jwt(token, &secret)?;

        if claims.is_expired() {
            return Err(AppError::new(ErrorCode::TokenExpired, "token has expired"));
        }

        Ok(AuthUser::from(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("invalid authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("authorization header must use Bearer scheme"))
}

pub fn validate_jwt(token: &str, secret: &JwtSecret) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::TokenExpired, "token has expired")
        }
        _ => AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    const SECRET: &str = "test-secret";

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/notifications");
        if let Some(value) = header {
            builder = builder.header("Authorization", HeaderValue::from_str(value).unwrap());
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn extract(header: Option<&str>) -> Result<AuthUser, AppError> {
        let mut parts = parts_with(header);
        AuthUser::from_request_parts(&mut parts, &JwtSecret::new(SECRET)).await
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let token = Claims::new(5, 60).encode(SECRET).unwrap();
        let user = extract(Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.id, 5);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthorized() {
        let err = extract(Some("Basic abc")).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = Claims::new(5, 60).encode("other-secret").unwrap();
        let err = extract(Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::TokenInvalid);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = Claims::new(5, -600).encode(SECRET).unwrap();
        let err = extract(Some(&format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::TokenExpired);
    }
}
