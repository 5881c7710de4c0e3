//! Seam to the external authentication subsystem.
//!
//! Session management lives in an upstream gateway; by the time a request
//! reaches this service the gateway has resolved the session and injected
//! the acting user's id. Handlers that need an identity take the
//! [`AuthenticatedUser`] extractor and nothing else about auth leaks in.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::ApiError;

/// Header populated by the auth gateway after session validation.
pub const USER_ID_HEADER: &str = "x-authenticated-user";

/// The acting user's identity for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok())
            .ok_or(ApiError::Unauthorized)?;
        Ok(AuthenticatedUser { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use http::Request;

    async fn extract(request: Request<()>) -> Result<AuthenticatedUser, ApiError> {
        let (mut parts, _) = request.into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn resolves_user_from_gateway_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "7")
            .body(())
            .unwrap();
        let user = extract(request).await.unwrap();
        assert_eq!(user.user_id, 7);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn non_numeric_header_is_unauthorized() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "alice")
            .body(())
            .unwrap();
        assert!(extract(request).await.is_err());
    }
}
