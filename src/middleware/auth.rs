use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// HTTP header carrying the authenticated user id
///
/// The identity provider sits in front of this service and forwards the
/// authenticated user's identifier on every request. Anonymous requests
/// simply omit the header.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The current user, or none for anonymous requests
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    /// Returns the user id, if authenticated
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Returns the user id or an Unauthorized error
    pub fn require(&self) -> Result<&str, AppError> {
        self.id()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(CurrentUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> CurrentUser {
        let (mut parts, _) = request.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let request = Request::builder().uri("/recommended").body(()).unwrap();
        let user = extract(request).await;
        assert_eq!(user.id(), None);
        assert!(user.require().is_err());
    }

    #[tokio::test]
    async fn test_header_yields_user_id() {
        let request = Request::builder()
            .uri("/recommended")
            .header(USER_ID_HEADER, "user-42")
            .body(())
            .unwrap();
        let user = extract(request).await;
        assert_eq!(user.id(), Some("user-42"));
        assert_eq!(user.require().unwrap(), "user-42");
    }

    #[tokio::test]
    async fn test_blank_header_is_anonymous() {
        let request = Request::builder()
            .uri("/recommended")
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        let user = extract(request).await;
        assert_eq!(user.id(), None);
    }
}
