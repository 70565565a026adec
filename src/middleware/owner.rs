use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// HTTP header carrying the authenticated owner, set by the upstream gateway
pub const OWNER_ID_HEADER: &str = "x-owner-id";

/// Owner identity resolved before the request reaches this service.
///
/// Handlers take it as an extractor; a missing or malformed header is rejected
/// with `401`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(OwnerId)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<OwnerId, AppError> {
        let mut builder = Request::builder().uri("/api/v1/wardrobe");
        if let Some(value) = header {
            builder = builder.header(OWNER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        OwnerId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_owner_header() {
        let owner = Uuid::new_v4();
        let extracted = extract(Some(&owner.to_string())).await.unwrap();
        assert_eq!(extracted, OwnerId(owner));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_owner_header() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthorized)));
        assert!(matches!(extract(Some("alice")).await, Err(AppError::Unauthorized)));
    }
}
