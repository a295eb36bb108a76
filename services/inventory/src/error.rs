use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Inventory service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("product not found")]
    ProductNotFound,
    #[error("a product with this name already exists")]
    DuplicateProduct,
    #[error("user not found")]
    UserNotFound,
    #[error("username already exists")]
    UsernameAlreadyExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user disabled")]
    UserDisabled,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error("insufficient stock for the operation")]
    InsufficientStock,
    #[error("invalid price range")]
    InvalidPriceRange,
    #[error("search name is required")]
    InvalidSearch,
    #[error("invalid role")]
    InvalidRole,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl InventoryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::DuplicateProduct => "DUPLICATE_PRODUCT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::UsernameAlreadyExists => "USERNAME_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserDisabled => "USER_DISABLED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::InvalidPriceRange => "INVALID_PRICE_RANGE",
            Self::InvalidSearch => "INVALID_SEARCH",
            Self::InvalidRole => "INVALID_ROLE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProductNotFound | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateProduct | Self::UsernameAlreadyExists => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::UserDisabled | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InsufficientStock
            | Self::InvalidPriceRange
            | Self::InvalidSearch
            | Self::InvalidRole => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
