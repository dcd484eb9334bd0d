//! Product endpoints.
//!
//! Envelope: `{ success, message?, data? }` on success and
//! `{ success: false, message, errors | error }` on failure.

use super::{json_body, parse_flag, parse_id};
use crate::error::AppError;
use crate::models::{PageRequest, ProductFilter};
use crate::services::ProductServiceError;
use crate::validators::{self, ValidationErrors};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};

const NOT_FOUND_MESSAGE: &str = "Produto não encontrado";
const INVALID_MESSAGE: &str = "Dados inválidos";
const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

#[derive(Debug)]
pub struct ProductApiError(AppError);

impl ProductApiError {
    /// Lookup failures of any kind are reported as a missing product.
    fn lookup(err: impl Into<AppError>) -> Self {
        let err = err.into();
        if !matches!(err, AppError::NotFound) {
            tracing::warn!(error = %err, "Product lookup failed");
        }
        Self(AppError::NotFound)
    }
}

impl From<AppError> for ProductApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ValidationErrors> for ProductApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self(AppError::Validation(errors))
    }
}

impl From<ProductServiceError> for ProductApiError {
    fn from(err: ProductServiceError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ProductApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "message": NOT_FOUND_MESSAGE }),
            ),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "success": false, "message": INVALID_MESSAGE, "errors": errors }),
            ),
            other => {
                tracing::error!(error = %other, "Product request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "message": INTERNAL_MESSAGE,
                        "error": other.to_string(),
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub active: Option<String>,
}

/// GET /api/v1/products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Value>, ProductApiError> {
    let page = PageRequest::from_query(query.page.as_deref(), query.limit.as_deref());
    let filter = ProductFilter {
        active: parse_flag(query.active.as_deref()),
    };

    let products = state.product_service.list_products(filter, page).await?;

    Ok(Json(json!({
        "success": true,
        "data": products,
    })))
}

/// POST /api/v1/products
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProductApiError> {
    let body = json_body(body)?;
    let payload = validators::validate_create_product(&body)?;

    let product = state.product_service.create_product(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Produto criado com sucesso",
            "data": product,
        })),
    )
        .into_response())
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ProductApiError> {
    let id = parse_id(&id).ok_or(ProductApiError(AppError::NotFound))?;

    let product = state
        .product_service
        .get_product(id)
        .await
        .map_err(ProductApiError::lookup)?;

    Ok(Json(json!({
        "success": true,
        "data": product,
    })))
}

/// PUT|PATCH /api/v1/products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ProductApiError> {
    let id = parse_id(&id).ok_or(ProductApiError(AppError::NotFound))?;
    let product = state.product_service.get_product(id).await?;

    let body = json_body(body)?;
    let changes = validators::validate_update_product(&body)?;

    let product = state
        .product_service
        .update_product(product, changes)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Produto atualizado com sucesso",
        "data": product,
    })))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ProductApiError> {
    let id = parse_id(&id).ok_or(ProductApiError(AppError::NotFound))?;

    state.product_service.delete_product(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Produto removido com sucesso",
    })))
}

/// PATCH /api/v1/products/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ProductApiError> {
    let id = parse_id(&id).ok_or(ProductApiError(AppError::NotFound))?;

    let product = state.product_service.toggle_active(id).await?;

    let message = if product.active {
        "Produto ativado com sucesso"
    } else {
        "Produto desativado com sucesso"
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "data": product,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_are_unprocessable() {
        let error = ProductApiError(AppError::Validation(ValidationErrors::single(
            "price",
            "The price field must be positive",
        )));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_of(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], INVALID_MESSAGE);
        assert_eq!(body["errors"]["price"][0], "The price field must be positive");
    }

    #[tokio::test]
    async fn unclassified_errors_are_internal() {
        let response = ProductApiError(AppError::Unclassified("disk full".to_string()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["message"], INTERNAL_MESSAGE);
        assert_eq!(body["error"], "disk full");
    }

    #[test]
    fn lookup_hides_the_failure_kind() {
        let error = ProductApiError::lookup(AppError::Unclassified("pool closed".to_string()));
        assert!(matches!(error.0, AppError::NotFound));
    }
}
