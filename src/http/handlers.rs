use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;

use crate::domain::order::{NewOrder, OrderUpdate};
use crate::repository::UpdateOutcome;
use super::ApiError;
use super::AppState;

// ============================================================================
// Order Handlers
// ============================================================================
//
// Create flow per request:
//   Received -> Decoded -> Validated -> Persisted -> Responded
// Decode or validation failures respond 400 without touching storage.
// Bodies over the configured limit respond 413, also without touching storage.
// Persistence failures respond 500. Nothing is retried.
//
// ============================================================================

/// Collect the request body, stopping as soon as it outgrows the configured limit
async fn read_body(state: &AppState, mut payload: web::Payload) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(ApiError::malformed)?;
        if body.len() + chunk.len() > state.max_body_bytes {
            return Err(ApiError::PayloadTooLarge(state.max_body_bytes));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Decode a JSON object from raw bytes, whatever the Content-Type says
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MalformedInput("request body is empty".to_string()));
    }

    // serde would otherwise accept a positional array for a struct
    let value: serde_json::Value = serde_json::from_slice(body).map_err(ApiError::malformed)?;
    if !value.is_object() {
        return Err(ApiError::MalformedInput(
            "request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(ApiError::malformed)
}

/// Turn a handler result into a response and count it
fn respond(state: &AppState, route: &str, result: Result<HttpResponse, ApiError>) -> HttpResponse {
    let response = match result {
        Ok(response) => response,
        Err(error) => {
            if !matches!(error, ApiError::Persistence(_)) {
                tracing::debug!(route = route, error = %error, "Rejected request");
            }
            error.error_response()
        }
    };

    state.metrics.record_request(route, response.status().as_u16());
    response
}

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "order-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "order-service"
    }))
}

pub async fn create_order(state: web::Data<AppState>, payload: web::Payload) -> HttpResponse {
    let result = create(&state, payload).await;
    respond(&state, "create_order", result)
}

async fn create(state: &AppState, payload: web::Payload) -> Result<HttpResponse, ApiError> {
    let body = read_body(state, payload).await?;
    let new_order: NewOrder = decode(&body)?;
    let order = new_order.into_order()?;

    let order_id = state
        .persist("insert", state.repository.insert(&order))
        .await?;
    let order = order.with_id(order_id);

    tracing::info!(
        order_id = order_id,
        customer_id = %order.customer_id,
        line_item_count = order.line_items.len(),
        "✅ Order created"
    );
    state.metrics.record_order_created();

    Ok(HttpResponse::Created().json(order))
}

pub async fn list_orders(state: web::Data<AppState>) -> HttpResponse {
    let result = state
        .persist("find_all", state.repository.find_all())
        .await
        .map(|orders| HttpResponse::Ok().json(orders))
        .map_err(ApiError::from);

    respond(&state, "list_orders", result)
}

pub async fn get_order(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let order_id = path.into_inner();

    let result = match state.persist("find_by_id", state.repository.find_by_id(order_id)).await {
        Ok(Some(order)) => Ok(HttpResponse::Ok().json(order)),
        Ok(None) => Err(ApiError::NotFound(order_id)),
        Err(e) => Err(e.into()),
    };

    respond(&state, "get_order", result)
}

pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Payload,
) -> HttpResponse {
    let result = update(&state, path.into_inner(), payload).await;
    respond(&state, "update_order", result)
}

async fn update(
    state: &AppState,
    order_id: i64,
    payload: web::Payload,
) -> Result<HttpResponse, ApiError> {
    let body = read_body(state, payload).await?;
    let update: OrderUpdate = decode(&body)?;

    let order = match state
        .persist("update", state.repository.update(order_id, &update))
        .await?
    {
        UpdateOutcome::Updated(order) => order,
        UpdateOutcome::NotFound => return Err(ApiError::NotFound(order_id)),
        UpdateOutcome::Rejected(e) => return Err(ApiError::InvalidOrder(e)),
    };

    tracing::info!(
        order_id = order_id,
        shipped_at = ?order.shipped_at,
        delivered_at = ?order.delivered_at,
        "Order updated"
    );

    Ok(HttpResponse::Ok().json(order))
}

pub async fn delete_order(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let order_id = path.into_inner();

    let result = match state.persist("delete", state.repository.delete_by_id(order_id)).await {
        Ok(true) => {
            tracing::info!(order_id = order_id, "Order deleted");
            Ok(HttpResponse::new(StatusCode::NO_CONTENT))
        }
        Ok(false) => Err(ApiError::NotFound(order_id)),
        Err(e) => Err(e.into()),
    };

    respond(&state, "delete_order", result)
}

// ============================================================================
// Unit Tests
// ============================================================================
