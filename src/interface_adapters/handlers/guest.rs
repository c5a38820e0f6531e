use crate::domain::{GuestDocument, InsertResult, StoreError};
use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{CreateGuestUseCase, ListGuestsUseCase};
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use std::sync::Arc;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn store_failure(err: &StoreError) -> ErrorReply {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::from(err)))
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

// The body is taken as raw bytes: no validation happens here, so whatever
// the caller sent is what the store sees. Form posts are the one exception
// and are decoded into a JSON object first.
#[tracing::instrument(name = "create_guest", skip_all, fields(body_len = body.len()))]
pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<InsertResult>), ErrorReply> {
    let use_case = CreateGuestUseCase {
        store: state.store.as_ref(),
        collection: &state.collection,
    };

    let document = if is_form(&headers) {
        GuestDocument::from_form(&body)
    } else {
        GuestDocument::from_body(&body)
    };

    let result = use_case
        .execute(document)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, collection = %state.collection, "failed to create guest.");
            store_failure(&e)
        })?;

    tracing::info!(id = %result.id, "guest created.");

    Ok((StatusCode::CREATED, Json(result)))
}

#[tracing::instrument(name = "list_guests", skip_all)]
pub async fn list_guests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, ErrorReply> {
    let use_case = ListGuestsUseCase {
        store: state.store.as_ref(),
        collection: &state.collection,
    };

    let docs = use_case.execute().await.map_err(|e| {
        tracing::error!(error = %e, collection = %state.collection, "failed to list guests.");
        store_failure(&e)
    })?;

    tracing::debug!(count = docs.len(), "guests listed.");

    Ok(Json(docs))
}
