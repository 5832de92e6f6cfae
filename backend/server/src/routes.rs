use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use tracing::debug;

#[cfg(feature = "verbose")]
use tracing::info;

use crate::{
    auth::{SignInDecision, SignInRequest, allow_sign_in},
    dataset::Document,
    error::AppError,
    search::search,
    state::State,
    utils::get_search_term,
};

pub async fn search_handler(
    AxumState(state): AxumState<Arc<State>>,
    method: Method,
    body: Bytes,
) -> Result<Json<Vec<Document>>, AppError> {
    let search_term = get_search_term(&method, &body)?;

    #[cfg(feature = "verbose")]
    info!("Search requested: {search_term:?}");

    let results = search(&search_term, &state.dataset)?;
    debug!("{} documents matched", results.len());

    Ok(Json(results))
}

pub async fn sign_in_handler(body: Bytes) -> Result<impl IntoResponse, AppError> {
    let request: SignInRequest =
        serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?;

    let allowed = allow_sign_in(&request.account, &request.profile);

    #[cfg(feature = "verbose")]
    info!(
        "Sign-in via {} {}",
        request.account.provider,
        if allowed { "allowed" } else { "denied" }
    );

    Ok((StatusCode::OK, Json(SignInDecision { allowed })))
}
