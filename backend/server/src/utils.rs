use axum::{body::Bytes, http::Method};
use serde_json::Value;

use crate::error::AppError::{self, EmptySearchTerm, MalformedPayload, MethodNotAllowed};

pub const SEARCH_TERM: &str = "searchTerm";

pub fn get_search_term(method: &Method, body: &Bytes) -> Result<String, AppError> {
    if method != Method::POST {
        return Err(MethodNotAllowed(method.to_string()));
    }

    let mut payload = match serde_json::from_slice(body) {
        Ok(Value::Object(payload)) => payload,
        _ => return Err(MalformedPayload),
    };

    match payload.remove(SEARCH_TERM) {
        Some(Value::String(term)) if !term.is_empty() => Ok(term),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(EmptySearchTerm),
        Some(_) => Err(MalformedPayload),
    }
}
