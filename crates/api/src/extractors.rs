//! Extractors whose rejections use the API error body.
//!
//! Axum's own `Json`, `Query` and `Path` reject with plain text. These
//! wrappers reject with [`ApiError`] so every 400 has the same shape.

use axum::extract::{FromRequest, FromRequestParts, Path, Query};

use crate::error::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
