//! Request extractors whose rejections use the API's JSON error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// [`axum::Json`] that rejects malformed bodies with [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// [`axum::extract::Query`] that rejects bad query strings with [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
