//! Extractor wrappers that turn axum rejections into [`AppError`] so that
//! malformed input is reported through the standard error envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::utils::error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
