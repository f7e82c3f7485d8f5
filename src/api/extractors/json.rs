use axum::extract::FromRequest;
use crate::error::AppError;

/// `Json` body whose rejections (malformed JSON, wrong field types, missing
/// content type) answer with the usual `{ error }` body and status 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
