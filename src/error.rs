// error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::presets::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Preset not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Invalid request body: {0}")]
    Payload(#[from] JsonRejection),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Payload(rejection) => rejection.status(),
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Flattens validator output into `field -> messages`.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("The {field} field is invalid."),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(errors) => {
                let errors = field_errors(errors);
                let message = errors
                    .values()
                    .flatten()
                    .next()
                    .cloned()
                    .unwrap_or_else(|| "The given data was invalid.".to_string());
                json!({ "message": message, "errors": errors })
            }
            AppError::Payload(rejection) => {
                let message = rejection.body_text();
                json!({ "message": message, "errors": { "body": [message] } })
            }
            AppError::NotFound => json!({ "message": self.to_string() }),
            AppError::Storage(_) | AppError::Internal(_) => {
                error!(error = ?self, "request failed");
                json!({ "message": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
