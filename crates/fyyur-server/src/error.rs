//! Storage error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr, TransactionError};
use serde::Serialize;
use thiserror::Error;

use crate::api::{EmptyData, Page};
use crate::forms::FormError;
use crate::notice::Notice;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    #[error("database error: {0}")]
    Database(DbErr),

    #[error("invalid form: {0}")]
    InvalidForm(#[from] FormError),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg))
            | Some(SqlErr::UniqueConstraintViolation(msg)) => {
                return Self::ConstraintViolation(msg);
            }
            _ => {}
        }
        match err {
            DbErr::Conn(e) => Self::ConnectionFailure(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::ConnectionFailure(e.to_string()),
            other => Self::Database(other),
        }
    }
}

impl From<TransactionError<StoreError>> for StoreError {
    fn from(err: TransactionError<StoreError>) -> Self {
        match err {
            TransactionError::Connection(e) => e.into(),
            TransactionError::Transaction(e) => e,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorPage {
    pub status: u16,
    pub error: &'static str,
}

/// Failure of a detail or edit-form read.
///
/// A missing row is a 404. Any other storage failure still answers 200 with
/// the page's empty rendition and an error notice.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    NotFound,
    Unavailable { page: &'static str },
}

impl ApiError {
    pub fn for_page(page: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            other => {
                tracing::error!(page, error = %other, "read failed, rendering empty page");
                Self::Unavailable { page }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorPage {
                    status: StatusCode::NOT_FOUND.as_u16(),
                    error: "Not Found",
                }),
            )
                .into_response(),
            Self::Unavailable { page } => {
                Json(Page::new(page, EmptyData {}).with_notice(Notice::unavailable()))
                    .into_response()
            }
        }
    }
}
