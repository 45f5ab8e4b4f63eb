use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DashboardField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Unavailable,
    Malformed,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?} while fetching {field}: {message}")]
pub struct FetchError {
    pub field: DashboardField,
    pub code: ErrorCode,
    pub message: String,
}

impl FetchError {
    pub fn new(field: DashboardField, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    pub fn unavailable(field: DashboardField) -> Self {
        Self::new(field, ErrorCode::Unavailable, "profile backend unavailable")
    }
}
