// src/handlers/error.rs
use std::fmt;
use log::error;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::Rejection;

use crate::error::AnalysisError;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        let status = match &err {
            AnalysisError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalysisError::MalformedReport(_) | AnalysisError::InsufficientData(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AnalysisError::DataSource(_) => StatusCode::BAD_GATEWAY,
        };
        ApiError {
            message: err.to_string(),
            status,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}

/// Log the failure and wrap it as a rejection for the recovery filter.
pub fn reject_with(context: &str, err: AnalysisError) -> Rejection {
    error!("{}: {}", context, err);
    warp::reject::custom(ApiError::from(err))
}
