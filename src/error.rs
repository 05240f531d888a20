use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures a route handler can answer with. The display text is what the
/// caller sees, so it never carries provider or driver internals.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("City \"{0}\" does not exist.")]
    CityNotFound(String),
    #[error("Itinerary not found")]
    NotFound,
    #[error("Invalid itinerary ID")]
    MalformedId,
    #[error("{0}")]
    Upstream(&'static str),
    #[error("{0}")]
    Store(&'static str),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::CityNotFound(_) | ApiError::MalformedId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
