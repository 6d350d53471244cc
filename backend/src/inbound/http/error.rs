//! Wire rendering of storefront errors.
//!
//! Every failure leaves a handler as the `{code, message, traceId?, details?}`
//! envelope with a `trace-id` header. Status codes follow the error code:
//!
//! | code | status |
//! | --- | --- |
//! | `invalid_request`, `invalid_id`, `not_available` | 400 |
//! | `not_found` | 404 |
//! | `conflict` | 409 |
//! | `service_unavailable` | 503 |
//! | `internal_error` | 500, message replaced |
//!
//! `not_available` is a 400 rather than a 409: a short or missing product is
//! a problem with the checkout as submitted, and the buyer retries with a
//! smaller quantity. A malformed product id (`invalid_id`) is also the
//! client's fault, unlike an unknown one, which is a 404.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for storefront handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message shown in place of internal failure text.
const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::InvalidId | ErrorCode::NotAvailable => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the buyer. Repository and gateway text stays in the logs.
fn wire_body(err: &Error) -> Error {
    if err.code() != ErrorCode::InternalError {
        return err.clone();
    }
    error!(
        message = err.message(),
        trace_id = ?err.trace_id(),
        "storefront request failed"
    );
    let redacted = Error::internal(REDACTED_MESSAGE);
    match err.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(wire_body(self))
    }
}

/// Extractor and framework failures that were not mapped earlier surface as
/// redacted internal errors.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "unmapped actix error");
        Error::internal(REDACTED_MESSAGE)
    }
}
