//! Status code classification.
//!
//! | status             | error               | retriable |
//! |--------------------|---------------------|-----------|
//! | 200, 201, 202, 204 | none                |           |
//! | 400                | BadRequest          | no        |
//! | 401, 403           | AccessDenied        | no        |
//! | 404                | NotFound            | no        |
//! | 422                | UnprocessableEntity | yes       |
//! | 429                | TooManyRequests     | yes       |
//! | 500                | InternalServerError | yes       |
//! | 502                | BadGateway          | yes       |
//! | 503                | ServiceUnavailable  | yes       |
//! | 504                | GatewayTimeout      | yes       |
//! | anything else      | Unhandled           | no        |

use crate::error::ClientError;

pub fn is_success(status: u16) -> bool {
    matches!(status, 200 | 201 | 202 | 204)
}

/// Map a completed exchange to `Ok(())` or its classified error. `body` is
/// only kept for [`ClientError::Unhandled`].
pub fn classify(status: u16, body: &[u8]) -> Result<(), ClientError> {
    if is_success(status) {
        return Ok(());
    }
    Err(match status {
        400 => ClientError::BadRequest,
        401 | 403 => ClientError::AccessDenied { status },
        404 => ClientError::NotFound,
        422 => ClientError::UnprocessableEntity,
        429 => ClientError::TooManyRequests,
        500 => ClientError::InternalServerError,
        502 => ClientError::BadGateway,
        503 => ClientError::ServiceUnavailable,
        504 => ClientError::GatewayTimeout,
        _ => ClientError::Unhandled {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        },
    })
}
