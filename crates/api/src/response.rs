//! Shared response envelope types for API handlers.
//!
//! Successful responses use a `{ "data": ... }` envelope. The auth endpoints
//! are the exception and return their token payload directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
