//! Background jobs owned by the API server.
//!
//! Each job is a long-running async function meant for `tokio::spawn` and
//! stops when its [`CancellationToken`](tokio_util::sync::CancellationToken)
//! is cancelled. The milestone reminder sweep lives in `timeline-events`.

pub mod session_cleanup;
