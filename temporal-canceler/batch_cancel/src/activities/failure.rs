//! Mapping gRPC failures onto activity failures.

use temporal_sdk::ActivityError;
use tonic::{Code, Status};

/// Codes worth another attempt under the server's activity retry policy.
/// Everything else (bad key, missing namespace, malformed query, ...) fails
/// the same way on every attempt.
pub fn is_retryable(code: Code) -> bool {
    matches!(
        code,
        Code::Unavailable
            | Code::DeadlineExceeded
            | Code::ResourceExhausted
            | Code::Aborted
            | Code::Internal
            | Code::Unknown
            | Code::Cancelled
    )
}

pub fn status_to_activity_error(context: &str, status: Status) -> ActivityError {
    let retryable = is_retryable(status.code());
    let err = anyhow::Error::new(status).context(context.to_owned());
    if retryable {
        ActivityError::from(err)
    } else {
        ActivityError::NonRetryable(err)
    }
}
