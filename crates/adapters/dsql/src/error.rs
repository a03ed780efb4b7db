//! Error types for DSQL adapter

use errors::AppError;

/// Convert an AWS SDK error to AppError
pub fn map_sdk_error(err: impl std::fmt::Display, context: &str) -> AppError {
    let err_str = err.to_string();
    let lower = err_str.to_lowercase();

    if lower.contains("accessdenied") || lower.contains("403") || lower.contains("not authorized") {
        AppError::forbidden(format!("{}: {}", context, err_str))
    } else if lower.contains("credential") || lower.contains("expiredtoken") || lower.contains("401") {
        AppError::unauthenticated(format!("{}: {}", context, err_str))
    } else if lower.contains("hostname") || lower.contains("region") {
        AppError::config(format!("{}: {}", context, err_str))
    } else {
        // Network failures, timeouts and anything unexpected come from the identity service
        AppError::external_service(format!("{}: {}", context, err_str))
    }
}
