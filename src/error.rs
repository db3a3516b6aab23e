use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("history query failed{}: {message}", status_suffix(.status))]
    RemoteQuery {
        status: Option<u16>,
        message: String,
    },
    #[error("text generation error: {0}")]
    Generation(String),
    #[error("mail delivery error: {0}")]
    Delivery(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_query_display_includes_status() {
        let err = AppError::RemoteQuery {
            status: Some(403),
            message: "rate limited".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "history query failed (status 403): rate limited"
        );
    }

    #[test]
    fn remote_query_display_without_status() {
        let err = AppError::RemoteQuery {
            status: None,
            message: "connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "history query failed: connection reset");
    }
}
