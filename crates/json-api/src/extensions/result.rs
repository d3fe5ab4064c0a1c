//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::debug;

/// Map any error to an HTTP error.
pub(crate) trait ResultExt<T> {
    /// Map to a bad request carrying `context` as its brief.
    fn or_400(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_400(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            debug!("{context}: {error}");

            StatusError::bad_request()
                .brief(context.to_owned())
                .detail(error.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn or_400_keeps_ok_values() {
        let value: Result<u8, String> = Ok(3);

        assert_eq!(value.or_400("ignored").ok(), Some(3));
    }

    #[test]
    fn or_400_carries_the_error_as_detail() -> TestResult {
        let value: Result<u8, String> = Err("not a number".to_string());

        let error = value.or_400("bad id").err().ok_or("expected an error")?;

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "bad id");
        assert_eq!(error.detail.as_deref(), Some("not a number"));

        Ok(())
    }
}
