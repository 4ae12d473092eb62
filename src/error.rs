//! Application-level error type.
//!
//! Every failure that reaches `main` is an `AppError`: a message plus the
//! process exit code it maps to.
//!
//! Exit codes:
//! - `2`: invalid input or configuration (bad CSV, missing API key, bad flags)
//! - `3`: nothing to analyze (no baselines, no codes, no results)
//! - `4`: provider / network failures outside the per-pair skip policy

/// Invalid input or configuration.
pub const EXIT_INPUT: u8 = 2;
/// Nothing to analyze.
pub const EXIT_NO_DATA: u8 = 3;
/// Provider or network failure.
pub const EXIT_NETWORK: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(EXIT_NO_DATA, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(EXIT_NETWORK, message)
    }

    /// A baseline value that is neither numeric nor a percentage.
    ///
    /// Raised while loading uploads, before any provider request is made.
    pub fn malformed_upload(file: &str, line: usize, raw: &str) -> Self {
        Self::input(format!(
            "Malformed upload '{file}' line {line}: value '{raw}' is not numeric."
        ))
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_upload_names_file_and_line() {
        let err = AppError::malformed_upload("sales.csv", 7, "n/a");
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.message().contains("sales.csv"));
        assert!(err.message().contains("line 7"));
        assert!(err.message().contains("'n/a'"));
    }
}
