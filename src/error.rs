pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("registry rejected: {0}")]
    Registry(String),
    #[error("host unavailable: {0}")]
    HostUnavailable(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry(message.into())
    }

    pub fn host_unavailable(message: impl Into<String>) -> Self {
        Self::HostUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn registry_error_carries_message() {
        let err = AppError::registry("default application 9 is not registered");
        assert_eq!(
            err.to_string(),
            "registry rejected: default application 9 is not registered"
        );
    }
}
