#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<time::error::ComponentRange> for Error {
    fn from(value: time::error::ComponentRange) -> Self {
        Self::InvalidInput(value.to_string())
    }
}

impl From<time::error::Format> for Error {
    fn from(value: time::error::Format) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::InvalidInput(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::InvalidInput($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::InvalidInput(format!($fmt, $($arg)*)))
    };
}
