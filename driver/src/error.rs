use error_stack::Report;

use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    SqlX(#[from] sqlx::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Env(#[from] dotenvy::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// True when the store rejected a statement because the live table is missing
/// a column the code expects, which happens after a skipped migration or a
/// stale schema cache on the hosted API.
pub(crate) fn is_missing_column(message: &str) -> bool {
    message.contains("column")
        && (message.contains("does not exist") || message.contains("schema cache"))
}

pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, DriverError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match &error {
            DriverError::SqlX(sqlx::Error::PoolTimedOut) => {
                Report::from(error).change_context(KernelError::Timeout)
            }
            DriverError::SqlX(sqlx::Error::Database(db)) if is_missing_column(db.message()) => {
                let message = db.message().to_string();
                Report::from(error)
                    .change_context(KernelError::Schema)
                    .attach_printable(format!(
                        "the remote table is missing an expected column ({message}); apply the latest schema migration"
                    ))
            }
            DriverError::Http(http) if http.is_timeout() => {
                Report::from(error).change_context(KernelError::Timeout)
            }
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(DriverError::from).convert_error()
    }
}
