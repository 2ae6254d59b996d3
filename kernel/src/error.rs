use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    /// Rejected before any state changed. The attached printable carries the
    /// user-facing reason.
    Validation,
    /// Sign-in/sign-up rejection, or a missing session where one is required.
    Auth,
    /// The remote store rejected a write because its schema is missing an
    /// expected column.
    Schema,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Validation rejected the request"),
            KernelError::Auth => write!(f, "Authentication failed"),
            KernelError::Schema => write!(f, "Remote schema mismatch"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
