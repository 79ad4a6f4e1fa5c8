use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("token storage error: {0}")]
    Storage(String),

    #[error("invalid auth response: {0}")]
    InvalidResponse(String),
}
