use std::sync::Arc;

/// Outcome of fetching data for one package.
#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The data was fetched.
    Found(T),

    /// The package or its repository cannot be scored, for the given reason.
    Unavailable(Arc<str>),

    /// An error occurred while fetching.
    Error(Arc<ohno::AppError>),
}

impl<T> ProviderResult<T> {
    #[must_use]
    pub const fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }
}
