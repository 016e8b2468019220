use paywall_kernel::BoxError;
use paywall_kernel::server::ApiError;
use std::borrow::Cow;

#[paywall_derive::paywall_error]
pub enum ArticlesError {
    /// The article catalog failed to answer.
    #[error("Article catalog error{}: {source}", format_context(.context))]
    Store { source: BoxError, context: Option<Cow<'static, str>> },
}

impl From<ArticlesError> for ApiError {
    fn from(err: ArticlesError) -> Self {
        Self::from(err.to_string())
    }
}
