use http::header::InvalidHeaderValue;
use thiserror::Error;

/// Error type throughout the cookie stack
///
/// Reading a cookie that is not there is never an error, the caller supplied
/// default is returned instead.
#[derive(Debug, Error)]
pub enum CookieError {
    /// The response already went out, no more `Set-Cookie` can be added
    #[error("cannot set cookie `{name}`: response headers were already finalized")]
    ResponseFinalized { name: String },
    /// The directive is not a valid header value, even once encoded
    #[error("cookie cannot be written as a header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
}
