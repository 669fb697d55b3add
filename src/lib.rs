//! ### Request scoped helpers to read, write and delete browser cookies
//! A cookie is described by a [`CookieSpec`](cookie_spec::CookieSpec): its
//! name and the attributes it is scoped with. Values are read from the
//! incoming request through a [`RequestContext`](context::RequestContext) and
//! written to the outgoing response through a
//! [`CookieSink`](response::CookieSink), usually
//! [`ResponseCookies`](response::ResponseCookies).
//!
//! A [`CookieManager`](manager::CookieManager) namespaces cookie names and
//! derives the domain and secure flag from the request.
//!
//! ## Quick setup
//! ```rust
//! use cookie_manager::prelude::*;
//!
//! let req = http::Request::builder()
//!     .uri("https://example.com/account")
//!     .header("Cookie", "wp-visits=3")
//!     .body(())
//!     .unwrap();
//! let ctx = RequestContext::from_request(&req);
//! let mut cookies = ResponseCookies::new();
//!
//! let manager = CookieManager::get(&ctx);
//! let visits: u32 = manager.cookie("visits").value(&ctx, "0").parse().unwrap_or(0);
//! manager.set(&mut cookies, "visits", (visits + 1).to_string(), Expiration::Session);
//!
//! let mut response = http::Response::new(());
//! cookies.apply(&mut response);
//! assert_eq!(response.headers()["set-cookie"], "wp-visits=4; Secure; Path=/; Domain=example.com");
//! ```

#[macro_use]
extern crate log;

/// Source of the current time
pub mod clock;
/// Manager configuration
pub mod config;
/// Incoming request snapshot
pub mod context;
/// Cookie name and attributes
pub mod cookie_spec;
/// Error definitions
pub mod error;
/// Factory of namespaced cookies
pub mod manager;
/// Outgoing set-cookie directives
pub mod response;
///
pub use cookie;
///
pub use http;

/// Contains everything you need to read and write cookies
///
/// ```rust
/// use cookie_manager::prelude::*;
///
/// let ctx = RequestContext::builder().host("example.com").cookie("wp-lang", "fr").build();
/// let mut res = ResponseCookies::new();
///
/// let manager = CookieManager::get(&ctx);
/// assert_eq!(manager.get_value(&ctx, "lang"), Some("fr"));
/// assert!(manager.delete(&ctx, &mut res, "lang"));
/// assert_eq!(res.directives()[0].name(), "wp-lang");
/// ```
pub mod prelude {
    ///
    pub use crate::clock::Clock;
    ///
    pub use crate::clock::FixedClock;
    ///
    pub use crate::clock::SystemClock;
    ///
    pub use crate::config::CookieConfig;
    ///
    pub use crate::context::RequestContext;
    ///
    pub use crate::cookie_spec::expires_at;
    ///
    pub use crate::cookie_spec::CookieSpec;
    ///
    pub use crate::error::CookieError;
    ///
    pub use crate::manager::CookieManager;
    ///
    pub use crate::response::CookieSink;
    ///
    pub use crate::response::ResponseCookies;
    ///
    pub use cookie::Cookie;
    ///
    pub use cookie::Expiration;
}
