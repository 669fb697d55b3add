use cookie::{Cookie, Expiration};
use time::{Duration, OffsetDateTime};

use crate::{context::RequestContext, error::CookieError, response::CookieSink};

/// How far in the past a deleted cookie is expired
pub const DELETE_BACKDATE: Duration = Duration::hours(1);

/// Name and attributes of a cookie, without its value.
///
/// The value travels on two separate channels: it is read from the incoming
/// request through a [`RequestContext`] and written to the outgoing response
/// through a [`CookieSink`]. A spec only knows how the cookie is named and
/// scoped.
///
/// ```rust
/// use cookie_manager::prelude::*;
///
/// let ctx = RequestContext::builder().host("example.com").cookie("theme", "dark").build();
/// let mut res = ResponseCookies::new();
///
/// let theme = CookieSpec::for_request("theme", &ctx).set_http_only(true);
/// assert_eq!(theme.value(&ctx, "light"), "dark");
///
/// assert!(theme.delete(&ctx, &mut res));
/// assert_eq!(res.directives()[0].value(), "dark");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    name: String,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
}

impl CookieSpec {
    /// A cookie named `name`, with path `/`, neither secure nor http only.
    /// The name is not validated.
    ///
    /// Unlike [`for_request`](#method.for_request), the domain is left empty
    /// and the directive carries no `Domain`, so the browser scopes the
    /// cookie to the exact host. Use `for_request` (or a
    /// [`CookieManager`](crate::manager::CookieManager)) to default the
    /// domain to the request host.
    pub fn new<N: Into<String>>(name: N) -> Self {
        CookieSpec {
            name: name.into(),
            domain: String::new(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
        }
    }

    /// A cookie named `name`, scoped to the host of the request: the usual
    /// way to describe a cookie by hand
    pub fn for_request<N: Into<String>>(name: N, ctx: &RequestContext) -> Self {
        Self::new(name).set_domain(ctx.host())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    #[inline]
    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    /// Set the cookie domain. An empty domain leaves the attribute out of the
    /// directive, scoping the cookie to the exact host.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the cookie path. An empty path leaves the attribute out of the
    /// directive.
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// Whether the cookie should only be sent over https
    pub fn set_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Whether the cookie should be hidden from scripts
    pub fn set_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Whether the request carries this cookie
    #[inline]
    pub fn exists(&self, ctx: &RequestContext) -> bool {
        ctx.cookie(&self.name).is_some()
    }

    /// Value sent by the browser, if any
    #[inline]
    pub fn get<'a>(&self, ctx: &'a RequestContext) -> Option<&'a str> {
        ctx.cookie(&self.name)
    }

    /// Value sent by the browser, or `default` when the cookie is absent
    #[inline]
    pub fn value<'a>(&self, ctx: &'a RequestContext, default: &'a str) -> &'a str {
        self.get(ctx).unwrap_or(default)
    }

    /// The directive `set` would emit
    pub fn directive<V, E>(&self, value: V, expiration: E) -> Cookie<'static>
    where
        V: Into<String>,
        E: Into<Expiration>,
    {
        let mut builder = Cookie::build((self.name.clone(), value.into()))
            .expires(session_if_epoch(expiration.into()))
            .secure(self.secure)
            .http_only(self.http_only);

        if !self.domain.is_empty() {
            builder = builder.domain(self.domain.clone());
        }

        if !self.path.is_empty() {
            builder = builder.path(self.path.clone());
        }

        builder.build()
    }

    /// Emit the cookie with `value`, surfacing why the sink refused it.
    ///
    /// `expiration` is either a point in time or `Expiration::Session` (also
    /// `None` or the unix epoch) for a cookie that lives until the browser
    /// closes.
    pub fn try_set<S, V, E>(&self, sink: &mut S, value: V, expiration: E) -> Result<(), CookieError>
    where
        S: CookieSink + ?Sized,
        V: Into<String>,
        E: Into<Expiration>,
    {
        sink.emit(self.directive(value, expiration))
    }

    /// Emit the cookie with `value`. Returns whether the sink accepted it; a
    /// refusal is logged and not retried.
    pub fn set<S, V, E>(&self, sink: &mut S, value: V, expiration: E) -> bool
    where
        S: CookieSink + ?Sized,
        V: Into<String>,
        E: Into<Expiration>,
    {
        match self.try_set(sink, value, expiration) {
            Ok(()) => true,
            Err(e) => {
                warn!("Cookie `{}` was not set: {}", self.name, e);
                false
            }
        }
    }

    /// Expire the cookie on the browser.
    ///
    /// Does nothing and returns `false` when the request does not carry the
    /// cookie. Otherwise the current value is sent back with an expiration
    /// one hour in the past, and `true` is returned.
    pub fn delete<S>(&self, ctx: &RequestContext, sink: &mut S) -> bool
    where
        S: CookieSink + ?Sized,
    {
        let value = match self.get(ctx) {
            Some(value) => value.to_string(),
            None => return false,
        };

        self.set(sink, value, ctx.now() - DELETE_BACKDATE);
        true
    }
}

fn session_if_epoch(expiration: Expiration) -> Expiration {
    match expiration {
        Expiration::DateTime(dt) if dt.unix_timestamp() == 0 => Expiration::Session,
        other => other,
    }
}

/// Expiration from a unix timestamp, `0` meaning a session cookie
pub fn expires_at(timestamp: i64) -> Expiration {
    if timestamp == 0 {
        return Expiration::Session;
    }

    match OffsetDateTime::from_unix_timestamp(timestamp) {
        Ok(dt) => Expiration::DateTime(dt),
        Err(e) => {
            warn!("Timestamp {} is out of range, using a session cookie: {}", timestamp, e);
            Expiration::Session
        }
    }
}
