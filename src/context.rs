use std::fmt::{Debug, Formatter};

use cookie::{Cookie, CookieJar};
use http::{
    header::{COOKIE, HOST},
    Request,
};
use time::OffsetDateTime;

use crate::clock::{Clock, SystemClock};

/// Header set by TLS terminating proxies with the scheme the client used
pub static FORWARDED_PROTO_HEADER: &str = "X-Forwarded-Proto";

const HTTPS_PORT: u16 = 443;

/// Snapshot of the incoming request, as far as cookies are concerned.
///
/// It holds the cookies sent by the browser, the host the request was
/// addressed to, whether it came in over an encrypted transport and the clock
/// used to compute expirations. It is read-only once built; the outgoing side
/// lives in [`ResponseCookies`](crate::response::ResponseCookies).
///
/// ```rust
/// use cookie_manager::prelude::*;
///
/// let ctx = RequestContext::builder()
///     .host("example.com")
///     .encrypted(true)
///     .cookie("theme", "dark")
///     .build();
///
/// assert_eq!(ctx.cookie("theme"), Some("dark"));
/// assert!(ctx.is_encrypted());
/// ```
pub struct RequestContext {
    #[doc(hidden)]
    cookies: CookieJar,
    #[doc(hidden)]
    host: String,
    #[doc(hidden)]
    encrypted: bool,
    #[doc(hidden)]
    clock: Box<dyn Clock + Send + Sync>,
}

impl RequestContext {
    /// Creates an instance of a context builder
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Build a context from an http request.
    ///
    /// Cookies are parsed from every `Cookie` header, the host comes from the
    /// `Host` header (or the uri authority when the header is missing) and the
    /// request is considered encrypted if the uri scheme is `https`, the port
    /// is 443 or a proxy forwarded `https` as the original scheme.
    pub fn from_request<T>(req: &Request<T>) -> Self {
        Self::builder().request(req).build()
    }

    /// Get the cookies sent by the browser
    #[inline]
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Decoded value of the incoming cookie named exactly `name`
    #[inline]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|c| c.value())
    }

    /// Host the request was addressed to, without port
    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    #[inline]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Builder::new().build()
    }
}

impl Debug for RequestContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("cookies", &self.cookies.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("host", &self.host)
            .field("encrypted", &self.encrypted)
            .finish()
    }
}

/// Struct used to conveniently build a request context
pub struct Builder {
    cookies: CookieJar,
    host: String,
    encrypted: bool,
    clock: Box<dyn Clock + Send + Sync>,
}

impl Builder {
    #[inline]
    pub fn new() -> Self {
        Builder {
            cookies: CookieJar::new(),
            host: String::new(),
            encrypted: false,
            clock: Box::new(SystemClock),
        }
    }

    /// Fill the builder from an http request: cookies, host and scheme
    pub fn request<T>(mut self, req: &Request<T>) -> Builder {
        for header in req.headers().get_all(COOKIE) {
            match header.to_str() {
                Ok(s) => self = self.cookie_header(s),
                Err(e) => debug!("Ignoring a Cookie header that is not valid text: {}", e),
            }
        }

        let raw_host = req
            .headers()
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()));

        let https_scheme = req.uri().scheme_str().map(|s| s.eq_ignore_ascii_case("https")).unwrap_or(false);
        let https_port = req.uri().port_u16() == Some(HTTPS_PORT) || raw_host.as_deref().and_then(host_port) == Some(HTTPS_PORT);
        let forwarded_https = req
            .headers()
            .get(FORWARDED_PROTO_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
            .unwrap_or(false);

        if let Some(host) = raw_host {
            self = self.host(host);
        }

        self.encrypted(https_scheme || https_port || forwarded_https)
    }

    /// Parse a raw `Cookie` header value (`a=1; b=2`) into the incoming set.
    /// Names and values are percent-decoded and malformed pairs are skipped.
    /// When a name repeats, the first occurrence is kept: user agents list
    /// the cookie with the most specific path first.
    pub fn cookie_header(mut self, header: &str) -> Builder {
        header
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .filter_map(|pair| Cookie::parse_encoded(pair.to_string()).ok())
            .for_each(|c| self.add_first(c));
        self
    }

    /// Add a single incoming cookie, unless one with the same name is
    /// already there
    pub fn cookie<N, V>(mut self, name: N, value: V) -> Builder
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.add_first(Cookie::new(name.into(), value.into()));
        self
    }

    fn add_first(&mut self, cookie: Cookie<'static>) {
        if self.cookies.get(cookie.name()).is_none() {
            self.cookies.add_original(cookie);
        } else {
            trace!("Ignoring repeated incoming cookie `{}`", cookie.name());
        }
    }

    /// Set the request host. A trailing `:port` is dropped since it is not
    /// valid in a cookie domain.
    pub fn host<H: Into<String>>(mut self, host: H) -> Builder {
        let host = host.into();
        self.host = strip_port(&host).to_string();
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Builder {
        self.encrypted = encrypted;
        self
    }

    pub fn clock<C>(mut self, clock: C) -> Builder
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn build(self) -> RequestContext {
        let Builder {
            cookies,
            host,
            encrypted,
            clock,
        } = self;
        RequestContext {
            cookies,
            host,
            encrypted,
            clock,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_port(host: &str) -> &str {
    // ipv6 literal, e.g. `[::1]:8080`
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => &host[..end + 2],
            None => host,
        };
    }

    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn host_port(host: &str) -> Option<u16> {
    let name = strip_port(host);
    host.get(name.len()..)?.strip_prefix(':')?.parse().ok()
}
