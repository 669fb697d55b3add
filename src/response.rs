use cookie::Cookie;
use http::{header::SET_COOKIE, HeaderMap, HeaderValue, Response};

use crate::error::CookieError;

/// Anything able to carry a set-cookie directive back to the user agent
pub trait CookieSink {
    /// Queue `cookie` to be sent. Fails if the directive can no longer be
    /// delivered, e.g. because the headers already went out.
    fn emit(&mut self, cookie: Cookie<'static>) -> Result<(), CookieError>;
}

/// Outgoing set-cookie directives of one response.
///
/// Directives are kept in the order they were emitted, duplicates included.
/// Names and values are percent-encoded and every directive is checked to be
/// a valid header value when it is emitted, so writing the response never
/// drops a directive that was accepted. Once written the response is
/// finalized and every further directive is rejected.
///
/// ```rust
/// use cookie_manager::prelude::*;
///
/// let mut res = ResponseCookies::new();
/// res.emit(Cookie::new("theme", "dark mode")).unwrap();
///
/// let mut response = http::Response::new(());
/// res.apply(&mut response);
///
/// assert_eq!(response.headers()["set-cookie"], "theme=dark%20mode");
/// assert!(res.emit(Cookie::new("late", "1")).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct ResponseCookies {
    #[doc(hidden)]
    directives: Vec<Cookie<'static>>,
    #[doc(hidden)]
    encoded: Vec<HeaderValue>,
    #[doc(hidden)]
    finalized: bool,
}

impl ResponseCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directives emitted so far, in emission order
    #[inline]
    pub fn directives(&self) -> &[Cookie<'static>] {
        &self.directives
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Mark the headers as sent. No directive is accepted afterward.
    #[inline]
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Finalize and append one `Set-Cookie` header per directive
    pub fn write_headers(&mut self, headers: &mut HeaderMap) {
        self.finalize();

        debug!("Writing {} Set-Cookie header(s)", self.encoded.len());
        for value in &self.encoded {
            headers.append(SET_COOKIE, value.clone());
        }
    }

    /// Finalize and write the directives on `response`
    #[inline]
    pub fn apply<T>(&mut self, response: &mut Response<T>) {
        self.write_headers(response.headers_mut())
    }
}

impl CookieSink for ResponseCookies {
    fn emit(&mut self, cookie: Cookie<'static>) -> Result<(), CookieError> {
        if self.finalized {
            return Err(CookieError::ResponseFinalized {
                name: cookie.name().to_string(),
            });
        }

        let value = HeaderValue::from_str(cookie.encoded().to_string().as_str())?;

        debug!("Queued Set-Cookie for `{}`", cookie.name());
        self.directives.push(cookie);
        self.encoded.push(value);
        Ok(())
    }
}

impl<S: CookieSink + ?Sized> CookieSink for &mut S {
    #[inline]
    fn emit(&mut self, cookie: Cookie<'static>) -> Result<(), CookieError> {
        (**self).emit(cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_emission_order_and_duplicates() {
        let mut res = ResponseCookies::new();
        res.emit(Cookie::new("a", "1")).unwrap();
        res.emit(Cookie::new("b", "2")).unwrap();
        res.emit(Cookie::new("a", "3")).unwrap();

        let names = res.directives().iter().map(|c| (c.name(), c.value())).collect::<Vec<_>>();
        assert_eq!(names, vec![("a", "1"), ("b", "2"), ("a", "3")]);
    }

    #[test]
    fn rejects_after_finalize() {
        let mut res = ResponseCookies::new();
        res.finalize();

        match res.emit(Cookie::new("late", "1")) {
            Err(CookieError::ResponseFinalized { name }) => assert_eq!(name, "late"),
            other => panic!("expected ResponseFinalized, got {:?}", other),
        }
        assert!(res.is_empty());
    }

    #[test]
    fn writes_one_header_per_directive() {
        let mut res = ResponseCookies::new();
        res.emit(Cookie::build(("a", "1")).path("/").build()).unwrap();
        res.emit(Cookie::build(("b", "2")).secure(true).http_only(true).build()).unwrap();

        let mut headers = HeaderMap::new();
        res.write_headers(&mut headers);

        let values = headers.get_all(SET_COOKIE).iter().map(|v| v.to_str().unwrap()).collect::<Vec<_>>();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "a=1; Path=/");
        assert!(values[1].starts_with("b=2"));
        assert!(values[1].contains("Secure"));
        assert!(values[1].contains("HttpOnly"));
        assert!(res.is_finalized());
    }

    #[test]
    fn empty_response_writes_nothing() {
        let mut response = Response::new(());
        ResponseCookies::new().apply(&mut response);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn values_are_percent_encoded() {
        let mut res = ResponseCookies::new();
        res.emit(Cookie::new("c", "a;b c,\"d\"")).unwrap();
        res.emit(Cookie::new("multi", "line1\nline2")).unwrap();

        let mut headers = HeaderMap::new();
        res.write_headers(&mut headers);

        let values = headers.get_all(SET_COOKIE).iter().map(|v| v.to_str().unwrap()).collect::<Vec<_>>();
        assert_eq!(values, vec!["c=a%3Bb%20c%2C%22d%22", "multi=line1%0Aline2"]);
        assert_eq!(res.directives()[0].value(), "a;b c,\"d\"");
    }

    #[test]
    fn bad_directive_is_rejected_alone() {
        let mut res = ResponseCookies::new();
        res.emit(Cookie::new("ok", "fine")).unwrap();

        let bad = Cookie::build(("bad", "v")).path("/a\nb").build();
        assert!(matches!(res.emit(bad), Err(CookieError::InvalidHeaderValue(_))));
        assert_eq!(res.len(), 1);

        let mut headers = HeaderMap::new();
        res.write_headers(&mut headers);
        let values = headers.get_all(SET_COOKIE).iter().map(|v| v.to_str().unwrap()).collect::<Vec<_>>();
        assert_eq!(values, vec!["ok=fine"]);
    }

    #[test]
    fn sink_through_mutable_reference() {
        fn emit_into<S: CookieSink>(mut sink: S) -> Result<(), CookieError> {
            sink.emit(Cookie::new("x", "y"))
        }

        let mut res = ResponseCookies::new();
        emit_into(&mut res).unwrap();
        assert_eq!(res.len(), 1);
    }
}
