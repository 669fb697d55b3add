use cookie::Expiration;

use crate::{config::CookieConfig, context::RequestContext, cookie_spec::CookieSpec, response::CookieSink};

/// Factory of namespaced cookies for one request.
///
/// The request is looked at once, when the manager is built: the secure flag
/// follows the request scheme and the domain falls back to the request host,
/// unless the [`CookieConfig`] pins them. Every cookie it hands out is named
/// `prefix + name + suffix`, and the shortcut methods use that same physical
/// name to read, write and delete.
///
/// ```rust
/// use cookie_manager::prelude::*;
///
/// let ctx = RequestContext::builder().host("example.com").encrypted(true).build();
/// let manager = CookieManager::new(CookieConfig::new().name_suffix("-abc123"), &ctx);
///
/// let session = manager.cookie("session");
/// assert_eq!(session.name(), "wp-session-abc123");
/// assert_eq!(session.domain(), "example.com");
/// assert!(session.is_secure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieManager {
    name_prefix: String,
    name_suffix: String,
    path: String,
    domain: String,
    secure: bool,
    http_only: bool,
}

impl CookieManager {
    /// Manager with the default configuration
    pub fn get(ctx: &RequestContext) -> Self {
        Self::new(CookieConfig::default(), ctx)
    }

    pub fn new(config: CookieConfig, ctx: &RequestContext) -> Self {
        let secure = config.get_secure().unwrap_or_else(|| ctx.is_encrypted());
        let domain = config.get_domain().unwrap_or_else(|| ctx.host()).to_string();
        let CookieConfig {
            name_prefix,
            name_suffix,
            path,
            http_only,
            ..
        } = config;

        trace!("Cookie manager for `{}` (secure: {}) with names `{}*{}`", domain, secure, name_prefix, name_suffix);

        CookieManager {
            name_prefix,
            name_suffix,
            path,
            domain,
            secure,
            http_only,
        }
    }

    /// Name the cookie `logical` is stored under on the browser
    pub fn physical_name(&self, logical: &str) -> String {
        let mut name = String::with_capacity(self.name_prefix.len() + logical.len() + self.name_suffix.len());
        name.push_str(&self.name_prefix);
        name.push_str(logical);
        name.push_str(&self.name_suffix);
        name
    }

    /// A fresh cookie carrying the manager defaults. Changing it does not
    /// affect the manager nor other cookies.
    pub fn cookie(&self, logical: &str) -> CookieSpec {
        CookieSpec::new(self.physical_name(logical))
            .set_path(self.path.as_str())
            .set_domain(self.domain.as_str())
            .set_secure(self.secure)
            .set_http_only(self.http_only)
    }

    /// Whether the request carries the cookie `logical`
    pub fn has(&self, ctx: &RequestContext, logical: &str) -> bool {
        self.cookie(logical).exists(ctx)
    }

    /// Value of the cookie `logical` sent by the browser, if any
    pub fn get_value<'a>(&self, ctx: &'a RequestContext, logical: &str) -> Option<&'a str> {
        ctx.cookie(&self.physical_name(logical))
    }

    pub fn set<S, V, E>(&self, sink: &mut S, logical: &str, value: V, expiration: E) -> bool
    where
        S: CookieSink + ?Sized,
        V: Into<String>,
        E: Into<Expiration>,
    {
        self.cookie(logical).set(sink, value, expiration)
    }

    pub fn delete<S>(&self, ctx: &RequestContext, sink: &mut S, logical: &str) -> bool
    where
        S: CookieSink + ?Sized,
    {
        self.cookie(logical).delete(ctx, sink)
    }

    #[inline]
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    #[inline]
    pub fn name_suffix(&self) -> &str {
        &self.name_suffix
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[inline]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    #[inline]
    pub fn is_http_only(&self) -> bool {
        self.http_only
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::{clock::FixedClock, response::ResponseCookies};

    fn ctx(encrypted: bool) -> RequestContext {
        RequestContext::builder().host("site.test").encrypted(encrypted).build()
    }

    #[test]
    fn composes_names() {
        let manager = CookieManager::new(CookieConfig::new().name_prefix("wp-").name_suffix("-abc123"), &ctx(false));
        assert_eq!(manager.physical_name("session"), "wp-session-abc123");
        assert_eq!(manager.cookie("session").name(), "wp-session-abc123");
    }

    #[test]
    fn default_prefix_without_suffix() {
        let manager = CookieManager::get(&ctx(false));
        assert_eq!(manager.cookie("x").name(), "wp-x");
    }

    #[test]
    fn secure_follows_request() {
        assert!(CookieManager::get(&ctx(true)).cookie("a").is_secure());
        assert!(!CookieManager::get(&ctx(false)).cookie("a").is_secure());
    }

    #[test]
    fn pinned_secure_wins() {
        let manager = CookieManager::new(CookieConfig::new().secure(false), &ctx(true));
        assert!(!manager.cookie("a").is_secure());
    }

    #[test]
    fn domain_falls_back_to_host() {
        assert_eq!(CookieManager::get(&ctx(false)).cookie("a").domain(), "site.test");
        let manager = CookieManager::new(CookieConfig::new().domain(".example.com"), &ctx(false));
        assert_eq!(manager.cookie("a").domain(), ".example.com");
    }

    #[test]
    fn cookies_are_independent() {
        let manager = CookieManager::new(CookieConfig::new().path("/blog").http_only(true), &ctx(false));
        let changed = manager.cookie("a").set_path("/other").set_secure(true);
        let fresh = manager.cookie("a");

        assert_eq!(changed.path(), "/other");
        assert_eq!(fresh.path(), "/blog");
        assert!(!fresh.is_secure());
        assert!(fresh.is_http_only());
        assert_eq!(manager.path(), "/blog");
    }

    #[test]
    fn shortcuts_use_the_physical_name() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let ctx = RequestContext::builder()
            .host("site.test")
            .clock(FixedClock(now))
            .cookie("wp-pref-h", "compact")
            .cookie("pref", "wrong")
            .build();
        let manager = CookieManager::new(CookieConfig::new().name_suffix("-h"), &ctx);
        let mut res = ResponseCookies::new();

        assert!(manager.has(&ctx, "pref"));
        assert_eq!(manager.get_value(&ctx, "pref"), Some("compact"));
        assert_eq!(manager.get_value(&ctx, "missing"), None);

        assert!(manager.set(&mut res, "theme", "dark", Expiration::Session));
        assert!(manager.delete(&ctx, &mut res, "pref"));
        assert!(!manager.delete(&ctx, &mut res, "missing"));

        let emitted = res.directives().iter().map(|c| (c.name(), c.value())).collect::<Vec<_>>();
        assert_eq!(emitted, vec![("wp-theme-h", "dark"), ("wp-pref-h", "compact")]);
        assert!(res.directives()[1].expires_datetime().unwrap() < now);
    }
}
