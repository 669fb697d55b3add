/// Prefix put in front of every logical cookie name by default
pub static DEFAULT_NAME_PREFIX: &str = "wp-";

/// Defaults applied to every cookie a [`CookieManager`] produces.
///
/// `domain` and `secure` are optional: when left unset the manager falls back
/// on the request host and on whether the request was encrypted.
///
/// ```rust
/// use cookie_manager::prelude::*;
///
/// let config = CookieConfig::new()
///     .name_prefix("app-")
///     .site_hash("https://example.com")
///     .http_only(true);
///
/// assert!(config.get_name_suffix().starts_with('-'));
/// ```
///
/// [`CookieManager`]: crate::manager::CookieManager
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct CookieConfig {
    pub(crate) name_prefix: String,
    pub(crate) name_suffix: String,
    pub(crate) path: String,
    pub(crate) domain: Option<String>,
    pub(crate) secure: Option<bool>,
    pub(crate) http_only: bool,
}

impl CookieConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn name_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    /// Use `-<md5 of site_url>` as name suffix, so that sites sharing a
    /// domain do not read each other's cookies
    pub fn site_hash(self, site_url: &str) -> Self {
        self.name_suffix(format!("-{}", site_hash(site_url)))
    }

    pub fn path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// Pin the domain instead of using the request host. An empty domain
    /// counts as unset.
    pub fn domain<D: Into<String>>(mut self, domain: D) -> Self {
        let domain = domain.into();
        self.domain = if domain.is_empty() { None } else { Some(domain) };
        self
    }

    /// Pin the secure flag instead of deriving it from the request scheme
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[inline]
    pub fn get_name_prefix(&self) -> &str {
        &self.name_prefix
    }

    #[inline]
    pub fn get_name_suffix(&self) -> &str {
        &self.name_suffix
    }

    #[inline]
    pub fn get_path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn get_domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|d| !d.is_empty())
    }

    #[inline]
    pub fn get_secure(&self) -> Option<bool> {
        self.secure
    }

    #[inline]
    pub fn get_http_only(&self) -> bool {
        self.http_only
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        CookieConfig {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            name_suffix: String::new(),
            path: "/".to_string(),
            domain: None,
            secure: None,
            http_only: false,
        }
    }
}

/// Lowercase hex md5 of the site url
pub fn site_hash(site_url: &str) -> String {
    format!("{:x}", md5::compute(site_url.as_bytes()))
}
