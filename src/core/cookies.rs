//! Browser cookie sources
//!
//! Cookies are never read here: a [`BrowserRef`] only names a browser
//! profile the engine should pull its session cookies from.

use crate::error::CookieSourceError;
use std::fmt;
use tracing::debug;

/// Browser used for cookies when none is configured
pub const DEFAULT_COOKIE_BROWSER: &str = "chrome";

/// Browsers yt-dlp can read cookies from
pub const SUPPORTED_BROWSERS: &[&str] = &[
    "brave", "chrome", "chromium", "edge", "firefox", "opera", "safari", "vivaldi", "whale",
];

/// Reference to a browser profile holding session cookies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserRef {
    pub browser: String,
    pub profile: Option<String>,
    pub keyring: Option<String>,
    pub container: Option<String>,
}

impl BrowserRef {
    /// Reference the default profile of `browser`
    pub fn default_profile(browser: &str) -> Result<Self, CookieSourceError> {
        let browser = browser.trim().to_lowercase();
        if browser.is_empty() {
            return Err(CookieSourceError::NoBrowser);
        }
        if !SUPPORTED_BROWSERS.contains(&browser.as_str()) {
            return Err(CookieSourceError::UnsupportedBrowser(browser));
        }

        Ok(Self {
            browser,
            profile: None,
            keyring: None,
            container: None,
        })
    }
}

/// Renders the engine's `BROWSER[+KEYRING][:PROFILE][::CONTAINER]` form
impl fmt::Display for BrowserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.browser)?;
        if let Some(keyring) = &self.keyring {
            write!(f, "+{}", keyring)?;
        }
        if let Some(profile) = &self.profile {
            write!(f, ":{}", profile)?;
        }
        if let Some(container) = &self.container {
            write!(f, "::{}", container)?;
        }
        Ok(())
    }
}

/// Something able to name a cookie source for the engine
pub trait CookieSource {
    fn browser_ref(&self) -> Result<BrowserRef, CookieSourceError>;
}

/// Default profile of a named browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserProfile {
    browser: String,
}

impl BrowserProfile {
    pub fn new(browser: impl Into<String>) -> Self {
        Self {
            browser: browser.into(),
        }
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_BROWSER)
    }
}

impl CookieSource for BrowserProfile {
    fn browser_ref(&self) -> Result<BrowserRef, CookieSourceError> {
        BrowserRef::default_profile(&self.browser)
    }
}

/// Best-effort cookie attachment: a failing source yields `None`
pub fn try_cookie_source(source: &dyn CookieSource) -> Option<BrowserRef> {
    match source.browser_ref() {
        Ok(browser) => Some(browser),
        Err(e) => {
            debug!("Continuing without browser cookies: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_normalizes_name() {
        let browser = BrowserRef::default_profile(" Chrome ").unwrap();
        assert_eq!(browser.browser, "chrome");
        assert_eq!(browser.profile, None);
        assert_eq!(browser.to_string(), "chrome");
    }

    #[test]
    fn test_default_profile_rejects_unknown_browser() {
        assert_eq!(
            BrowserRef::default_profile("netscape"),
            Err(CookieSourceError::UnsupportedBrowser("netscape".to_string()))
        );
        assert_eq!(
            BrowserRef::default_profile("  "),
            Err(CookieSourceError::NoBrowser)
        );
    }

    #[test]
    fn test_display_full_reference() {
        let browser = BrowserRef {
            browser: "firefox".to_string(),
            profile: Some("work".to_string()),
            keyring: Some("gnomekeyring".to_string()),
            container: Some("Personal".to_string()),
        };
        assert_eq!(browser.to_string(), "firefox+gnomekeyring:work::Personal");
    }

    #[test]
    fn test_display_container_without_profile() {
        let browser = BrowserRef {
            browser: "firefox".to_string(),
            profile: None,
            keyring: None,
            container: Some("none".to_string()),
        };
        assert_eq!(browser.to_string(), "firefox::none");
    }

    #[test]
    fn test_try_cookie_source_degrades_to_none() {
        assert_eq!(try_cookie_source(&BrowserProfile::new("lynx")), None);
        assert_eq!(
            try_cookie_source(&BrowserProfile::default()).map(|b| b.browser),
            Some("chrome".to_string())
        );
    }
}
