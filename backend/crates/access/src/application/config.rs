//! Application Configuration
//!
//! Configuration for the Access application layer.

use std::time::Duration;

use platform::config::{env_flag, env_string};
use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::AccessPlan;

/// Access application configuration
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Access cookie name
    pub cookie_name: String,
    /// Lifetime of a daypass token (24 hours)
    pub daypass_ttl: Duration,
    /// Lifetime of a pro/team token (30 days)
    pub subscription_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Lower bound for the cookie Max-Age set on recovery
    pub min_cookie_max_age: Duration,
    /// Absolute base for redirects issued by the recovery flow
    pub site_url: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            cookie_name: "claw_access".to_string(),
            daypass_ttl: Duration::from_secs(24 * 3600),
            subscription_ttl: Duration::from_secs(30 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            min_cookie_max_age: Duration::from_secs(60),
            site_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AccessConfig {
    /// Read overrides from the environment
    ///
    /// `SITE_URL` (or `NEXT_PUBLIC_SITE_URL`) sets the redirect base,
    /// `ACCESS_COOKIE_SECURE=false` allows plain-HTTP development setups,
    /// `ACCESS_COOKIE_SAMESITE` accepts `strict`, `lax` or `none`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            site_url: env_string("SITE_URL")
                .or_else(|| env_string("NEXT_PUBLIC_SITE_URL"))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_url),
            cookie_secure: env_flag("ACCESS_COOKIE_SECURE", defaults.cookie_secure),
            cookie_same_site: env_string("ACCESS_COOKIE_SAMESITE")
                .and_then(|raw| SameSite::parse(&raw))
                .unwrap_or(defaults.cookie_same_site),
            ..defaults
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Token lifetime for a plan
    pub fn ttl_for(&self, plan: AccessPlan) -> Duration {
        if plan.requires_subscription() {
            self.subscription_ttl
        } else {
            self.daypass_ttl
        }
    }

    /// Cookie attributes without Max-Age
    pub fn cookie(&self) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            ..CookieConfig::named(&self.cookie_name)
        }
    }

    /// Absolute URL for a site-relative path
    pub fn site_path(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}
