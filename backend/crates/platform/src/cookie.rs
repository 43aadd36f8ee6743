//! Credential Cookie
//!
//! `Set-Cookie` values for a bearer credential mirrored into a cookie. The
//! cookie is always `HttpOnly` and scoped to `/`.

use std::fmt;

use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;

const UNIX_EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        })
    }
}

/// A named credential cookie. `Secure` and `SameSite=Lax` unless changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialCookie {
    name: &'static str,
    secure: bool,
    same_site: SameSite,
    /// Session cookie when `None`
    max_age_secs: Option<i64>,
}

impl CredentialCookie {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            secure: true,
            same_site: SameSite::Lax,
            max_age_secs: None,
        }
    }

    pub fn secure(self, secure: bool) -> Self {
        Self { secure, ..self }
    }

    pub fn same_site(self, same_site: SameSite) -> Self {
        Self { same_site, ..self }
    }

    pub fn max_age_secs(self, secs: i64) -> Self {
        Self {
            max_age_secs: Some(secs),
            ..self
        }
    }

    /// Cookie string carrying `value`
    pub fn set_value(&self, value: &str) -> String {
        let max_age = self
            .max_age_secs
            .map(|secs| format!("; Max-Age={secs}"))
            .unwrap_or_default();
        self.render(value, &max_age)
    }

    /// Cookie string that makes the browser drop the credential at once
    pub fn clear_value(&self) -> String {
        self.render("", &format!("; Max-Age=0; Expires={UNIX_EPOCH_HTTP_DATE}"))
    }

    /// Fails if `value` holds bytes that are not legal in a header
    pub fn set_header(&self, value: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.set_value(value))
    }

    pub fn clear_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.clear_value())
    }

    fn render(&self, value: &str, lifetime: &str) -> String {
        let secure = if self.secure { "; Secure" } else { "" };
        format!(
            "{}={value}; HttpOnly; Path=/; SameSite={}{lifetime}{secure}",
            self.name, self.same_site
        )
    }
}
