use axum::http::{header, HeaderMap};

use crate::api::middleware::read_cookie;

pub const FLASH_COOKIE: &str = "flash";

/// One-shot notices carried across a redirect in a short-lived cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Registered,
    Subscribed,
    Shared,
    LoggedOut,
}

impl Flash {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flash::Registered => "registered",
            Flash::Subscribed => "subscribed",
            Flash::Shared => "shared",
            Flash::LoggedOut => "logged_out",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "registered" => Some(Flash::Registered),
            "subscribed" => Some(Flash::Subscribed),
            "shared" => Some(Flash::Shared),
            "logged_out" => Some(Flash::LoggedOut),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Flash::Registered => "Registration complete, please log in.",
            Flash::Subscribed => "Successfully subscribed!",
            Flash::Shared => "Idea shared.",
            Flash::LoggedOut => "You have been logged out.",
        }
    }

    pub fn set_cookie(&self) -> String {
        format!("{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=60", FLASH_COOKIE, self.as_str())
    }
}

pub fn take_flash(headers: &HeaderMap) -> Option<Flash> {
    read_cookie(headers, FLASH_COOKIE).and_then(|v| Flash::parse(&v))
}

pub fn clear_cookie() -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", FLASH_COOKIE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_take_flash_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("idea_session=abc; flash=subscribed"));
        assert_eq!(take_flash(&headers), Some(Flash::Subscribed));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=bogus"));
        assert_eq!(take_flash(&headers), None);
    }

    #[test]
    fn test_set_cookie_carries_key() {
        assert!(Flash::Registered.set_cookie().starts_with("flash=registered;"));
    }
}
