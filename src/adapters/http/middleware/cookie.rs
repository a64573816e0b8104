//! Session cookie parsing and `Set-Cookie` rendering.
//!
//! Only the cookie carrying the session id is handled; every
//! attribute on the outgoing cookie is set explicitly. No `Max-Age`: the
//! cookie lives for the browser session and the store enforces idle expiry.

use axum::http::{header::COOKIE, header::InvalidHeaderValue, HeaderMap, HeaderValue};

use crate::domain::foundation::SessionId;

/// The cookie that carries the session id between client and server.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    secure: bool,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    /// Collects every non-empty session cookie value across all `Cookie`
    /// headers, in the order the client sent them.
    ///
    /// Browsers send several cookies of the same name when they were set
    /// for different paths or domains. Header values that are not valid
    /// visible ASCII are skipped.
    pub fn find_all_in<'h>(&self, headers: &'h HeaderMap) -> Vec<&'h str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| cookie_values(header, &self.name))
            .collect()
    }

    /// Renders the `Set-Cookie` value issuing `id`.
    pub fn set_cookie_header(&self, id: &SessionId) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, id);
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }
}

/// Values of every `name` cookie in a single `Cookie` header (`a=1; b=2`).
fn cookie_values<'h>(header: &'h str, name: &str) -> Vec<&'h str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .filter_map(|(key, value)| {
            let value = value.trim().trim_matches('"');
            (key.trim() == name && !value.is_empty()).then_some(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cookie() -> SessionCookie {
        SessionCookie::new("SESSION", false)
    }

    fn headers(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(COOKIE, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let headers = headers(&["theme=dark; SESSION=abc; lang=en"]);
        assert_eq!(cookie().find_all_in(&headers), vec!["abc"]);
    }

    #[test]
    fn finds_session_in_second_cookie_header() {
        let headers = headers(&["theme=dark", "SESSION=abc"]);
        assert_eq!(cookie().find_all_in(&headers), vec!["abc"]);
    }

    #[test]
    fn collects_every_session_cookie_in_order() {
        let headers = headers(&["SESSION=old; theme=dark; SESSION=new", "SESSION=third"]);
        assert_eq!(cookie().find_all_in(&headers), vec!["old", "new", "third"]);
    }

    #[test]
    fn ignores_similarly_named_cookies() {
        let headers = headers(&["MYSESSION=nope; SESSIONID=nope"]);
        assert!(cookie().find_all_in(&headers).is_empty());
    }

    #[test]
    fn ignores_empty_value_and_missing_header() {
        assert_eq!(cookie().find_all_in(&headers(&["SESSION=; SESSION=abc"])), vec!["abc"]);
        assert!(cookie().find_all_in(&headers(&["SESSION="])).is_empty());
        assert!(cookie().find_all_in(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn strips_quotes_from_value() {
        let headers = headers(&["SESSION=\"abc\""]);
        assert_eq!(cookie().find_all_in(&headers), vec!["abc"]);
    }

    #[test]
    fn set_cookie_has_explicit_attributes() {
        let id = SessionId::new();
        let value = cookie().set_cookie_header(&id).unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            format!("SESSION={}; Path=/; HttpOnly; SameSite=Lax", id)
        );
    }

    #[test]
    fn set_cookie_marks_secure_when_configured() {
        let cookie = SessionCookie::new("SESSION", true);
        let value = cookie.set_cookie_header(&SessionId::new()).unwrap();
        assert!(value.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn issued_cookie_is_found_again() {
        let id = SessionId::new();
        let issued = cookie().set_cookie_header(&id).unwrap();
        let pair = issued.to_str().unwrap().split(';').next().unwrap().to_string();

        let headers = headers(&[pair.as_str()]);
        assert_eq!(cookie().find_all_in(&headers), vec![id.to_string().as_str()]);
    }

    proptest! {
        #[test]
        fn parsing_arbitrary_headers_never_panics(header in "[ -~]{0,64}") {
            let _ = cookie_values(&header, "SESSION");
        }

        #[test]
        fn session_found_regardless_of_surrounding_cookies(
            before in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{1,8}"), 0..4),
            after in proptest::collection::vec(("[a-z]{1,8}", "[a-z0-9]{1,8}"), 0..4),
            value in "[A-Za-z0-9-]{1,36}",
        ) {
            let mut pairs: Vec<String> = before.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            pairs.push(format!("SESSION={}", value));
            pairs.extend(after.iter().map(|(k, v)| format!("{}={}", k, v)));
            let header = pairs.join("; ");

            prop_assert_eq!(cookie_values(&header, "SESSION"), vec![value.as_str()]);
        }
    }
}
