//! One-shot flash messages carried in a short-lived cookie.
//!
//! Forms redirect after POST and leave a message behind for the next page
//! render. The cookie stores a fixed code rather than free text, which
//! keeps the value cookie-safe.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration};

use ripple_core::DomainError;

const FLASH_COOKIE: &str = "flash";

/// The messages the form routes can leave behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    FieldsRequired,
    UsernameTaken,
    EmailTaken,
    Registered,
    LoggedIn,
    InvalidCredentials,
    LoggedOut,
    SomethingWentWrong,
}

impl Flash {
    fn code(self) -> &'static str {
        match self {
            Flash::FieldsRequired => "fields-required",
            Flash::UsernameTaken => "username-taken",
            Flash::EmailTaken => "email-taken",
            Flash::Registered => "registered",
            Flash::LoggedIn => "logged-in",
            Flash::InvalidCredentials => "invalid-credentials",
            Flash::LoggedOut => "logged-out",
            Flash::SomethingWentWrong => "something-went-wrong",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "fields-required" => Some(Flash::FieldsRequired),
            "username-taken" => Some(Flash::UsernameTaken),
            "email-taken" => Some(Flash::EmailTaken),
            "registered" => Some(Flash::Registered),
            "logged-in" => Some(Flash::LoggedIn),
            "invalid-credentials" => Some(Flash::InvalidCredentials),
            "logged-out" => Some(Flash::LoggedOut),
            "something-went-wrong" => Some(Flash::SomethingWentWrong),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Flash::FieldsRequired => "All fields are required",
            Flash::UsernameTaken => "Username already exists",
            Flash::EmailTaken => "Email already registered",
            Flash::Registered => "Registration successful. Please login.",
            Flash::LoggedIn => "Login successful",
            Flash::InvalidCredentials => "Invalid username or password",
            Flash::LoggedOut => "You have been logged out",
            Flash::SomethingWentWrong => "Something went wrong. Please try again.",
        }
    }

    /// The flash a failed form submission leaves behind.
    pub fn from_error(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(_) => Flash::FieldsRequired,
            DomainError::DuplicateUsername => Flash::UsernameTaken,
            DomainError::DuplicateEmail => Flash::EmailTaken,
            DomainError::InvalidCredentials => Flash::InvalidCredentials,
            _ => Flash::SomethingWentWrong,
        }
    }

    /// Cookie carrying this flash to the next page load.
    pub fn cookie(self) -> Cookie<'static> {
        Cookie::build(FLASH_COOKIE, self.code())
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(Duration::minutes(5))
            .finish()
    }
}

/// The pending flash message, if any. The caller clears it with
/// [`removal`] once rendered.
pub fn peek(req: &HttpRequest) -> Option<&'static str> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    Flash::from_code(cookie.value()).map(Flash::message)
}

/// Expired cookie that clears a consumed flash.
pub fn removal() -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_round_trips() {
        for flash in [
            Flash::FieldsRequired,
            Flash::UsernameTaken,
            Flash::EmailTaken,
            Flash::Registered,
            Flash::LoggedIn,
            Flash::InvalidCredentials,
            Flash::LoggedOut,
            Flash::SomethingWentWrong,
        ] {
            assert_eq!(Flash::from_code(flash.code()), Some(flash));
        }
    }

    #[test]
    fn unknown_code_reads_as_no_flash() {
        assert_eq!(Flash::from_code("stale-value"), None);
    }
}
